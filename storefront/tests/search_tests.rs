// tests/search_tests.rs
mod common;

use common::*;
use olira_storefront::search::SearchIndex;

fn catalog() -> SearchIndex {
  let mut products = Vec::new();
  for (i, name) in ["Ivory Maxi", "Sage Kurti", "Rose Top", "Navy Shirt", "Blush Maxi", "Olive Set"]
    .iter()
    .enumerate()
  {
    let mut p = product(name, 1000 + i as i64 * 100, None);
    p.launch_date = days_from_today(-(i as i64) - 1);
    p.featured = i % 2 == 0;
    products.push(p);
  }
  products[3].description = Some("Relaxed fit in breathable LINEN".to_string());
  products.reverse();
  SearchIndex::from_products(products)
}

#[test]
fn matches_name_or_description_case_insensitively() {
  let index = catalog();
  let names: Vec<&str> = index.results("  MAXI ").iter().map(|p| p.name.as_str()).collect();
  assert_eq!(names, vec!["Ivory Maxi", "Blush Maxi"]);
  let linen: Vec<&str> = index.results("linen").iter().map(|p| p.name.as_str()).collect();
  assert_eq!(linen, vec!["Navy Shirt"]);
}

#[test]
fn blank_query_returns_nothing() {
  let index = catalog();
  assert!(index.results("").is_empty());
  assert!(index.results("   ").is_empty());
  assert_eq!(index.len(), 6);
}

#[test]
fn shelves_hold_four_newest_first() {
  let index = catalog();
  let arrivals: Vec<&str> = index.new_arrivals().iter().map(|p| p.name.as_str()).collect();
  assert_eq!(arrivals, vec!["Ivory Maxi", "Sage Kurti", "Rose Top", "Navy Shirt"]);
  let featured: Vec<&str> = index.featured().iter().map(|p| p.name.as_str()).collect();
  assert_eq!(featured, vec!["Ivory Maxi", "Rose Top", "Blush Maxi"]);
}

#[tokio::test]
async fn loads_unlaunched_products_too() {
  let app = test_app();
  let mut upcoming = product("Festive Anarkali", 3500, None);
  upcoming.launch_date = days_from_today(10);
  insert_product(app.state.backend.as_ref(), upcoming).await;
  insert_product(app.state.backend.as_ref(), product("Daily Kurti", 900, None)).await;

  let index = SearchIndex::load(app.state.backend.as_ref()).await.unwrap();
  let response = index.respond("anarkali");
  assert_eq!(response.results.len(), 1);
  assert_eq!(response.new_arrivals[0].name, "Festive Anarkali");
}
