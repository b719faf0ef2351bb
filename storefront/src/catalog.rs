// storefront/src/catalog.rs

//! Public shop listings, collection pages and the product page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::backend::{Backend, ProductQuery};
use crate::errors::{AppError, Result};
use crate::models::{Category, Product};

pub const PLACEHOLDER_IMAGE: &str = "https://images.unsplash.com/photo-1515886657613-9f3515b0c78f?q=80&w=1000";
pub const SHOP_TITLE: &str = "The Collection";
pub const SHOP_DESCRIPTION: &str = "Explore our latest releases, designed with modesty and modernity in mind.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
  /// Launch date, latest first.
  #[default]
  Newest,
  PriceLow,
  PriceHigh,
}

impl FromStr for SortOrder {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "newest" => Ok(SortOrder::Newest),
      "price-low" => Ok(SortOrder::PriceLow),
      "price-high" => Ok(SortOrder::PriceHigh),
      other => Err(AppError::Validation(format!("Unknown sort '{}'", other))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
  All,
  Id(Uuid),
  Slug(String),
}

impl CategoryFilter {
  pub fn parse(raw: Option<&str>) -> Self {
    match raw.map(str::trim) {
      None | Some("") | Some("all") => CategoryFilter::All,
      Some(value) => match Uuid::parse_str(value) {
        Ok(id) => CategoryFilter::Id(id),
        Err(_) => CategoryFilter::Slug(value.to_string()),
      },
    }
  }

  /// The category id this filter selects. `None` means every product passes;
  /// an unknown slug selects nothing.
  fn resolve(&self, categories: &[Category]) -> Option<Option<Uuid>> {
    match self {
      CategoryFilter::All => None,
      CategoryFilter::Id(id) => Some(Some(*id)),
      CategoryFilter::Slug(slug) => Some(categories.iter().find(|c| &c.slug == slug).map(|c| c.id)),
    }
  }

  pub fn label(&self) -> String {
    match self {
      CategoryFilter::All => "all".to_string(),
      CategoryFilter::Id(id) => id.to_string(),
      CategoryFilter::Slug(slug) => slug.clone(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Collection {
  pub slug: &'static str,
  pub title: &'static str,
  pub description: &'static str,
  /// Category slug the page is pinned to.
  pub category: Option<&'static str>,
}

pub const COLLECTIONS: [Collection; 5] = [
  Collection {
    slug: "sarees",
    title: "Sarees",
    description: "Beautiful handcrafted sarees.",
    category: Some("sarees"),
  },
  Collection {
    slug: "kurtis",
    title: "Kurtis",
    description: "Stylish and comfortable kurtis.",
    category: Some("kurtis"),
  },
  Collection {
    slug: "dresses",
    title: "Dresses",
    description: "Modest and elegant dresses.",
    category: Some("dresses"),
  },
  Collection {
    slug: "coord-sets",
    title: "Co-ord Sets",
    description: "Matching sets for easy style.",
    category: Some("coord-sets"),
  },
  Collection {
    slug: "new-arrivals",
    title: "New Arrivals",
    description: "Be the first to wear our latest designs.",
    category: None,
  },
];

pub fn collection(slug: &str) -> Option<&'static Collection> {
  COLLECTIONS.iter().find(|c| c.slug == slug)
}

/// Lowercase, spaces to `-`, then drop anything outside `[A-Za-z0-9_-]`.
pub fn slugify(name: &str) -> String {
  name
    .to_lowercase()
    .replace(' ', "-")
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
    .collect()
}

pub fn filter_by_category(products: Vec<Product>, filter: &CategoryFilter, categories: &[Category]) -> Vec<Product> {
  match filter.resolve(categories) {
    None => products,
    Some(target) => products
      .into_iter()
      .filter(|p| target.is_some() && p.category_id == target)
      .collect(),
  }
}

/// Sorts on the list price, not the sale price.
pub fn sort_products(products: &mut [Product], sort: SortOrder) {
  match sort {
    SortOrder::Newest => products.sort_by(|a, b| b.launch_date.cmp(&a.launch_date)),
    SortOrder::PriceLow => products.sort_by_key(|p| p.price),
    SortOrder::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShopPage {
  pub title: String,
  pub description: String,
  pub selected_category: String,
  pub sort: SortOrder,
  pub categories: Vec<Category>,
  pub products: Vec<Product>,
}

/// Fetches every launched product and the categories, then filters and sorts
/// in memory. A collection's pinned category overrides `category`.
#[instrument(name = "catalog::shop_page", skip(backend), err(Display))]
pub async fn shop_page(
  backend: &dyn Backend,
  today: NaiveDate,
  collection: Option<&Collection>,
  category: Option<&str>,
  sort: SortOrder,
) -> Result<ShopPage> {
  let categories = backend.list_categories().await?;
  let products = backend.list_products(&ProductQuery::launched_by(today)).await?;

  let filter = match collection.and_then(|c| c.category) {
    Some(pinned) => CategoryFilter::Slug(pinned.to_string()),
    None => CategoryFilter::parse(category),
  };
  let mut products = filter_by_category(products, &filter, &categories);
  sort_products(&mut products, sort);
  debug!(count = products.len(), filter = %filter.label(), "Shop listing built.");

  Ok(ShopPage {
    title: collection.map_or(SHOP_TITLE, |c| c.title).to_string(),
    description: collection.map_or(SHOP_DESCRIPTION, |c| c.description).to_string(),
    selected_category: filter.label(),
    sort,
    categories,
    products,
  })
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
  pub product: Product,
  pub image_urls: Vec<String>,
  pub price: i64,
  pub original_price: Option<i64>,
  pub discount_percent: Option<i64>,
  pub in_stock: bool,
}

impl ProductDetail {
  pub fn from_product(product: Product) -> Self {
    let mut image_urls: Vec<String> = product.images.iter().map(|img| img.image_url.clone()).collect();
    if image_urls.is_empty() {
      image_urls.push(PLACEHOLDER_IMAGE.to_string());
    }
    Self {
      price: product.effective_price(),
      original_price: product.on_sale().then_some(product.price),
      discount_percent: product.discount_percent(),
      in_stock: product.in_stock(),
      image_urls,
      product,
    }
  }
}

#[instrument(name = "catalog::product_detail", skip(backend), err(Display))]
pub async fn product_detail(backend: &dyn Backend, slug: &str) -> Result<ProductDetail> {
  let product = backend
    .product_by_slug(slug)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", slug)))?;
  Ok(ProductDetail::from_product(product))
}

/// Checks an add-to-cart request from the product page and returns the quantity to add.
pub fn validate_add_to_cart(product: &Product, size: Option<&str>, quantity: u32) -> Result<u32> {
  if !product.in_stock() {
    return Err(AppError::Validation("This product is out of stock.".to_string()));
  }
  let size = size.map(str::trim).filter(|s| !s.is_empty());
  let Some(size) = size else {
    return Err(AppError::Validation("Please select a size.".to_string()));
  };
  if !product.sizes.iter().any(|s| s == size) {
    return Err(AppError::Validation(format!("Size '{}' is not available.", size)));
  }
  if quantity < 1 || i64::from(quantity) > i64::from(product.stock) {
    return Err(AppError::Validation(format!(
      "Quantity must be between 1 and {}.",
      product.stock
    )));
  }
  Ok(quantity)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::product::fixtures::product;

  #[test]
  fn slugify_strips_punctuation() {
    assert_eq!(slugify("Rose Gold Kurti Set!"), "rose-gold-kurti-set");
    assert_eq!(slugify("Co-ord  Set (Navy)"), "co-ord--set-navy");
  }

  #[test]
  fn category_filter_parses_all_ids_and_slugs() {
    assert_eq!(CategoryFilter::parse(None), CategoryFilter::All);
    assert_eq!(CategoryFilter::parse(Some("all")), CategoryFilter::All);
    let id = Uuid::new_v4();
    assert_eq!(CategoryFilter::parse(Some(&id.to_string())), CategoryFilter::Id(id));
    assert_eq!(CategoryFilter::parse(Some("sarees")), CategoryFilter::Slug("sarees".into()));
  }

  #[test]
  fn price_sorts_ignore_sale_price() {
    let mut products = vec![product("A", 1000, Some(100)), product("B", 500, None)];
    sort_products(&mut products, SortOrder::PriceLow);
    assert_eq!(products[0].name, "B");
    sort_products(&mut products, SortOrder::PriceHigh);
    assert_eq!(products[0].name, "A");
  }

  #[test]
  fn add_to_cart_rules() {
    let mut p = product("A", 1000, None);
    p.stock = 2;
    assert!(validate_add_to_cart(&p, None, 1).is_err());
    assert!(validate_add_to_cart(&p, Some("XXL"), 1).is_err());
    assert!(validate_add_to_cart(&p, Some("M"), 3).is_err());
    assert!(validate_add_to_cart(&p, Some("M"), 0).is_err());
    assert_eq!(validate_add_to_cart(&p, Some("M"), 2).unwrap(), 2);
    p.stock = 0;
    assert!(validate_add_to_cart(&p, Some("M"), 1).is_err());
  }

  #[test]
  fn detail_falls_back_to_placeholder() {
    let detail = ProductDetail::from_product(product("A", 2000, Some(1500)));
    assert_eq!(detail.image_urls, vec![PLACEHOLDER_IMAGE.to_string()]);
    assert_eq!(detail.price, 1500);
    assert_eq!(detail.original_price, Some(2000));
    assert_eq!(detail.discount_percent, Some(25));
  }
}
