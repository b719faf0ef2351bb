// storefront/src/search.rs

use serde::Serialize;
use tracing::instrument;

use crate::backend::{Backend, ProductOrder, ProductQuery};
use crate::errors::Result;
use crate::models::Product;

const SHELF_SIZE: usize = 4;

/// Snapshot of the catalog the search overlay filters locally.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
  products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
  pub query: String,
  pub results: Vec<Product>,
  pub new_arrivals: Vec<Product>,
  pub featured: Vec<Product>,
}

impl SearchIndex {
  #[instrument(name = "search::load", skip(backend), err(Display))]
  pub async fn load(backend: &dyn Backend) -> Result<Self> {
    let query = ProductQuery {
      launched_by: None,
      with_images: true,
      order: ProductOrder::LaunchDesc,
    };
    Ok(Self::from_products(backend.list_products(&query).await?))
  }

  /// Orders `products` newest launch first.
  pub fn from_products(mut products: Vec<Product>) -> Self {
    products.sort_by(|a, b| b.launch_date.cmp(&a.launch_date));
    Self { products }
  }

  pub fn len(&self) -> usize {
    self.products.len()
  }

  pub fn is_empty(&self) -> bool {
    self.products.is_empty()
  }

  /// Case-insensitive substring match on name or description.
  pub fn results(&self, query: &str) -> Vec<&Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
      return Vec::new();
    }
    self
      .products
      .iter()
      .filter(|p| {
        p.name.to_lowercase().contains(&needle)
          || p
            .description
            .as_deref()
            .map_or(false, |d| d.to_lowercase().contains(&needle))
      })
      .collect()
  }

  pub fn new_arrivals(&self) -> Vec<&Product> {
    self.products.iter().take(SHELF_SIZE).collect()
  }

  pub fn featured(&self) -> Vec<&Product> {
    self.products.iter().filter(|p| p.featured).take(SHELF_SIZE).collect()
  }

  pub fn respond(&self, query: &str) -> SearchResponse {
    let owned = |list: Vec<&Product>| list.into_iter().cloned().collect::<Vec<_>>();
    SearchResponse {
      query: query.trim().to_string(),
      results: owned(self.results(query)),
      new_arrivals: owned(self.new_arrivals()),
      featured: owned(self.featured()),
    }
  }
}
