// storefront/src/models/product.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::{AppError, Result};

pub const DEFAULT_SIZES: [&str; 4] = ["S", "M", "L", "XL"];
pub const DEFAULT_STOCK: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub price: i64,
  #[serde(default)]
  pub sale_price: Option<i64>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub fabric: Option<String>,
  #[serde(default)]
  pub care: Option<String>,
  pub sizes: Vec<String>,
  pub stock: i32,
  pub featured: bool,
  pub launch_date: NaiveDate,
  #[serde(default)]
  pub category_id: Option<Uuid>,
  pub created_at: DateTime<Utc>,
  /// Filled from `product_images` when the query asks for them.
  #[sqlx(skip)]
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub images: Vec<ProductImage>,
}

impl Product {
  /// The sale price when one is set and non-zero, else the list price.
  pub fn effective_price(&self) -> i64 {
    match self.sale_price {
      Some(sale) if sale != 0 => sale,
      _ => self.price,
    }
  }

  pub fn on_sale(&self) -> bool {
    self.effective_price() != self.price
  }

  /// `round((price - sale) / price * 100)`, only while on sale.
  pub fn discount_percent(&self) -> Option<i64> {
    if !self.on_sale() || self.price == 0 {
      return None;
    }
    let off = (self.price - self.effective_price()) as f64 / self.price as f64 * 100.0;
    Some(off.round() as i64)
  }

  pub fn is_launched(&self, today: NaiveDate) -> bool {
    self.launch_date <= today
  }

  pub fn in_stock(&self) -> bool {
    self.stock > 0
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProductImage {
  pub id: Uuid,
  pub product_id: Uuid,
  pub image_url: String,
  pub order_index: i32,
}

fn default_sizes() -> Vec<String> {
  DEFAULT_SIZES.iter().map(|s| s.to_string()).collect()
}

fn default_stock() -> i32 {
  DEFAULT_STOCK
}

/// The admin product form. A missing `id` creates a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
  #[serde(default)]
  pub id: Option<Uuid>,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub slug: Option<String>,
  #[serde(default)]
  pub price: Option<i64>,
  #[serde(default)]
  pub sale_price: Option<i64>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub fabric: Option<String>,
  #[serde(default)]
  pub care: Option<String>,
  #[serde(default = "default_sizes")]
  pub sizes: Vec<String>,
  #[serde(default = "default_stock")]
  pub stock: i32,
  #[serde(default)]
  pub featured: bool,
  #[serde(default)]
  pub launch_date: Option<NaiveDate>,
  #[serde(default)]
  pub category_id: Option<Uuid>,
  /// Image URLs in display order.
  #[serde(default)]
  pub images: Vec<String>,
}

impl ProductDraft {
  /// An empty form as the admin screen opens it.
  pub fn blank(today: NaiveDate) -> Self {
    Self {
      id: None,
      name: String::new(),
      slug: None,
      price: None,
      sale_price: None,
      description: None,
      fabric: None,
      care: None,
      sizes: default_sizes(),
      stock: DEFAULT_STOCK,
      featured: false,
      launch_date: Some(today),
      category_id: None,
      images: Vec::new(),
    }
  }

  /// Name and price are required.
  pub fn validate(&self) -> Result<i64> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("Product name is required.".to_string()));
    }
    match self.price {
      Some(price) if price >= 0 => Ok(price),
      Some(_) => Err(AppError::Validation("Price cannot be negative.".to_string())),
      None => Err(AppError::Validation("Price is required.".to_string())),
    }
  }
}


#[cfg(test)]
mod tests {
  use super::fixtures::product;
  use super::*;

  #[test]
  fn zero_sale_price_falls_back_to_list_price() {
    assert_eq!(product("A", 500, Some(0)).effective_price(), 500);
    assert_eq!(product("A", 500, None).effective_price(), 500);
    assert_eq!(product("A", 500, Some(350)).effective_price(), 350);
  }

  #[test]
  fn discount_is_rounded_percentage() {
    assert_eq!(product("A", 3000, Some(1999)).discount_percent(), Some(33));
    assert_eq!(product("A", 3000, None).discount_percent(), None);
  }

  #[test]
  fn blank_draft_uses_form_defaults() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let draft = ProductDraft::blank(today);
    assert_eq!(draft.sizes, vec!["S", "M", "L", "XL"]);
    assert_eq!(draft.stock, 10);
    assert!(!draft.featured);
    assert_eq!(draft.launch_date, Some(today));
    assert!(draft.validate().is_err());
  }
}
