// storefront/src/models/cart_item.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Product;

/// One cart line: the product as it was when added, plus the chosen size and quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
  #[serde(flatten)]
  pub product: Product,
  #[serde(rename = "cartId")]
  pub cart_id: Uuid,
  #[serde(rename = "selectedSize")]
  pub selected_size: String,
  pub quantity: u32,
}

impl CartItem {
  pub fn new(product: Product, selected_size: &str, quantity: u32) -> Self {
    Self {
      product,
      cart_id: Uuid::new_v4(),
      selected_size: selected_size.to_string(),
      quantity,
    }
  }

  pub fn line_total(&self) -> i64 {
    self.product.effective_price() * i64::from(self.quantity)
  }
}
