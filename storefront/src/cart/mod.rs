// storefront/src/cart/mod.rs

//! The shopper's cart: lines persisted to [`CartStorage`] after every change.

pub mod book;
pub mod storage;

use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{CartItem, Product};

pub use book::CartBook;
pub use storage::{CartStorage, FileCartStorage, MemoryCartStorage};

pub const CART_STORAGE_KEY: &str = "olira-cart";

pub struct CartStore {
  key: String,
  lines: Vec<CartItem>,
  drawer_open: bool,
  storage: Arc<dyn CartStorage>,
}

impl CartStore {
  /// Loads the lines saved under `key`. Missing or unreadable data gives an empty cart.
  pub fn open(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
    let key = key.into();
    let lines = match storage.get_item(&key) {
      Ok(Some(raw)) => serde_json::from_str::<Vec<CartItem>>(&raw).unwrap_or_else(|e| {
        warn!(key = %key, error = %e, "Discarding unreadable saved cart.");
        Vec::new()
      }),
      Ok(None) => Vec::new(),
      Err(e) => {
        warn!(key = %key, error = %e, "Could not read saved cart.");
        Vec::new()
      }
    };
    debug!(key = %key, lines = lines.len(), "Cart opened.");
    Self {
      key,
      lines,
      drawer_open: false,
      storage,
    }
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn lines(&self) -> &[CartItem] {
    &self.lines
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn item_count(&self) -> u32 {
    self.lines.iter().map(|l| l.quantity).sum()
  }

  /// Σ effective price × quantity.
  pub fn total(&self) -> i64 {
    self.lines.iter().map(CartItem::line_total).sum()
  }

  /// Merges into the line for the same product and size, or appends a new
  /// one. Opens the drawer. A quantity of 0 counts as 1.
  pub fn add(&mut self, product: &Product, size: &str, quantity: u32) -> Result<CartItem> {
    let quantity = quantity.max(1);
    let mut lines = self.lines.clone();
    let line = match lines
      .iter_mut()
      .find(|l| l.product.id == product.id && l.selected_size == size)
    {
      Some(existing) => {
        existing.quantity = existing.quantity.saturating_add(quantity);
        existing.clone()
      }
      None => {
        let line = CartItem::new(product.clone(), size, quantity);
        lines.push(line.clone());
        line
      }
    };
    self.commit(lines)?;
    self.drawer_open = true;
    Ok(line)
  }

  /// Returns whether a line was removed.
  pub fn remove(&mut self, cart_id: Uuid) -> Result<bool> {
    if !self.lines.iter().any(|l| l.cart_id == cart_id) {
      return Ok(false);
    }
    let lines = self.lines.iter().filter(|l| l.cart_id != cart_id).cloned().collect();
    self.commit(lines)?;
    Ok(true)
  }

  /// Adds `delta` to the line's quantity, never going below 1. Returns the new
  /// quantity, or `None` for an unknown line.
  pub fn update_quantity(&mut self, cart_id: Uuid, delta: i64) -> Result<Option<u32>> {
    let mut lines = self.lines.clone();
    let Some(line) = lines.iter_mut().find(|l| l.cart_id == cart_id) else {
      return Ok(None);
    };
    let next = (i64::from(line.quantity) + delta).clamp(1, i64::from(u32::MAX));
    line.quantity = next as u32;
    let quantity = line.quantity;
    self.commit(lines)?;
    Ok(Some(quantity))
  }

  pub fn clear(&mut self) -> Result<()> {
    self.commit(Vec::new())
  }

  pub fn is_drawer_open(&self) -> bool {
    self.drawer_open
  }

  pub fn set_drawer_open(&mut self, open: bool) {
    self.drawer_open = open;
  }

  /// Saves `lines` and only then makes them the cart's contents. A failed
  /// save leaves the cart as it was.
  fn commit(&mut self, lines: Vec<CartItem>) -> Result<()> {
    let raw = serde_json::to_string(&lines)?;
    self.storage.set_item(&self.key, &raw)?;
    self.lines = lines;
    Ok(())
  }
}
