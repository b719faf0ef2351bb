// storefront/src/backend/mod.rs

//! The data backend the storefront talks to: tables, admin users and the
//! order change feed.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{
  AdminUser, Category, NewCategory, NewOrder, Order, OrderStatusUpdate, Product, ProductImage,
};

pub use memory::MemoryBackend;
pub use postgres::PgBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductOrder {
  #[default]
  CreatedDesc,
  LaunchDesc,
}

#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
  /// Only products with `launch_date <= launched_by`.
  pub launched_by: Option<NaiveDate>,
  pub with_images: bool,
  pub order: ProductOrder,
}

impl ProductQuery {
  pub fn launched_by(today: NaiveDate) -> Self {
    Self {
      launched_by: Some(today),
      ..Self::default()
    }
  }
}

#[async_trait]
pub trait Backend: Send + Sync {
  async fn list_categories(&self) -> Result<Vec<Category>>;
  async fn insert_categories(&self, categories: &[NewCategory]) -> Result<Vec<Category>>;
  /// All or nothing. Fails with `AppError::ForeignKey` while products still reference any of them.
  async fn delete_categories(&self, ids: &[Uuid]) -> Result<u64>;

  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>>;
  async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>>;
  async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>>;
  /// Inserts or updates by `id`. Images on the value are ignored.
  async fn upsert_product(&self, product: &Product) -> Result<Product>;
  /// Deletes every image of the product and inserts `urls` with `order_index` = position.
  async fn replace_product_images(&self, product_id: Uuid, urls: &[String]) -> Result<Vec<ProductImage>>;
  async fn delete_product(&self, id: Uuid) -> Result<bool>;

  async fn insert_order(&self, order: &NewOrder) -> Result<Order>;
  /// Newest first.
  async fn list_orders(&self) -> Result<Vec<Order>>;
  async fn order_by_number(&self, order_number: &str) -> Result<Option<Order>>;
  async fn update_order_status(&self, id: Uuid, update: &OrderStatusUpdate) -> Result<Option<Order>>;
  async fn delete_order(&self, id: Uuid) -> Result<bool>;

  async fn admin_user_by_email(&self, email: &str) -> Result<Option<AdminUser>>;
  async fn upsert_admin_user(&self, email: &str, password_hash: &str) -> Result<AdminUser>;
}
