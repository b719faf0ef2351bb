// storefront/src/backend/memory.rs

//! Process-local backend used by tests and `BACKEND=memory`.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use sqlx::types::Json;
use std::cmp::Reverse;
use uuid::Uuid;

use super::{Backend, ProductOrder, ProductQuery};
use crate::errors::{AppError, Result};
use crate::models::{
  AdminUser, Category, NewCategory, NewOrder, Order, OrderStatusUpdate, Product, ProductImage,
};
use crate::realtime::{ChangeOp, OrderChange, OrderFeed};

#[derive(Default)]
struct Tables {
  categories: Vec<Category>,
  products: Vec<Product>,
  images: Vec<ProductImage>,
  orders: Vec<Order>,
  admins: Vec<AdminUser>,
}

pub struct MemoryBackend {
  tables: RwLock<Tables>,
  feed: OrderFeed,
  outage: RwLock<Option<String>>,
}

impl MemoryBackend {
  pub fn new(feed: OrderFeed) -> Self {
    Self {
      tables: RwLock::new(Tables::default()),
      feed,
      outage: RwLock::new(None),
    }
  }

  /// While set, every call fails with this message.
  pub fn set_outage(&self, message: Option<&str>) {
    *self.outage.write() = message.map(str::to_string);
  }

  fn check_available(&self) -> Result<()> {
    match self.outage.read().as_ref() {
      Some(message) => Err(AppError::Internal(message.clone())),
      None => Ok(()),
    }
  }

  fn attach_images(tables: &Tables, mut product: Product) -> Product {
    let mut images: Vec<ProductImage> = tables
      .images
      .iter()
      .filter(|img| img.product_id == product.id)
      .cloned()
      .collect();
    images.sort_by_key(|img| img.order_index);
    product.images = images;
    product
  }
}

#[async_trait]
impl Backend for MemoryBackend {
  async fn list_categories(&self) -> Result<Vec<Category>> {
    self.check_available()?;
    Ok(self.tables.read().categories.clone())
  }

  async fn insert_categories(&self, categories: &[NewCategory]) -> Result<Vec<Category>> {
    self.check_available()?;
    let mut tables = self.tables.write();
    if let Some(dupe) = categories
      .iter()
      .find(|new| tables.categories.iter().any(|c| c.slug == new.slug))
    {
      return Err(AppError::Conflict(format!(
        "duplicate key value violates unique constraint \"categories_slug_key\" ({})",
        dupe.slug
      )));
    }
    let inserted: Vec<Category> = categories
      .iter()
      .map(|new| Category {
        id: Uuid::new_v4(),
        name: new.name.clone(),
        slug: new.slug.clone(),
        image_url: None,
      })
      .collect();
    tables.categories.extend(inserted.iter().cloned());
    Ok(inserted)
  }

  async fn delete_categories(&self, ids: &[Uuid]) -> Result<u64> {
    self.check_available()?;
    let mut tables = self.tables.write();
    let referenced = tables
      .products
      .iter()
      .any(|p| p.category_id.map_or(false, |cid| ids.contains(&cid)));
    if referenced {
      return Err(AppError::ForeignKey(
        "update or delete on table \"categories\" violates foreign key constraint \"products_category_id_fkey\""
          .to_string(),
      ));
    }
    let before = tables.categories.len();
    tables.categories.retain(|c| !ids.contains(&c.id));
    Ok((before - tables.categories.len()) as u64)
  }

  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    self.check_available()?;
    let tables = self.tables.read();
    let mut products: Vec<Product> = tables
      .products
      .iter()
      .filter(|p| query.launched_by.map_or(true, |today| p.is_launched(today)))
      .cloned()
      .collect();
    match query.order {
      ProductOrder::CreatedDesc => products.sort_by_key(|p| Reverse(p.created_at)),
      ProductOrder::LaunchDesc => products.sort_by_key(|p| Reverse(p.launch_date)),
    }
    if query.with_images {
      products = products.into_iter().map(|p| Self::attach_images(&tables, p)).collect();
    }
    Ok(products)
  }

  async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
    self.check_available()?;
    let tables = self.tables.read();
    let found = tables.products.iter().find(|p| p.slug == slug).cloned();
    Ok(found.map(|p| Self::attach_images(&tables, p)))
  }

  async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>> {
    self.check_available()?;
    let tables = self.tables.read();
    let found = tables.products.iter().find(|p| p.id == id).cloned();
    Ok(found.map(|p| Self::attach_images(&tables, p)))
  }

  async fn upsert_product(&self, product: &Product) -> Result<Product> {
    self.check_available()?;
    let mut tables = self.tables.write();
    if tables.products.iter().any(|p| p.slug == product.slug && p.id != product.id) {
      return Err(AppError::Conflict(
        "duplicate key value violates unique constraint \"products_slug_key\"".to_string(),
      ));
    }
    if let Some(cid) = product.category_id {
      if !tables.categories.iter().any(|c| c.id == cid) {
        return Err(AppError::ForeignKey(
          "insert or update on table \"products\" violates foreign key constraint \"products_category_id_fkey\""
            .to_string(),
        ));
      }
    }
    let mut row = product.clone();
    row.images.clear();
    match tables.products.iter_mut().find(|p| p.id == row.id) {
      Some(existing) => {
        row.created_at = existing.created_at;
        *existing = row.clone();
      }
      None => tables.products.push(row.clone()),
    }
    Ok(row)
  }

  async fn replace_product_images(&self, product_id: Uuid, urls: &[String]) -> Result<Vec<ProductImage>> {
    self.check_available()?;
    let mut tables = self.tables.write();
    tables.images.retain(|img| img.product_id != product_id);
    let inserted: Vec<ProductImage> = urls
      .iter()
      .enumerate()
      .map(|(index, url)| ProductImage {
        id: Uuid::new_v4(),
        product_id,
        image_url: url.clone(),
        order_index: index as i32,
      })
      .collect();
    tables.images.extend(inserted.iter().cloned());
    Ok(inserted)
  }

  async fn delete_product(&self, id: Uuid) -> Result<bool> {
    self.check_available()?;
    let mut tables = self.tables.write();
    let before = tables.products.len();
    tables.products.retain(|p| p.id != id);
    tables.images.retain(|img| img.product_id != id);
    Ok(tables.products.len() != before)
  }

  async fn insert_order(&self, order: &NewOrder) -> Result<Order> {
    self.check_available()?;
    let row = Order {
      id: Uuid::new_v4(),
      order_number: order.order_number.clone(),
      customer_name: order.customer_name.clone(),
      phone: order.phone.clone(),
      address: order.address.clone(),
      items: Json(order.items.clone()),
      total: order.total,
      payment_method: order.payment_method,
      payment_status: order.payment_status,
      order_status: order.order_status,
      created_at: Utc::now(),
    };
    self.tables.write().orders.push(row.clone());
    self.feed.publish(OrderChange::new(ChangeOp::Insert, row.id));
    Ok(row)
  }

  async fn list_orders(&self) -> Result<Vec<Order>> {
    self.check_available()?;
    let mut orders = self.tables.read().orders.clone();
    orders.sort_by_key(|o| Reverse(o.created_at));
    Ok(orders)
  }

  async fn order_by_number(&self, order_number: &str) -> Result<Option<Order>> {
    self.check_available()?;
    let tables = self.tables.read();
    Ok(tables.orders.iter().find(|o| o.order_number == order_number).cloned())
  }

  async fn update_order_status(&self, id: Uuid, update: &OrderStatusUpdate) -> Result<Option<Order>> {
    self.check_available()?;
    let updated = {
      let mut tables = self.tables.write();
      tables.orders.iter_mut().find(|o| o.id == id).map(|order| {
        if let Some(status) = update.order_status {
          order.order_status = status;
        }
        if let Some(status) = update.payment_status {
          order.payment_status = status;
        }
        order.clone()
      })
    };
    if updated.is_some() {
      self.feed.publish(OrderChange::new(ChangeOp::Update, id));
    }
    Ok(updated)
  }

  async fn delete_order(&self, id: Uuid) -> Result<bool> {
    self.check_available()?;
    let removed = {
      let mut tables = self.tables.write();
      let before = tables.orders.len();
      tables.orders.retain(|o| o.id != id);
      tables.orders.len() != before
    };
    if removed {
      self.feed.publish(OrderChange::new(ChangeOp::Delete, id));
    }
    Ok(removed)
  }

  async fn admin_user_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
    self.check_available()?;
    let tables = self.tables.read();
    Ok(tables.admins.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
  }

  async fn upsert_admin_user(&self, email: &str, password_hash: &str) -> Result<AdminUser> {
    self.check_available()?;
    let mut tables = self.tables.write();
    if let Some(existing) = tables.admins.iter_mut().find(|u| u.email.eq_ignore_ascii_case(email)) {
      existing.password_hash = password_hash.to_string();
      return Ok(existing.clone());
    }
    let user = AdminUser {
      id: Uuid::new_v4(),
      email: email.to_string(),
      password_hash: password_hash.to_string(),
      created_at: Utc::now(),
    };
    tables.admins.push(user.clone());
    Ok(user)
  }
}
