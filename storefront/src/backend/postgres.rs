// storefront/src/backend/postgres.rs

use async_trait::async_trait;
use sqlx::postgres::{PgListener, PgPool};
use sqlx::types::Json;
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{Backend, ProductOrder, ProductQuery};
use crate::errors::{AppError, Result};
use crate::models::{
  AdminUser, Category, NewCategory, NewOrder, Order, OrderStatusUpdate, Product, ProductImage,
};
use crate::realtime::{OrderChange, OrderFeed};

pub const ORDER_CHANNEL: &str = "order_changes";

const PRODUCT_COLUMNS: &str = "id, name, slug, price, sale_price, description, fabric, care, sizes, stock, \
   featured, launch_date, category_id, created_at";
const ORDER_COLUMNS: &str = "id, order_number, customer_name, phone, address, items, total, payment_method, \
   payment_status, order_status, created_at";

/// Maps constraint violations onto the errors the screens react to.
fn db_error(err: sqlx::Error) -> AppError {
  if let sqlx::Error::Database(db) = &err {
    if db.is_foreign_key_violation() {
      return AppError::ForeignKey(db.message().to_string());
    }
    if db.is_unique_violation() {
      return AppError::Conflict(db.message().to_string());
    }
  }
  AppError::Sqlx(err)
}

#[derive(Clone)]
pub struct PgBackend {
  pool: PgPool,
}

impl PgBackend {
  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPool::connect(database_url).await?;
    info!("Successfully connected to the database.");
    Ok(Self { pool })
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }

  /// Forwards `order_changes` notifications into `feed`, reconnecting after failures.
  pub fn spawn_order_listener(&self, feed: OrderFeed) -> JoinHandle<()> {
    let pool = self.pool.clone();
    tokio::spawn(async move {
      loop {
        if let Err(e) = listen_for_orders(&pool, &feed).await {
          error!(error = %e, "Order change listener failed; reconnecting.");
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
      }
    })
  }

  async fn load_images(&self, products: &mut [Product]) -> Result<()> {
    if products.is_empty() {
      return Ok(());
    }
    let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let images: Vec<ProductImage> = sqlx::query_as(
      "SELECT id, product_id, image_url, order_index FROM product_images \
       WHERE product_id = ANY($1) ORDER BY order_index",
    )
    .bind(&ids)
    .fetch_all(&self.pool)
    .await?;

    let mut by_product: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
    for image in images {
      by_product.entry(image.product_id).or_default().push(image);
    }
    for product in products.iter_mut() {
      product.images = by_product.remove(&product.id).unwrap_or_default();
    }
    Ok(())
  }

  async fn with_images(&self, found: Option<Product>) -> Result<Option<Product>> {
    let Some(product) = found else {
      return Ok(None);
    };
    let mut one = vec![product];
    self.load_images(&mut one).await?;
    Ok(one.pop())
  }
}

async fn listen_for_orders(pool: &PgPool, feed: &OrderFeed) -> Result<()> {
  let mut listener = PgListener::connect_with(pool).await?;
  listener.listen(ORDER_CHANNEL).await?;
  info!(channel = ORDER_CHANNEL, "Listening for order changes.");
  loop {
    let notification = listener.recv().await?;
    match serde_json::from_str::<OrderChange>(notification.payload()) {
      Ok(change) => feed.publish(change),
      Err(e) => warn!(error = %e, payload = notification.payload(), "Ignoring malformed order notification."),
    }
  }
}

#[async_trait]
impl Backend for PgBackend {
  #[instrument(name = "pg::list_categories", skip(self), err(Display))]
  async fn list_categories(&self) -> Result<Vec<Category>> {
    let rows = sqlx::query_as("SELECT id, name, slug, image_url FROM categories ORDER BY name")
      .fetch_all(&self.pool)
      .await?;
    Ok(rows)
  }

  #[instrument(name = "pg::insert_categories", skip(self, categories), fields(count = categories.len()), err(Display))]
  async fn insert_categories(&self, categories: &[NewCategory]) -> Result<Vec<Category>> {
    let mut tx = self.pool.begin().await?;
    let mut inserted = Vec::with_capacity(categories.len());
    for new in categories {
      let row: Category = sqlx::query_as(
        "INSERT INTO categories (id, name, slug) VALUES ($1, $2, $3) RETURNING id, name, slug, image_url",
      )
      .bind(Uuid::new_v4())
      .bind(&new.name)
      .bind(&new.slug)
      .fetch_one(&mut *tx)
      .await
      .map_err(db_error)?;
      inserted.push(row);
    }
    tx.commit().await?;
    Ok(inserted)
  }

  #[instrument(name = "pg::delete_categories", skip(self, ids), fields(count = ids.len()), err(Display))]
  async fn delete_categories(&self, ids: &[Uuid]) -> Result<u64> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ANY($1)")
      .bind(ids)
      .execute(&self.pool)
      .await
      .map_err(db_error)?;
    Ok(result.rows_affected())
  }

  #[instrument(name = "pg::list_products", skip(self), err(Display))]
  async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
    let order_by = match query.order {
      ProductOrder::CreatedDesc => "created_at DESC",
      ProductOrder::LaunchDesc => "launch_date DESC",
    };
    let mut products: Vec<Product> = match query.launched_by {
      Some(today) => {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE launch_date <= $1 ORDER BY {order_by}");
        sqlx::query_as(&sql).bind(today).fetch_all(&self.pool).await?
      }
      None => {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY {order_by}");
        sqlx::query_as(&sql).fetch_all(&self.pool).await?
      }
    };
    if query.with_images {
      self.load_images(&mut products).await?;
    }
    Ok(products)
  }

  async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1");
    let found = sqlx::query_as(&sql).bind(slug).fetch_optional(&self.pool).await?;
    self.with_images(found).await
  }

  async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    let found = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
    self.with_images(found).await
  }

  #[instrument(name = "pg::upsert_product", skip(self, product), fields(product_id = %product.id, slug = %product.slug), err(Display))]
  async fn upsert_product(&self, product: &Product) -> Result<Product> {
    let sql = format!(
      "INSERT INTO products (id, name, slug, price, sale_price, description, fabric, care, sizes, stock, \
         featured, launch_date, category_id, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
       ON CONFLICT (id) DO UPDATE SET \
         name = EXCLUDED.name, slug = EXCLUDED.slug, price = EXCLUDED.price, \
         sale_price = EXCLUDED.sale_price, description = EXCLUDED.description, \
         fabric = EXCLUDED.fabric, care = EXCLUDED.care, sizes = EXCLUDED.sizes, \
         stock = EXCLUDED.stock, featured = EXCLUDED.featured, \
         launch_date = EXCLUDED.launch_date, category_id = EXCLUDED.category_id \
       RETURNING {PRODUCT_COLUMNS}"
    );
    let row: Product = sqlx::query_as(&sql)
      .bind(product.id)
      .bind(&product.name)
      .bind(&product.slug)
      .bind(product.price)
      .bind(product.sale_price)
      .bind(&product.description)
      .bind(&product.fabric)
      .bind(&product.care)
      .bind(&product.sizes)
      .bind(product.stock)
      .bind(product.featured)
      .bind(product.launch_date)
      .bind(product.category_id)
      .bind(product.created_at)
      .fetch_one(&self.pool)
      .await
      .map_err(db_error)?;
    Ok(row)
  }

  #[instrument(name = "pg::replace_product_images", skip(self, urls), fields(count = urls.len()), err(Display))]
  async fn replace_product_images(&self, product_id: Uuid, urls: &[String]) -> Result<Vec<ProductImage>> {
    let mut tx = self.pool.begin().await?;
    sqlx::query("DELETE FROM product_images WHERE product_id = $1")
      .bind(product_id)
      .execute(&mut *tx)
      .await?;
    let mut inserted = Vec::with_capacity(urls.len());
    for (index, url) in urls.iter().enumerate() {
      let row: ProductImage = sqlx::query_as(
        "INSERT INTO product_images (id, product_id, image_url, order_index) VALUES ($1, $2, $3, $4) \
         RETURNING id, product_id, image_url, order_index",
      )
      .bind(Uuid::new_v4())
      .bind(product_id)
      .bind(url)
      .bind(index as i32)
      .fetch_one(&mut *tx)
      .await
      .map_err(db_error)?;
      inserted.push(row);
    }
    tx.commit().await?;
    Ok(inserted)
  }

  async fn delete_product(&self, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(db_error)?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "pg::insert_order", skip(self, order), fields(order_number = %order.order_number), err(Display))]
  async fn insert_order(&self, order: &NewOrder) -> Result<Order> {
    let sql = format!(
      "INSERT INTO orders (id, order_number, customer_name, phone, address, items, total, \
         payment_method, payment_status, order_status) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {ORDER_COLUMNS}"
    );
    let row: Order = sqlx::query_as(&sql)
      .bind(Uuid::new_v4())
      .bind(&order.order_number)
      .bind(&order.customer_name)
      .bind(&order.phone)
      .bind(&order.address)
      .bind(Json(&order.items))
      .bind(order.total)
      .bind(order.payment_method)
      .bind(order.payment_status)
      .bind(order.order_status)
      .fetch_one(&self.pool)
      .await
      .map_err(db_error)?;
    Ok(row)
  }

  async fn list_orders(&self) -> Result<Vec<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC");
    Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
  }

  async fn order_by_number(&self, order_number: &str) -> Result<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1 ORDER BY created_at DESC LIMIT 1");
    Ok(sqlx::query_as(&sql).bind(order_number).fetch_optional(&self.pool).await?)
  }

  #[instrument(name = "pg::update_order_status", skip(self), err(Display))]
  async fn update_order_status(&self, id: Uuid, update: &OrderStatusUpdate) -> Result<Option<Order>> {
    let sql = format!(
      "UPDATE orders SET order_status = COALESCE($2, order_status), \
         payment_status = COALESCE($3, payment_status) \
       WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    );
    Ok(
      sqlx::query_as(&sql)
        .bind(id)
        .bind(update.order_status)
        .bind(update.payment_status)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  async fn delete_order(&self, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn admin_user_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
    Ok(
      sqlx::query_as("SELECT id, email, password_hash, created_at FROM admin_users WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  async fn upsert_admin_user(&self, email: &str, password_hash: &str) -> Result<AdminUser> {
    Ok(
      sqlx::query_as(
        "INSERT INTO admin_users (id, email, password_hash) VALUES ($1, $2, $3) \
         ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash \
         RETURNING id, email, password_hash, created_at",
      )
      .bind(Uuid::new_v4())
      .bind(email)
      .bind(password_hash)
      .fetch_one(&self.pool)
      .await?,
    )
  }
}
