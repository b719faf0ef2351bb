// tests/common/mod.rs
#![allow(dead_code)]

use chrono::{Days, NaiveDate, Utc};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

use olira_storefront::backend::{Backend, MemoryBackend};
use olira_storefront::cart::{CartStorage, MemoryCartStorage};
use olira_storefront::config::AppConfig;
use olira_storefront::models::{Category, NewCategory, Product};
use olira_storefront::pipelines::ShippingForm;
use olira_storefront::realtime::OrderFeed;
use olira_storefront::services::seed;
use olira_storefront::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@oliraa.in";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

pub struct TestApp {
  pub state: AppState,
  pub backend: Arc<MemoryBackend>,
  pub storage: Arc<MemoryCartStorage>,
}

pub fn test_config() -> AppConfig {
  AppConfig {
    cart_clear_delay_ms: 20,
    admin_email: Some(ADMIN_EMAIL.to_string()),
    admin_password: Some(ADMIN_PASSWORD.to_string()),
    ..AppConfig::default()
  }
}

pub fn test_app() -> TestApp {
  setup_tracing();
  let feed = OrderFeed::new();
  let backend = Arc::new(MemoryBackend::new(feed.clone()));
  let storage = Arc::new(MemoryCartStorage::new());
  let state = AppState::new(
    test_config(),
    Arc::clone(&backend) as Arc<dyn Backend>,
    Arc::clone(&storage) as Arc<dyn CartStorage>,
    feed,
  )
  .expect("state builds");
  TestApp { state, backend, storage }
}

pub async fn test_app_with_admin() -> TestApp {
  let app = test_app();
  seed::seed_admin(app.state.backend.as_ref(), &app.state.config)
    .await
    .expect("admin seeded");
  app
}

pub fn today() -> NaiveDate {
  Utc::now().date_naive()
}

pub fn days_from_today(offset: i64) -> NaiveDate {
  let days = Days::new(offset.unsigned_abs());
  if offset < 0 {
    today() - days
  } else {
    today() + days
  }
}

/// A launched product in every default size with stock 10.
pub fn product(name: &str, price: i64, sale_price: Option<i64>) -> Product {
  Product {
    id: Uuid::new_v4(),
    name: name.to_string(),
    slug: name.to_lowercase().replace(' ', "-"),
    price,
    sale_price,
    description: None,
    fabric: None,
    care: None,
    sizes: ["S", "M", "L", "XL"].iter().map(|s| s.to_string()).collect(),
    stock: 10,
    featured: false,
    launch_date: days_from_today(-1),
    category_id: None,
    created_at: Utc::now(),
    images: Vec::new(),
  }
}

pub async fn insert_product(backend: &dyn Backend, product: Product) -> Product {
  backend.upsert_product(&product).await.expect("product inserted")
}

pub async fn insert_category(backend: &dyn Backend, name: &str, slug: &str) -> Category {
  backend
    .insert_categories(&[NewCategory::new(name, slug)])
    .await
    .expect("category inserted")
    .remove(0)
}

pub fn shipping_form() -> ShippingForm {
  ShippingForm {
    full_name: "Asha Rao".to_string(),
    email: "asha@example.com".to_string(),
    phone: "9876543210".to_string(),
    address: "12 Lake Road".to_string(),
    city: "Kochi".to_string(),
    pincode: "682001".to_string(),
  }
}
