// storefront/src/services/seed.rs

//! Start-up data: the admin account from the environment and, on request,
//! a small demo catalog.

use chrono::{Days, NaiveDate, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::admin::products::STANDARD_CATEGORIES;
use crate::backend::Backend;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{AdminUser, NewCategory, Product};
use crate::services::auth_service;

/// Creates or re-keys the admin account named in the configuration.
#[instrument(name = "seed::admin_user", skip_all, err(Display))]
pub async fn seed_admin(backend: &dyn Backend, config: &AppConfig) -> Result<Option<AdminUser>> {
  let (Some(email), Some(password)) = (config.admin_email.as_deref(), config.admin_password.as_deref()) else {
    info!("No admin credentials configured, skipping admin seed.");
    return Ok(None);
  };
  let hash = auth_service::hash_password(password)?;
  let user = backend.upsert_admin_user(email.trim(), &hash).await?;
  info!(user_id = %user.id, "Admin account ready.");
  Ok(Some(user))
}

struct DemoProduct {
  name: &'static str,
  slug: &'static str,
  price: i64,
  sale_price: Option<i64>,
  category: &'static str,
  featured: bool,
  fabric: &'static str,
  /// Days from today; negative is already launched.
  launch_offset: i64,
}

const DEMO_PRODUCTS: [DemoProduct; 6] = [
  DemoProduct {
    name: "Ivory Tiered Maxi",
    slug: "ivory-tiered-maxi",
    price: 2499,
    sale_price: Some(1999),
    category: "maxi-dress",
    featured: true,
    fabric: "Cotton mulmul",
    launch_offset: -30,
  },
  DemoProduct {
    name: "Sage Kurti Set",
    slug: "sage-kurti-set",
    price: 1899,
    sale_price: None,
    category: "kurti-set",
    featured: true,
    fabric: "Rayon",
    launch_offset: -14,
  },
  DemoProduct {
    name: "Linen Button Shirt",
    slug: "linen-button-shirt",
    price: 1299,
    sale_price: None,
    category: "shirts",
    featured: false,
    fabric: "Linen",
    launch_offset: -7,
  },
  DemoProduct {
    name: "Blush Wrap Top",
    slug: "blush-wrap-top",
    price: 899,
    sale_price: Some(749),
    category: "tops",
    featured: true,
    fabric: "Georgette",
    launch_offset: -3,
  },
  DemoProduct {
    name: "Nursing Maxi Dress",
    slug: "nursing-maxi-dress",
    price: 2199,
    sale_price: None,
    category: "maternity-dress",
    featured: false,
    fabric: "Cotton jersey",
    launch_offset: -1,
  },
  DemoProduct {
    name: "Festive Anarkali Set",
    slug: "festive-anarkali-set",
    price: 3499,
    sale_price: None,
    category: "kurti-set",
    featured: true,
    fabric: "Chanderi silk",
    launch_offset: 10,
  },
];

fn shift(today: NaiveDate, offset: i64) -> NaiveDate {
  let days = Days::new(offset.unsigned_abs());
  let shifted = if offset < 0 { today.checked_sub_days(days) } else { today.checked_add_days(days) };
  shifted.unwrap_or(today)
}

/// Inserts the standard categories and demo products when the catalog is empty.
#[instrument(name = "seed::demo_catalog", skip(backend), err(Display))]
pub async fn seed_demo_catalog(backend: &dyn Backend, today: NaiveDate) -> Result<usize> {
  if !backend.list_products(&Default::default()).await?.is_empty() {
    info!("Catalog already has products, skipping demo seed.");
    return Ok(0);
  }

  let mut categories = backend.list_categories().await?;
  let missing: Vec<NewCategory> = STANDARD_CATEGORIES
    .iter()
    .filter(|(_, slug)| !categories.iter().any(|c| c.slug == *slug))
    .map(|(name, slug)| NewCategory::new(name, slug))
    .collect();
  if !missing.is_empty() {
    categories.extend(backend.insert_categories(&missing).await?);
  }

  let mut inserted = 0;
  for demo in DEMO_PRODUCTS.iter() {
    let category_id = categories.iter().find(|c| c.slug == demo.category).map(|c| c.id);
    if category_id.is_none() {
      warn!(slug = demo.slug, category = demo.category, "Demo category missing.");
    }
    let product = Product {
      id: Uuid::new_v4(),
      name: demo.name.to_string(),
      slug: demo.slug.to_string(),
      price: demo.price,
      sale_price: demo.sale_price,
      description: Some(format!("{} in breathable {}.", demo.name, demo.fabric.to_lowercase())),
      fabric: Some(demo.fabric.to_string()),
      care: Some("Gentle hand wash. Dry in shade.".to_string()),
      sizes: ["S", "M", "L", "XL"].iter().map(|s| s.to_string()).collect(),
      stock: 10,
      featured: demo.featured,
      launch_date: shift(today, demo.launch_offset),
      category_id,
      created_at: Utc::now(),
      images: Vec::new(),
    };
    backend.upsert_product(&product).await?;
    inserted += 1;
  }
  info!(inserted, "Demo catalog seeded.");
  Ok(inserted)
}
