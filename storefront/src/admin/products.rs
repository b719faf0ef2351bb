// storefront/src/admin/products.rs

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::backend::{Backend, ProductQuery};
use crate::catalog::slugify;
use crate::errors::{AppError, Result};
use crate::models::{Category, NewCategory, Product, ProductDraft};

pub const UNCATEGORIZED: &str = "Uncategorized";

/// `(name, slug)` of the categories the shop is organised around.
pub const STANDARD_CATEGORIES: [(&str, &str); 5] = [
  ("Maxi Dresses", "maxi-dress"),
  ("Kurti Sets", "kurti-set"),
  ("Tops", "tops"),
  ("Shirts", "shirts"),
  ("Maternity Dresses", "maternity-dress"),
];

pub const LINKED_CATEGORY_WARNING: &str = "Some categories could not be deleted because they have products linked to them. Please reassign those products first.";

#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
  pub product: Product,
  pub category_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryReset {
  pub deleted: u64,
  pub inserted: usize,
  pub warning: Option<String>,
}

#[derive(Default)]
struct Snapshot {
  products: Vec<Product>,
  categories: Vec<Category>,
}

pub struct ProductsBoard {
  backend: Arc<dyn Backend>,
  snapshot: RwLock<Snapshot>,
}

impl ProductsBoard {
  pub fn new(backend: Arc<dyn Backend>) -> Self {
    Self {
      backend,
      snapshot: RwLock::new(Snapshot::default()),
    }
  }

  /// Loads every product, newest first, launched or not, plus the categories.
  #[instrument(name = "ProductsBoard::refresh", skip(self), err(Display))]
  pub async fn refresh(&self) -> Result<usize> {
    let products = self.backend.list_products(&ProductQuery::default()).await?;
    let categories = self.backend.list_categories().await?;
    let count = products.len();
    *self.snapshot.write() = Snapshot { products, categories };
    Ok(count)
  }

  pub fn categories(&self) -> Vec<Category> {
    self.snapshot.read().categories.clone()
  }

  /// Rows whose name contains `term`, case-insensitively.
  pub fn search(&self, term: &str) -> Vec<ProductRow> {
    let needle = term.trim().to_lowercase();
    let snapshot = self.snapshot.read();
    snapshot
      .products
      .iter()
      .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
      .map(|p| ProductRow {
        category_name: p
          .category_id
          .and_then(|id| snapshot.categories.iter().find(|c| c.id == id))
          .map_or_else(|| UNCATEGORIZED.to_string(), |c| c.name.clone()),
        product: p.clone(),
      })
      .collect()
  }

  /// Upserts the draft. The image list replaces the stored one only when the
  /// draft carries images.
  #[instrument(name = "ProductsBoard::save", skip(self, draft), fields(name = %draft.name), err(Display))]
  pub async fn save(&self, draft: ProductDraft, today: NaiveDate) -> Result<Product> {
    let price = draft.validate()?;
    let slug = draft
      .slug
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map_or_else(|| slugify(&draft.name), str::to_string);
    let existing = match draft.id {
      Some(id) => self.backend.product_by_id(id).await?,
      None => None,
    };

    let row = Product {
      id: draft.id.unwrap_or_else(Uuid::new_v4),
      name: draft.name.trim().to_string(),
      slug,
      price,
      sale_price: draft.sale_price,
      description: draft.description,
      fabric: draft.fabric,
      care: draft.care,
      sizes: draft.sizes,
      stock: draft.stock,
      featured: draft.featured,
      launch_date: draft.launch_date.unwrap_or(today),
      category_id: draft.category_id,
      created_at: existing.as_ref().map_or_else(Utc::now, |p| p.created_at),
      images: Vec::new(),
    };
    let mut saved = self.backend.upsert_product(&row).await?;

    saved.images = if draft.images.is_empty() {
      existing.map(|p| p.images).unwrap_or_default()
    } else {
      self.backend.replace_product_images(saved.id, &draft.images).await?
    };
    info!(id = %saved.id, slug = %saved.slug, images = saved.images.len(), "Product saved.");
    self.refresh().await?;
    Ok(saved)
  }

  #[instrument(name = "ProductsBoard::delete", skip(self), err(Display))]
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    if !self.backend.delete_product(id).await? {
      return Err(AppError::NotFound(format!("Product {} not found", id)));
    }
    self.refresh().await?;
    Ok(())
  }

  /// Brings the category table to the standard set. Categories still
  /// referenced by products survive and the result carries a warning.
  #[instrument(name = "ProductsBoard::reset_categories", skip(self), err(Display))]
  pub async fn reset_categories(&self) -> Result<CategoryReset> {
    let current = self.backend.list_categories().await?;
    let is_standard = |slug: &str| STANDARD_CATEGORIES.iter().any(|(_, s)| *s == slug);

    let to_delete: Vec<Uuid> = current.iter().filter(|c| !is_standard(&c.slug)).map(|c| c.id).collect();
    let to_add: Vec<NewCategory> = STANDARD_CATEGORIES
      .iter()
      .filter(|(_, slug)| !current.iter().any(|c| c.slug == *slug))
      .map(|(name, slug)| NewCategory::new(name, slug))
      .collect();

    let mut outcome = CategoryReset::default();
    if !to_delete.is_empty() {
      match self.backend.delete_categories(&to_delete).await {
        Ok(deleted) => outcome.deleted = deleted,
        Err(AppError::ForeignKey(detail)) => {
          warn!(detail = %detail, "Linked categories kept.");
          outcome.warning = Some(LINKED_CATEGORY_WARNING.to_string());
        }
        Err(e) => return Err(e),
      }
    }
    if !to_add.is_empty() {
      outcome.inserted = self.backend.insert_categories(&to_add).await?.len();
    }
    info!(deleted = outcome.deleted, inserted = outcome.inserted, "Categories synchronized.");
    self.refresh().await?;
    Ok(outcome)
  }
}
