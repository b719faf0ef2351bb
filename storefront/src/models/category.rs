// storefront/src/models/category.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  #[serde(default)]
  pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
  pub name: String,
  pub slug: String,
}

impl NewCategory {
  pub fn new(name: &str, slug: &str) -> Self {
    Self {
      name: name.to_string(),
      slug: slug.to_string(),
    }
  }
}
