// storefront/src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{self, SortOrder};
use crate::errors::AppError;
use crate::search::SearchIndex;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct ShopQuery {
  pub category: Option<String>,
  pub sort: Option<SortOrder>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchQuery {
  #[serde(default)]
  pub q: String,
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.backend.list_categories().await?;
  Ok(HttpResponse::Ok().json(categories))
}

#[instrument(name = "handler::shop", skip(app_state))]
pub async fn shop_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ShopQuery>,
) -> Result<HttpResponse, AppError> {
  let page = catalog::shop_page(
    app_state.backend.as_ref(),
    app_state.today(),
    None,
    query.category.as_deref(),
    query.sort.unwrap_or_default(),
  )
  .await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::collection", skip(app_state))]
pub async fn collection_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  query: web::Query<ShopQuery>,
) -> Result<HttpResponse, AppError> {
  let slug = path.into_inner();
  let collection =
    catalog::collection(&slug).ok_or_else(|| AppError::NotFound(format!("Collection '{}' not found", slug)))?;
  let page = catalog::shop_page(
    app_state.backend.as_ref(),
    app_state.today(),
    Some(collection),
    query.category.as_deref(),
    query.sort.unwrap_or_default(),
  )
  .await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::product_detail", skip(app_state))]
pub async fn product_detail_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let detail = catalog::product_detail(app_state.backend.as_ref(), &path).await?;
  Ok(HttpResponse::Ok().json(detail))
}

#[instrument(name = "handler::search", skip(app_state))]
pub async fn search_handler(
  app_state: web::Data<AppState>,
  query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
  let index = SearchIndex::load(app_state.backend.as_ref()).await?;
  Ok(HttpResponse::Ok().json(index.respond(&query.q)))
}
