// storefront/src/web/handlers/content_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::contact;
use crate::errors::AppError;
use crate::state::AppState;

pub async fn health_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[instrument(name = "handler::track_order", skip(app_state))]
pub async fn track_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let tracked = contact::track_order(app_state.backend.as_ref(), &path).await?;
  Ok(HttpResponse::Ok().json(tracked))
}

#[instrument(name = "handler::content_page")]
pub async fn content_page_handler(path: web::Path<String>) -> Result<HttpResponse, AppError> {
  let page = contact::page(&path).ok_or_else(|| AppError::NotFound(format!("Page '{}' not found", path)))?;
  Ok(HttpResponse::Ok().json(page))
}

pub async fn whatsapp_handler(app_state: web::Data<AppState>) -> HttpResponse {
  let config = &app_state.config;
  HttpResponse::Ok().json(json!({
    "number": config.whatsapp_number,
    "url": contact::whatsapp_link(&config.whatsapp_number, &config.whatsapp_message),
  }))
}
