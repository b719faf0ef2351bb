// storefront/src/web/handlers/admin_handlers.rs

use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::web::Bytes;
use actix_web::{web, HttpResponse};
use futures_util::stream;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::admin::StatusTab;
use crate::errors::{AppError, LOGIN_REDIRECT};
use crate::models::{OrderStatusUpdate, ProductDraft};
use crate::realtime::OrderChange;
use crate::services::auth_client::AuthEvent;
use crate::state::AppState;
use crate::web::extractors::AdminSession;

#[derive(Deserialize, Debug, Default)]
pub struct ProductSearch {
  #[serde(default)]
  pub search: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct OrderFilter {
  #[serde(default)]
  pub status: StatusTab,
  #[serde(default)]
  pub search: String,
}

#[instrument(name = "handler::admin_dashboard", skip_all)]
pub async fn dashboard_handler(app_state: web::Data<AppState>, _admin: AdminSession) -> HttpResponse {
  let stats = app_state.dashboard.refresh(app_state.today()).await;
  HttpResponse::Ok().json(stats)
}

#[instrument(name = "handler::admin_products", skip(app_state, _admin))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ProductSearch>,
  _admin: AdminSession,
) -> Result<HttpResponse, AppError> {
  app_state.products.refresh().await?;
  Ok(HttpResponse::Ok().json(json!({
    "products": app_state.products.search(&query.search),
    "categories": app_state.products.categories(),
  })))
}

/// A draft with the form defaults, for the "add product" form.
pub async fn blank_product_handler(app_state: web::Data<AppState>, _admin: AdminSession) -> HttpResponse {
  HttpResponse::Ok().json(ProductDraft::blank(app_state.today()))
}

#[instrument(name = "handler::admin_save_product", skip_all, fields(name = %draft.name))]
pub async fn save_product_handler(
  app_state: web::Data<AppState>,
  draft: web::Json<ProductDraft>,
  _admin: AdminSession,
) -> Result<HttpResponse, AppError> {
  let product = app_state.products.save(draft.into_inner(), app_state.today()).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::admin_delete_product", skip(app_state, _admin))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  _admin: AdminSession,
) -> Result<HttpResponse, AppError> {
  app_state.products.delete(path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}

pub async fn list_categories_handler(
  app_state: web::Data<AppState>,
  _admin: AdminSession,
) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(app_state.backend.list_categories().await?))
}

#[instrument(name = "handler::admin_reset_categories", skip_all)]
pub async fn reset_categories_handler(
  app_state: web::Data<AppState>,
  _admin: AdminSession,
) -> Result<HttpResponse, AppError> {
  let reset = app_state.products.reset_categories().await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Categories synchronized!",
    "deleted": reset.deleted,
    "inserted": reset.inserted,
    "warning": reset.warning,
  })))
}

#[instrument(name = "handler::admin_orders", skip(app_state, _admin))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<OrderFilter>,
  _admin: AdminSession,
) -> Result<HttpResponse, AppError> {
  app_state.orders.refresh().await?;
  Ok(HttpResponse::Ok().json(app_state.orders.view(query.status, &query.search)))
}

#[instrument(name = "handler::admin_update_order", skip(app_state, _admin))]
pub async fn update_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  update: web::Json<OrderStatusUpdate>,
  _admin: AdminSession,
) -> Result<HttpResponse, AppError> {
  let order = app_state.orders.update_status(path.into_inner(), &update).await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::admin_delete_order", skip(app_state, _admin))]
pub async fn delete_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  _admin: AdminSession,
) -> Result<HttpResponse, AppError> {
  app_state.orders.delete(path.into_inner()).await?;
  Ok(HttpResponse::NoContent().finish())
}

pub fn sse_frame(event: &str, data: &serde_json::Value) -> Bytes {
  Bytes::from(format!("event: {}\ndata: {}\n\n", event, data))
}

struct ChangeStream {
  changes: broadcast::Receiver<OrderChange>,
  auth: broadcast::Receiver<AuthEvent>,
  token: String,
  done: bool,
}

enum Next {
  Change(OrderChange),
  Lagged(u64),
  SignedOut,
  Ignore,
  Closed,
}

impl ChangeStream {
  async fn next_frame(&mut self) -> Option<Bytes> {
    loop {
      if self.done {
        return None;
      }
      // Changes already queued are sent before a sign-out closes the stream.
      let next = tokio::select! {
        biased;
        change = self.changes.recv() => match change {
          Ok(change) => Next::Change(change),
          Err(RecvError::Lagged(skipped)) => Next::Lagged(skipped),
          Err(RecvError::Closed) => Next::Closed,
        },
        event = self.auth.recv() => match event {
          Ok(AuthEvent::SignedOut { access_token, .. }) if access_token == self.token => Next::SignedOut,
          Ok(_) | Err(RecvError::Lagged(_)) => Next::Ignore,
          Err(RecvError::Closed) => Next::Closed,
        },
      };
      match next {
        Next::Change(change) => {
          let data = serde_json::to_value(&change).unwrap_or_default();
          return Some(sse_frame("order_change", &data));
        }
        Next::Lagged(skipped) => {
          warn!(skipped, "Change stream lagged, asking client to refetch.");
          return Some(sse_frame("resync", &json!({ "skipped": skipped })));
        }
        Next::SignedOut => {
          debug!("Session signed out, closing change stream.");
          self.done = true;
          return Some(sse_frame("redirect", &json!({ "redirect": LOGIN_REDIRECT })));
        }
        Next::Ignore => continue,
        Next::Closed => return None,
      }
    }
  }
}

/// Server-sent events for every order change. The stream ends with a
/// `redirect` event when this admin session signs out.
#[instrument(name = "handler::admin_order_changes", skip_all, fields(user_id = %admin.0.user_id))]
pub async fn order_changes_handler(app_state: web::Data<AppState>, admin: AdminSession) -> HttpResponse {
  let state = ChangeStream {
    changes: app_state.feed.subscribe(),
    auth: app_state.auth.on_auth_state_change(),
    token: admin.0.access_token,
    done: false,
  };
  info!("Admin subscribed to order changes.");
  let body = stream::unfold(state, |mut state| async move {
    let frame = state.next_frame().await?;
    Some((Ok::<_, AppError>(frame), state))
  });
  HttpResponse::Ok()
    .insert_header((CONTENT_TYPE, "text/event-stream"))
    .insert_header((CACHE_CONTROL, "no-cache"))
    .streaming(body)
}
