// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::pipelines::{place_order, ShippingForm};
use crate::state::AppState;
use crate::web::extractors::CartSession;
use crate::web::handlers::cart_handlers::CartView;

/// The order summary next to the shipping form. An empty cart gives the empty state.
#[instrument(name = "handler::checkout_summary", skip(app_state), fields(session = %session.id))]
pub async fn checkout_summary_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let view = CartView::load(&app_state, &session);
  if view.lines.is_empty() {
    return Ok(session.respond().json(json!({
      "empty": true,
      "message": "Your cart is empty",
    })));
  }
  Ok(session.respond().json(json!({
    "empty": false,
    "shipping": "Free",
    "total": view.total,
    "cart": view,
    "payment_method": "COD",
  })))
}

#[instrument(name = "handler::place_order", skip(app_state, form), fields(session = %session.id))]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  form: web::Json<ShippingForm>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let order = place_order(&app_state, session.id, form.into_inner()).await?;
  info!(order_number = %order.order_number, "Checkout completed.");
  let mut response = session.respond();
  Ok(response.status(actix_web::http::StatusCode::CREATED).json(json!({
    "message": "Order placed successfully",
    "order_number": order.order_number,
    "total": order.total,
    "order": order,
  })))
}
