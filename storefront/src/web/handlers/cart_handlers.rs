// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cart::CartStore;
use crate::catalog::validate_add_to_cart;
use crate::errors::AppError;
use crate::models::CartItem;
use crate::state::AppState;
use crate::web::extractors::CartSession;

#[derive(Debug, Serialize)]
pub struct CartView {
  pub session: Uuid,
  pub lines: Vec<CartItem>,
  pub item_count: u32,
  pub total: i64,
  pub drawer_open: bool,
}

impl CartView {
  pub fn of(session: Uuid, cart: &CartStore) -> Self {
    Self {
      session,
      lines: cart.lines().to_vec(),
      item_count: cart.item_count(),
      total: cart.total(),
      drawer_open: cart.is_drawer_open(),
    }
  }

  pub fn empty(session: Uuid) -> Self {
    Self {
      session,
      lines: Vec::new(),
      item_count: 0,
      total: 0,
      drawer_open: false,
    }
  }

  /// Read-only view. A session started by this request has nothing saved,
  /// so no cart is opened for it.
  pub fn load(app_state: &AppState, session: &CartSession) -> Self {
    if session.is_new {
      return Self::empty(session.id);
    }
    let cart = app_state.carts.cart(session.id);
    let cart = cart.lock();
    Self::of(session.id, &cart)
  }
}

fn default_quantity() -> u32 {
  1
}

#[derive(Deserialize, Debug)]
pub struct AddToCartPayload {
  pub product_id: Uuid,
  pub size: Option<String>,
  #[serde(default = "default_quantity")]
  pub quantity: u32,
}

#[derive(Deserialize, Debug)]
pub struct QuantityPayload {
  pub delta: i64,
}

#[derive(Deserialize, Debug)]
pub struct DrawerPayload {
  pub open: bool,
}

#[instrument(name = "handler::get_cart", skip(app_state), fields(session = %session.id))]
pub async fn get_cart_handler(app_state: web::Data<AppState>, session: CartSession) -> Result<HttpResponse, AppError> {
  Ok(session.respond().json(CartView::load(&app_state, &session)))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, payload, session),
  fields(session = %session.id, product_id = %payload.product_id, quantity = payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddToCartPayload>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let product = app_state
    .backend
    .product_by_id(payload.product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product {} not found", payload.product_id)))?;
  let quantity = validate_add_to_cart(&product, payload.size.as_deref(), payload.quantity)?;
  let size = payload.size.as_deref().map(str::trim).unwrap_or_default();

  let (line, view) = {
    let cart = app_state.carts.cart(session.id);
    let mut cart = cart.lock();
    let line = cart.add(&product, size, quantity)?;
    (line, CartView::of(session.id, &cart))
  };
  info!(cart_id = %line.cart_id, line_quantity = line.quantity, "Added to cart.");
  Ok(session.respond().json(json!({ "line": line, "cart": view })))
}

#[instrument(name = "handler::update_cart_quantity", skip(app_state, session), fields(session = %session.id))]
pub async fn update_quantity_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<QuantityPayload>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let view = {
    let cart = app_state.carts.cart(session.id);
    let mut cart = cart.lock();
    if cart.update_quantity(cart_id, payload.delta)?.is_none() {
      return Err(AppError::NotFound(format!("Cart line {} not found", cart_id)));
    }
    CartView::of(session.id, &cart)
  };
  Ok(session.respond().json(view))
}

#[instrument(name = "handler::remove_cart_line", skip(app_state, session), fields(session = %session.id))]
pub async fn remove_line_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let view = {
    let cart = app_state.carts.cart(session.id);
    let mut cart = cart.lock();
    if !cart.remove(cart_id)? {
      return Err(AppError::NotFound(format!("Cart line {} not found", cart_id)));
    }
    CartView::of(session.id, &cart)
  };
  Ok(session.respond().json(view))
}

#[instrument(name = "handler::clear_cart", skip(app_state), fields(session = %session.id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let view = {
    let cart = app_state.carts.cart(session.id);
    let mut cart = cart.lock();
    cart.clear()?;
    CartView::of(session.id, &cart)
  };
  Ok(session.respond().json(view))
}

#[instrument(name = "handler::set_cart_drawer", skip(app_state, session), fields(session = %session.id))]
pub async fn set_drawer_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<DrawerPayload>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let view = {
    let cart = app_state.carts.cart(session.id);
    let mut cart = cart.lock();
    cart.set_drawer_open(payload.open);
    CartView::of(session.id, &cart)
  };
  Ok(session.respond().json(view))
}
