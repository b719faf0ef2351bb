// storefront/src/pipelines/checkout_pipeline.rs

use chrono::Utc;
use olira_flow::{Control, Flow, FlowContext, FlowRegistry, Outcome, Step};
use std::time::Duration;
use tracing::{event, info, instrument, warn, Level};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{NewOrder, Order, OrderStatus, PaymentMethod, PaymentStatus};
use crate::pipelines::contexts::{CheckoutCtx, ShippingForm};
use crate::state::AppState;

pub const CHECKOUT_FLOW: &str = "checkout";

/// `ORD-` followed by the last six digits of the Unix time in milliseconds.
pub fn order_number_at(unix_millis: i64) -> String {
  format!("ORD-{:06}", unix_millis.rem_euclid(1_000_000))
}

pub fn shipping_address(form: &ShippingForm) -> String {
  format!("{}, {} - {}", form.address.trim(), form.city.trim(), form.pincode.trim())
}

fn looks_like_email(email: &str) -> bool {
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.starts_with('.')
    && domain.contains('.')
    && !domain.ends_with('.')
    && !email.contains(' ')
}

pub fn validate_form(form: &ShippingForm) -> Result<()> {
  let required = [
    ("Full name", &form.full_name),
    ("Email", &form.email),
    ("Phone", &form.phone),
    ("Address", &form.address),
    ("City", &form.city),
    ("Pincode", &form.pincode),
  ];
  if let Some((label, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
    return Err(AppError::Validation(format!("{} is required.", label)));
  }
  if !looks_like_email(form.email.trim()) {
    return Err(AppError::Validation("Please enter a valid email address.".to_string()));
  }
  Ok(())
}

async fn validate_shipping_details(ctx: FlowContext<CheckoutCtx>) -> Result<Control> {
  let form = ctx.read().form.clone();
  validate_form(&form)?;
  event!(Level::DEBUG, customer = %form.full_name.trim(), "Shipping details accepted.");
  Ok(Control::Continue)
}

async fn snapshot_cart(ctx: FlowContext<CheckoutCtx>) -> Result<Control> {
  let (carts, session) = {
    let guard = ctx.read();
    (guard.app_state.carts.clone(), guard.session)
  };
  let (lines, total) = {
    let cart = carts.cart(session);
    let cart = cart.lock();
    (cart.lines().to_vec(), cart.total())
  };
  if lines.is_empty() {
    warn!(%session, "Checkout attempted with an empty cart.");
    return Err(AppError::Validation("Your cart is empty.".to_string()));
  }
  event!(Level::DEBUG, %session, lines = lines.len(), total, "Cart snapshot taken.");
  ctx.update(|c| {
    c.lines = lines;
    c.total = total;
  });
  Ok(Control::Continue)
}

async fn build_order_record(ctx: FlowContext<CheckoutCtx>) -> Result<Control> {
  let order_number = order_number_at(Utc::now().timestamp_millis());
  ctx.update(|c| {
    c.new_order = Some(NewOrder {
      order_number,
      customer_name: c.form.full_name.trim().to_string(),
      phone: c.form.phone.trim().to_string(),
      address: shipping_address(&c.form),
      items: c.lines.clone(),
      total: c.total,
      payment_method: PaymentMethod::Cod,
      payment_status: PaymentStatus::Pending,
      order_status: OrderStatus::Pending,
    });
  });
  Ok(Control::Continue)
}

async fn insert_order(ctx: FlowContext<CheckoutCtx>) -> Result<Control> {
  let (backend, new_order) = {
    let guard = ctx.read();
    (guard.app_state.backend.clone(), guard.new_order.clone())
  };
  let new_order =
    new_order.ok_or_else(|| AppError::Internal("Order record missing before insert.".to_string()))?;

  match backend.insert_order(&new_order).await {
    Ok(order) => {
      info!(order_number = %order.order_number, total = order.total, "Order placed.");
      ctx.write().order = Some(order);
      Ok(Control::Continue)
    }
    Err(e) => {
      event!(Level::ERROR, error = %e, order_number = %new_order.order_number, "Order insert failed.");
      Err(AppError::OrderFailed(e.detail()))
    }
  }
}

async fn schedule_cart_clear(ctx: FlowContext<CheckoutCtx>) -> Result<Control> {
  let (cart, delay_ms, session) = {
    let guard = ctx.read();
    (
      guard.app_state.carts.cart(guard.session),
      guard.app_state.config.cart_clear_delay_ms,
      guard.session,
    )
  };
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    match cart.lock().clear() {
      Ok(()) => event!(Level::DEBUG, %session, "Cart cleared after checkout."),
      Err(e) => warn!(%session, error = %e, "Could not clear cart after checkout."),
    }
  });
  ctx.write().clear_scheduled = true;
  Ok(Control::Continue)
}

pub fn register_checkout_flow(registry: &FlowRegistry<AppError>) -> Result<()> {
  let mut flow = Flow::<CheckoutCtx, AppError>::new(
    CHECKOUT_FLOW,
    vec![
      Step::required("validate_shipping_details"),
      Step::required("snapshot_cart"),
      Step::required("build_order_record"),
      Step::required("insert_order"),
      Step::required("schedule_cart_clear"),
    ],
  );
  flow.on("validate_shipping_details", validate_shipping_details)?;
  flow.on("snapshot_cart", snapshot_cart)?;
  flow.on("build_order_record", build_order_record)?;
  flow.on("insert_order", insert_order)?;
  flow.on("schedule_cart_clear", schedule_cart_clear)?;

  registry.register(flow);
  tracing::info!("Checkout flow registered.");
  Ok(())
}

/// Places the order for the cart of `session`. The cart is emptied shortly
/// after a successful insert.
#[instrument(name = "checkout::place_order", skip(state, form), err(Display))]
pub async fn place_order(state: &AppState, session: Uuid, form: ShippingForm) -> Result<Order> {
  let ctx = FlowContext::new(CheckoutCtx::new(state.clone(), session, form));
  match state.flows.run(ctx.clone()).await? {
    Outcome::Completed => ctx
      .write()
      .order
      .take()
      .ok_or_else(|| AppError::Internal("Checkout finished without an order.".to_string())),
    Outcome::Stopped => Err(AppError::Internal("Checkout stopped before completion.".to_string())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form() -> ShippingForm {
    ShippingForm {
      full_name: "Asha Rao".into(),
      email: "asha@example.com".into(),
      phone: "9876543210".into(),
      address: "12 Lake Road".into(),
      city: "Kochi".into(),
      pincode: "682001".into(),
    }
  }

  #[test]
  fn order_number_keeps_last_six_digits() {
    assert_eq!(order_number_at(1_718_000_123_456), "ORD-123456");
    assert_eq!(order_number_at(1_700_000_000_042), "ORD-000042");
  }

  #[test]
  fn address_joins_city_and_pincode() {
    assert_eq!(shipping_address(&form()), "12 Lake Road, Kochi - 682001");
  }

  #[test]
  fn form_requires_every_field_and_a_valid_email() {
    assert!(validate_form(&form()).is_ok());

    let mut missing = form();
    missing.city = "  ".into();
    match validate_form(&missing) {
      Err(AppError::Validation(m)) => assert_eq!(m, "City is required."),
      other => panic!("unexpected: {other:?}"),
    }

    for bad in ["asha", "asha@", "@example.com", "asha@example", "as ha@example.com"] {
      let mut f = form();
      f.email = bad.into();
      assert!(validate_form(&f).is_err(), "{bad}");
    }
  }
}
