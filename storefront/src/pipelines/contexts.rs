// storefront/src/pipelines/contexts.rs

//! Data carried through each registered flow.

use serde::Deserialize;
use uuid::Uuid;

use crate::models::{AdminUser, CartItem, NewOrder, Order};
use crate::services::auth_client::Session;
use crate::state::AppState;

/// The checkout form as the shopper submits it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingForm {
  #[serde(default)]
  pub full_name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub phone: String,
  #[serde(default)]
  pub address: String,
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub pincode: String,
}

#[derive(Clone)]
pub struct CheckoutCtx {
  pub app_state: AppState,
  /// Cart session the order is placed from.
  pub session: Uuid,
  pub form: ShippingForm,
  pub lines: Vec<CartItem>,
  pub total: i64,
  pub new_order: Option<NewOrder>,
  pub order: Option<Order>,
  pub clear_scheduled: bool,
}

impl CheckoutCtx {
  pub fn new(app_state: AppState, session: Uuid, form: ShippingForm) -> Self {
    Self {
      app_state,
      session,
      form,
      lines: Vec::new(),
      total: 0,
      new_order: None,
      order: None,
      clear_scheduled: false,
    }
  }
}

#[derive(Clone)]
pub struct SigninCtx {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub user: Option<AdminUser>,
  pub session: Option<Session>,
}

impl SigninCtx {
  pub fn new(app_state: AppState, email: &str, password: &str) -> Self {
    Self {
      app_state,
      email: email.trim().to_string(),
      password: password.to_string(),
      user: None,
      session: None,
    }
  }
}
