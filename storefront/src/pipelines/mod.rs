// storefront/src/pipelines/mod.rs

//! Flows the storefront runs through the workflow registry.

use olira_flow::FlowRegistry;

use crate::errors::{AppError, Result};

pub mod checkout_pipeline;
pub mod contexts;
pub mod signin_pipeline;

pub use checkout_pipeline::place_order;
pub use contexts::{CheckoutCtx, ShippingForm, SigninCtx};
pub use signin_pipeline::sign_in_with_password;

/// Called once while the application state is built.
pub fn register_all_flows(registry: &FlowRegistry<AppError>) -> Result<()> {
  tracing::info!("Registering storefront flows...");
  signin_pipeline::register_signin_flow(registry)?;
  checkout_pipeline::register_checkout_flow(registry)?;
  tracing::info!(flows = ?registry.names(), "All storefront flows registered.");
  Ok(())
}
