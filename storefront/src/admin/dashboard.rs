// storefront/src/admin/dashboard.rs

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, instrument};

use crate::backend::{Backend, ProductQuery};
use crate::models::{Order, OrderStatus, Product};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
  /// Sum of order totals, cancelled orders excluded.
  pub total_sales: i64,
  pub total_orders: usize,
  /// Products already launched.
  pub active_products: usize,
  /// Distinct phone numbers across orders.
  pub customers: usize,
}

impl DashboardStats {
  pub fn compute(orders: &[Order], products: &[Product], today: NaiveDate) -> Self {
    Self {
      total_sales: orders
        .iter()
        .filter(|o| o.order_status != OrderStatus::Cancelled)
        .map(|o| o.total)
        .sum(),
      total_orders: orders.len(),
      active_products: products.iter().filter(|p| p.is_launched(today)).count(),
      customers: orders.iter().map(|o| o.phone.trim()).collect::<HashSet<_>>().len(),
    }
  }
}

pub struct Dashboard {
  backend: Arc<dyn Backend>,
  stats: RwLock<DashboardStats>,
}

impl Dashboard {
  pub fn new(backend: Arc<dyn Backend>) -> Self {
    Self {
      backend,
      stats: RwLock::new(DashboardStats::default()),
    }
  }

  pub fn stats(&self) -> DashboardStats {
    *self.stats.read()
  }

  /// Recomputes the figures. A failed fetch is logged and the previous
  /// figures are returned unchanged.
  #[instrument(name = "Dashboard::refresh", skip(self))]
  pub async fn refresh(&self, today: NaiveDate) -> DashboardStats {
    let fetched = async {
      let orders = self.backend.list_orders().await?;
      let products = self.backend.list_products(&ProductQuery::default()).await?;
      Ok::<_, crate::errors::AppError>(DashboardStats::compute(&orders, &products, today))
    }
    .await;
    match fetched {
      Ok(stats) => {
        *self.stats.write() = stats;
        stats
      }
      Err(e) => {
        error!(error = %e, "Dashboard fetch failed, keeping previous figures.");
        self.stats()
      }
    }
  }
}
