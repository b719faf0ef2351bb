// storefront/src/admin/orders.rs

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::backend::Backend;
use crate::errors::{AppError, Result};
use crate::models::{Order, OrderStatus, OrderStatusUpdate};
use crate::realtime::OrderFeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTab {
  #[default]
  All,
  Pending,
  Completed,
  Cancelled,
}

impl StatusTab {
  pub fn admits(self, status: OrderStatus) -> bool {
    match self {
      StatusTab::All => true,
      StatusTab::Pending => status == OrderStatus::Pending,
      StatusTab::Completed => status == OrderStatus::Completed,
      StatusTab::Cancelled => status == OrderStatus::Cancelled,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TabCounts {
  pub all: usize,
  pub pending: usize,
  pub completed: usize,
  pub cancelled: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrdersView {
  pub tab: StatusTab,
  pub search: String,
  pub counts: TabCounts,
  pub orders: Vec<Order>,
}

/// The orders table as last fetched.
pub struct OrdersBoard {
  backend: Arc<dyn Backend>,
  orders: RwLock<Vec<Order>>,
  fetches: AtomicU64,
}

fn matches_search(order: &Order, needle: &str) -> bool {
  needle.is_empty()
    || order.order_number.to_lowercase().contains(needle)
    || order.customer_name.to_lowercase().contains(needle)
    || order.phone.to_lowercase().contains(needle)
}

impl OrdersBoard {
  pub fn new(backend: Arc<dyn Backend>) -> Self {
    Self {
      backend,
      orders: RwLock::new(Vec::new()),
      fetches: AtomicU64::new(0),
    }
  }

  /// Replaces the snapshot with a fresh fetch. Concurrent refreshes are not
  /// coordinated, whichever finishes last is kept.
  #[instrument(name = "OrdersBoard::refresh", skip(self), err(Display))]
  pub async fn refresh(&self) -> Result<usize> {
    let orders = self.backend.list_orders().await?;
    let count = orders.len();
    *self.orders.write() = orders;
    self.fetches.fetch_add(1, Ordering::Relaxed);
    debug!(count, "Orders snapshot replaced.");
    Ok(count)
  }

  /// Completed fetches since start-up.
  pub fn fetch_count(&self) -> u64 {
    self.fetches.load(Ordering::Relaxed)
  }

  pub fn snapshot(&self) -> Vec<Order> {
    self.orders.read().clone()
  }

  pub fn view(&self, tab: StatusTab, search: &str) -> OrdersView {
    let needle = search.trim().to_lowercase();
    let orders = self.orders.read();
    let mut counts = TabCounts {
      all: orders.len(),
      ..TabCounts::default()
    };
    for order in orders.iter() {
      match order.order_status {
        OrderStatus::Pending => counts.pending += 1,
        OrderStatus::Completed => counts.completed += 1,
        OrderStatus::Cancelled => counts.cancelled += 1,
      }
    }
    let rows = orders
      .iter()
      .filter(|o| tab.admits(o.order_status) && matches_search(o, &needle))
      .cloned()
      .collect();
    OrdersView {
      tab,
      search: search.trim().to_string(),
      counts,
      orders: rows,
    }
  }

  #[instrument(name = "OrdersBoard::update_status", skip(self), err(Display))]
  pub async fn update_status(&self, id: Uuid, update: &OrderStatusUpdate) -> Result<Order> {
    if update.is_empty() {
      return Err(AppError::Validation("Nothing to update.".to_string()));
    }
    let order = self
      .backend
      .update_order_status(id, update)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;
    info!(order_number = %order.order_number, status = order.order_status.as_str(), "Order status updated.");
    self.refresh().await?;
    Ok(order)
  }

  #[instrument(name = "OrdersBoard::delete", skip(self), err(Display))]
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    if !self.backend.delete_order(id).await? {
      return Err(AppError::NotFound(format!("Order {} not found", id)));
    }
    info!(%id, "Order deleted.");
    self.refresh().await?;
    Ok(())
  }

  /// Re-fetches on every change event. A lagged receiver also triggers a
  /// re-fetch. The task ends when the feed closes.
  pub fn spawn_watcher(self: &Arc<Self>, feed: &OrderFeed) -> JoinHandle<()> {
    let board = Arc::clone(self);
    let mut rx = feed.subscribe();
    tokio::spawn(async move {
      info!("Order change watcher started.");
      loop {
        match rx.recv().await {
          Ok(change) => debug!(op = ?change.op, order_id = %change.order_id, "Order change received."),
          Err(RecvError::Lagged(skipped)) => warn!(skipped, "Order watcher lagged behind the feed."),
          Err(RecvError::Closed) => {
            info!("Order feed closed, watcher stopping.");
            break;
          }
        }
        if let Err(e) = board.refresh().await {
          error!(error = %e, "Order re-fetch after change failed.");
        }
      }
    })
  }
}
