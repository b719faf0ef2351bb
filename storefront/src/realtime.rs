// storefront/src/realtime.rs

//! In-process fan-out of order table changes.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
  Insert,
  Update,
  Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderChange {
  pub op: ChangeOp,
  pub order_id: Uuid,
}

impl OrderChange {
  pub fn new(op: ChangeOp, order_id: Uuid) -> Self {
    Self { op, order_id }
  }
}

#[derive(Debug, Clone)]
pub struct OrderFeed {
  tx: broadcast::Sender<OrderChange>,
}

impl OrderFeed {
  pub fn new() -> Self {
    let (tx, _) = broadcast::channel(FEED_CAPACITY);
    Self { tx }
  }

  /// Delivers `change` to every current subscriber. Having none is not an error.
  pub fn publish(&self, change: OrderChange) {
    let delivered = self.tx.send(change.clone()).unwrap_or(0);
    tracing::debug!(op = ?change.op, order_id = %change.order_id, delivered, "Order change published.");
  }

  pub fn subscribe(&self) -> broadcast::Receiver<OrderChange> {
    self.tx.subscribe()
  }
}

impl Default for OrderFeed {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn subscribers_receive_published_changes() {
    let feed = OrderFeed::new();
    let mut rx = feed.subscribe();
    let id = Uuid::new_v4();
    feed.publish(OrderChange::new(ChangeOp::Insert, id));
    assert_eq!(rx.recv().await.unwrap(), OrderChange::new(ChangeOp::Insert, id));
  }

  #[test]
  fn payload_matches_trigger_format() {
    let change: OrderChange =
      serde_json::from_str(r#"{"op":"DELETE","order_id":"00000000-0000-0000-0000-000000000001"}"#).unwrap();
    assert_eq!(change.op, ChangeOp::Delete);
  }
}
