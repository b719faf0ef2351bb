// storefront/src/cart/book.rs

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

use super::{CartStorage, CartStore, CART_STORAGE_KEY};

pub type SharedCart = Arc<Mutex<CartStore>>;

pub const DEFAULT_CART_IDLE: Duration = Duration::from_secs(30 * 60);

struct OpenCart {
  cart: SharedCart,
  last_used: Instant,
}

/// Open carts by session id. A cart is loaded from storage the first time
/// its session is seen and dropped again once it sits idle; its lines are
/// already saved, so the next request reloads them.
pub struct CartBook {
  storage: Arc<dyn CartStorage>,
  idle: Duration,
  carts: RwLock<HashMap<Uuid, OpenCart>>,
}

impl CartBook {
  pub fn new(storage: Arc<dyn CartStorage>) -> Self {
    Self::with_idle_timeout(storage, DEFAULT_CART_IDLE)
  }

  pub fn with_idle_timeout(storage: Arc<dyn CartStorage>, idle: Duration) -> Self {
    Self {
      storage,
      idle,
      carts: RwLock::new(HashMap::new()),
    }
  }

  pub fn storage_key(session: Uuid) -> String {
    format!("{CART_STORAGE_KEY}:{session}")
  }

  pub fn cart(&self, session: Uuid) -> SharedCart {
    let mut carts = self.carts.write();
    let open = carts.entry(session).or_insert_with(|| OpenCart {
      cart: Arc::new(Mutex::new(CartStore::open(
        Arc::clone(&self.storage),
        Self::storage_key(session),
      ))),
      last_used: Instant::now(),
    });
    open.last_used = Instant::now();
    Arc::clone(&open.cart)
  }

  /// Drops carts unused for longer than the idle timeout. A cart still held
  /// by a request is kept. Returns how many were dropped.
  pub fn evict_idle(&self) -> usize {
    let now = Instant::now();
    let mut carts = self.carts.write();
    let before = carts.len();
    carts.retain(|_, open| Arc::strong_count(&open.cart) > 1 || now.duration_since(open.last_used) < self.idle);
    let evicted = before - carts.len();
    if evicted > 0 {
      debug!(evicted, remaining = carts.len(), "Idle carts dropped.");
    }
    evicted
  }

  pub fn open_sessions(&self) -> usize {
    self.carts.read().len()
  }
}
