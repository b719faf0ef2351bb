// storefront/src/state.rs

use chrono::{NaiveDate, Utc};
use olira_flow::FlowRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::admin::{Dashboard, OrdersBoard, ProductsBoard};
use crate::backend::{Backend, MemoryBackend, PgBackend};
use crate::cart::{CartBook, CartStorage, FileCartStorage, MemoryCartStorage};
use crate::config::{AppConfig, BackendKind};
use crate::errors::{AppError, Result};
use crate::pipelines;
use crate::realtime::OrderFeed;
use crate::services::auth_client::AuthClient;

#[derive(Clone)]
pub struct AppState {
  pub backend: Arc<dyn Backend>,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
  pub carts: Arc<CartBook>,
  pub auth: Arc<AuthClient>,
  pub feed: OrderFeed,
  pub orders: Arc<OrdersBoard>,
  pub products: Arc<ProductsBoard>,
  pub dashboard: Arc<Dashboard>,
}

impl AppState {
  /// Wires the state together and registers every flow.
  pub fn new(
    config: AppConfig,
    backend: Arc<dyn Backend>,
    cart_storage: Arc<dyn CartStorage>,
    feed: OrderFeed,
  ) -> Result<Self> {
    let flows = Arc::new(FlowRegistry::<AppError>::new());
    pipelines::register_all_flows(&flows)?;
    Ok(Self {
      flows,
      carts: Arc::new(CartBook::with_idle_timeout(
        cart_storage,
        Duration::from_secs(config.cart_idle_secs),
      )),
      auth: Arc::new(AuthClient::new(config.session_ttl_minutes)),
      orders: Arc::new(OrdersBoard::new(Arc::clone(&backend))),
      products: Arc::new(ProductsBoard::new(Arc::clone(&backend))),
      dashboard: Arc::new(Dashboard::new(Arc::clone(&backend))),
      config: Arc::new(config),
      backend,
      feed,
    })
  }

  /// Connects the configured backend and cart storage. The Postgres backend
  /// is returned alongside so the caller can start its change listener.
  pub async fn build(config: AppConfig) -> Result<(Self, Option<PgBackend>)> {
    let feed = OrderFeed::new();
    let (backend, pg): (Arc<dyn Backend>, Option<PgBackend>) = match config.backend {
      BackendKind::Memory => {
        info!("Using in-memory backend.");
        (Arc::new(MemoryBackend::new(feed.clone())) as Arc<dyn Backend>, None)
      }
      BackendKind::Postgres => {
        let url = config
          .database_url
          .as_deref()
          .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres backend".to_string()))?;
        let pg = PgBackend::connect(url).await?;
        if config.run_migrations {
          pg.migrate().await?;
        }
        (Arc::new(pg.clone()) as Arc<dyn Backend>, Some(pg))
      }
    };
    let storage: Arc<dyn CartStorage> = match &config.cart_storage_dir {
      Some(dir) => Arc::new(FileCartStorage::open(dir)?),
      None => Arc::new(MemoryCartStorage::new()),
    };
    Ok((Self::new(config, backend, storage, feed)?, pg))
  }

  pub fn today(&self) -> NaiveDate {
    Utc::now().date_naive()
  }
}
