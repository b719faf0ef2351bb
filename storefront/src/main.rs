// storefront/src/main.rs

use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use olira_storefront::config::{AppConfig, LogFormat};
use olira_storefront::services::seed;
use olira_storefront::state::AppState;
use olira_storefront::web::configure_app_routes;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  match format {
    LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
    LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      init_tracing(LogFormat::Pretty);
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  init_tracing(config.log_format);
  tracing::info!("Starting Olira storefront...");

  let bind_address = config.bind_address();
  let (app_state, pg) = AppState::build(config)
    .await
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

  if let Err(e) = seed::seed_admin(app_state.backend.as_ref(), &app_state.config).await {
    tracing::error!(error = %e, "Failed to seed the admin account.");
  }
  if app_state.config.seed_db {
    if let Err(e) = seed::seed_demo_catalog(app_state.backend.as_ref(), app_state.today()).await {
      tracing::error!(error = %e, "Failed to seed the demo catalog.");
    }
  }

  if let Some(pg) = &pg {
    pg.spawn_order_listener(app_state.feed.clone());
  }
  app_state.orders.spawn_watcher(&app_state.feed);
  if let Err(e) = app_state.orders.refresh().await {
    tracing::warn!(error = %e, "Initial orders fetch failed.");
  }

  let (carts, auth) = (app_state.carts.clone(), app_state.auth.clone());
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
    loop {
      interval.tick().await;
      carts.evict_idle();
      auth.prune_expired();
    }
  });

  tracing::info!(address = %bind_address, "Binding HTTP server.");
  HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&bind_address)?
  .run()
  .await
}
