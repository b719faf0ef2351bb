// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_WHATSAPP_NUMBER: &str = "919876543210";
pub const DEFAULT_WHATSAPP_MESSAGE: &str = "Hi Oliraa! I'm interested in your collection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
  Postgres,
  Memory,
}

impl FromStr for BackendKind {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" | "pg" => Ok(BackendKind::Postgres),
      "memory" | "mem" => Ok(BackendKind::Memory),
      other => Err(AppError::Config(format!("Unknown BACKEND '{}'", other))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub backend: BackendKind,
  /// Required when `backend` is Postgres.
  pub database_url: Option<String>,
  pub run_migrations: bool,
  pub seed_db: bool,
  /// Carts are kept in memory when unset.
  pub cart_storage_dir: Option<PathBuf>,
  pub cart_clear_delay_ms: u64,
  /// Open carts unused this long are dropped from memory.
  pub cart_idle_secs: u64,
  pub session_ttl_minutes: i64,
  pub admin_email: Option<String>,
  pub admin_password: Option<String>,
  pub whatsapp_number: String,
  pub whatsapp_message: String,
  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      backend: BackendKind::Memory,
      database_url: None,
      run_migrations: false,
      seed_db: false,
      cart_storage_dir: None,
      cart_clear_delay_ms: 500,
      cart_idle_secs: 30 * 60,
      session_ttl_minutes: 60 * 24,
      admin_email: None,
      admin_password: None,
      whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
      whatsapp_message: DEFAULT_WHATSAPP_MESSAGE.to_string(),
      log_format: LogFormat::Pretty,
    }
  }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e))),
    Err(_) => Ok(default),
  }
}

fn optional_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    let defaults = Self::default();

    let backend = match optional_var("BACKEND") {
      Some(raw) => raw.parse::<BackendKind>()?,
      None => BackendKind::Postgres,
    };
    let database_url = optional_var("DATABASE_URL");
    if backend == BackendKind::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required when BACKEND=postgres)".to_string(),
      ));
    }

    let log_format = match optional_var("LOG_FORMAT").as_deref() {
      Some("json") => LogFormat::Json,
      _ => LogFormat::Pretty,
    };

    let config = Self {
      server_host: optional_var("SERVER_HOST").unwrap_or(defaults.server_host),
      server_port: parse_var("SERVER_PORT", defaults.server_port)?,
      backend,
      database_url,
      run_migrations: parse_var("RUN_MIGRATIONS", true)?,
      seed_db: parse_var("SEED_DB", defaults.seed_db)?,
      cart_storage_dir: optional_var("CART_STORAGE_DIR").map(PathBuf::from),
      cart_clear_delay_ms: parse_var("CART_CLEAR_DELAY_MS", defaults.cart_clear_delay_ms)?,
      cart_idle_secs: parse_var("CART_IDLE_SECS", defaults.cart_idle_secs)?,
      session_ttl_minutes: parse_var("SESSION_TTL_MINUTES", defaults.session_ttl_minutes)?,
      admin_email: optional_var("ADMIN_EMAIL"),
      admin_password: optional_var("ADMIN_PASSWORD"),
      whatsapp_number: optional_var("WHATSAPP_NUMBER").unwrap_or(defaults.whatsapp_number),
      whatsapp_message: optional_var("WHATSAPP_MESSAGE").unwrap_or(defaults.whatsapp_message),
      log_format,
    };

    tracing::info!(backend = ?config.backend, port = config.server_port, "Application configuration loaded.");
    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn backend_kind_parses_aliases() {
    assert_eq!("PG".parse::<BackendKind>().unwrap(), BackendKind::Postgres);
    assert_eq!(" memory ".parse::<BackendKind>().unwrap(), BackendKind::Memory);
    assert!("sqlite".parse::<BackendKind>().is_err());
  }

  #[test]
  fn defaults_match_the_storefront() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.cart_clear_delay_ms, 500);
    assert_eq!(cfg.whatsapp_number, "919876543210");
    assert_eq!(cfg.bind_address(), "127.0.0.1:8080");
  }
}
