// storefront/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use olira_flow::FlowError;

/// Where the admin client is sent when it has no usable session.
pub const LOGIN_REDIRECT: &str = "/admin/login";

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  /// Sign-in rejected.
  #[error("Authentication Failed: {0}")]
  Auth(String),

  /// No session, or an expired one, on an admin route.
  #[error("Not signed in")]
  Unauthenticated,

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  /// A row is still referenced by another table.
  #[error("Foreign key violation: {0}")]
  ForeignKey(String),

  #[error("Order failed: {0}")]
  OrderFailed(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("Storage Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Serialization Error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// The bare message without the variant prefix, as shown to the user.
  pub fn detail(&self) -> String {
    match self {
      AppError::Validation(m)
      | AppError::Auth(m)
      | AppError::NotFound(m)
      | AppError::Conflict(m)
      | AppError::ForeignKey(m)
      | AppError::OrderFailed(m)
      | AppError::Config(m)
      | AppError::Internal(m) => m.clone(),
      AppError::Unauthenticated => self.to_string(),
      AppError::Sqlx(e) => match e {
        sqlx::Error::Database(db) => db.message().to_string(),
        other => other.to_string(),
      },
      AppError::Migrate(e) => e.to_string(),
      AppError::Io(e) => e.to_string(),
      AppError::Json(e) => e.to_string(),
      AppError::Workflow { source } => source.to_string(),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::Unauthenticated => {
        HttpResponse::Unauthorized().json(json!({"error": self.to_string(), "redirect": LOGIN_REDIRECT}))
      }
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Conflict(m) | AppError::ForeignKey(m) => HttpResponse::Conflict().json(json!({"error": m})),
      AppError::OrderFailed(_) => HttpResponse::InternalServerError().json(json!({"error": self.to_string()})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) | AppError::Migrate(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Database operation failed", "detail": self.detail()}))
      }
      AppError::Io(_) | AppError::Json(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Storage operation failed", "detail": self.detail()}))
      }
      AppError::Workflow { source } => {
        tracing::error!(flow_error = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
