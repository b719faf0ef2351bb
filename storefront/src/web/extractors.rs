// storefront/src/web/extractors.rs

use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, HttpResponseBuilder};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::auth_client::Session;
use crate::state::AppState;

pub const CART_SESSION_HEADER: &str = "X-Cart-Session";

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
  let raw = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
  let token = raw.strip_prefix("Bearer ")?.trim();
  (!token.is_empty()).then(|| token.to_string())
}

/// A live admin session taken from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl FromRequest for AdminSession {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let resolved = app_state(req).and_then(|state| {
      let Some(token) = bearer_token(req) else {
        warn!(path = %req.path(), "Admin route called without a session token.");
        return Err(AppError::Unauthenticated);
      };
      state.auth.get_session(&token).map(AdminSession).ok_or_else(|| {
        warn!(path = %req.path(), "Admin session missing or expired.");
        AppError::Unauthenticated
      })
    });
    futures_util::future::ready(resolved)
  }
}

/// The shopper's cart session. A request without a valid `X-Cart-Session`
/// header starts a new one; responses echo the id back.
#[derive(Debug, Clone, Copy)]
pub struct CartSession {
  pub id: Uuid,
  pub is_new: bool,
}

impl CartSession {
  pub fn respond(&self) -> HttpResponseBuilder {
    let mut builder = HttpResponse::Ok();
    builder.insert_header((CART_SESSION_HEADER, self.id.to_string()));
    builder
  }
}

impl FromRequest for CartSession {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let existing = req
      .headers()
      .get(CART_SESSION_HEADER)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| Uuid::parse_str(v.trim()).ok());
    let session = match existing {
      Some(id) => CartSession { id, is_new: false },
      None => {
        let id = Uuid::new_v4();
        debug!(%id, "Starting a new cart session.");
        CartSession { id, is_new: true }
      }
    };
    futures_util::future::ready(Ok(session))
  }
}
