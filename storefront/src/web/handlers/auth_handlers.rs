// storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::{AppError, LOGIN_REDIRECT};
use crate::pipelines::sign_in_with_password;
use crate::state::AppState;
use crate::web::extractors::AdminSession;

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}

#[instrument(name = "handler::admin_login", skip(app_state, payload), fields(email = %payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, AppError> {
  let session = sign_in_with_password(&app_state, &payload.email, &payload.password).await?;
  info!(user_id = %session.user_id, "Admin login succeeded.");
  Ok(HttpResponse::Ok().json(json!({
    "access_token": session.access_token,
    "token_type": "bearer",
    "expires_at": session.expires_at,
    "user": { "id": session.user_id, "email": session.email },
  })))
}

/// Signs out, then points the client at the login page.
#[instrument(name = "handler::admin_logout", skip_all, fields(user_id = %admin.0.user_id))]
pub async fn logout_handler(app_state: web::Data<AppState>, admin: AdminSession) -> HttpResponse {
  app_state.auth.sign_out(&admin.0.access_token);
  HttpResponse::Ok().json(json!({ "signed_out": true, "redirect": LOGIN_REDIRECT }))
}

pub async fn session_handler(admin: AdminSession) -> HttpResponse {
  let session = admin.0;
  HttpResponse::Ok().json(json!({
    "user": { "id": session.user_id, "email": session.email },
    "expires_at": session.expires_at,
  }))
}
