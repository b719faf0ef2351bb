// storefront/src/pipelines/signin_pipeline.rs

use olira_flow::{Control, Flow, FlowContext, FlowRegistry, Outcome, Step};
use tracing::{event, instrument, warn, Level};

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::SigninCtx;
use crate::services::auth_client::Session;
use crate::services::auth_service;
use crate::state::AppState;

pub const SIGNIN_FLOW: &str = "admin_signin";
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

fn rejected() -> AppError {
  AppError::Auth(INVALID_CREDENTIALS.to_string())
}

async fn validate_credentials(ctx: FlowContext<SigninCtx>) -> Result<Control> {
  let (email_blank, password_blank) = {
    let guard = ctx.read();
    (guard.email.is_empty(), guard.password.is_empty())
  };
  if email_blank || password_blank {
    warn!("Sign-in attempted without email or password.");
    return Err(AppError::Validation("Email and password are required.".to_string()));
  }
  Ok(Control::Continue)
}

async fn fetch_admin_user(ctx: FlowContext<SigninCtx>) -> Result<Control> {
  let (backend, email) = {
    let guard = ctx.read();
    (guard.app_state.backend.clone(), guard.email.clone())
  };
  match backend.admin_user_by_email(&email).await? {
    Some(user) => {
      event!(Level::DEBUG, user_id = %user.id, "Admin account found.");
      ctx.write().user = Some(user);
      Ok(Control::Continue)
    }
    None => {
      warn!(email = %email, "Sign-in for unknown admin email.");
      Err(rejected())
    }
  }
}

async fn verify_password(ctx: FlowContext<SigninCtx>) -> Result<Control> {
  let (hash, password) = {
    let guard = ctx.read();
    (guard.user.as_ref().map(|u| u.password_hash.clone()), guard.password.clone())
  };
  let hash = hash.ok_or_else(|| AppError::Internal("Admin user missing before password check.".to_string()))?;
  if auth_service::verify_password(&hash, &password)? {
    ctx.write().password.clear();
    Ok(Control::Continue)
  } else {
    warn!("Admin password mismatch.");
    Err(rejected())
  }
}

async fn issue_session(ctx: FlowContext<SigninCtx>) -> Result<Control> {
  let (auth, user) = {
    let guard = ctx.read();
    (guard.app_state.auth.clone(), guard.user.clone())
  };
  let user = user.ok_or_else(|| AppError::Internal("Admin user missing before session issue.".to_string()))?;
  let session = auth.issue_session(&user);
  ctx.write().session = Some(session);
  Ok(Control::Continue)
}

pub fn register_signin_flow(registry: &FlowRegistry<AppError>) -> Result<()> {
  let mut flow = Flow::<SigninCtx, AppError>::new(
    SIGNIN_FLOW,
    vec![
      Step::required("validate_credentials"),
      Step::required("fetch_admin_user"),
      Step::required("verify_password"),
      Step::required("issue_session"),
    ],
  );
  flow.on("validate_credentials", validate_credentials)?;
  flow.on("fetch_admin_user", fetch_admin_user)?;
  flow.on("verify_password", verify_password)?;
  flow.on("issue_session", issue_session)?;

  registry.register(flow);
  tracing::info!("Sign-in flow registered.");
  Ok(())
}

#[instrument(name = "auth::sign_in_with_password", skip(state, password), err(Display))]
pub async fn sign_in_with_password(state: &AppState, email: &str, password: &str) -> Result<Session> {
  let ctx = FlowContext::new(SigninCtx::new(state.clone(), email, password));
  match state.flows.run(ctx.clone()).await? {
    Outcome::Completed => ctx
      .write()
      .session
      .take()
      .ok_or_else(|| AppError::Internal("Sign-in finished without a session.".to_string())),
    Outcome::Stopped => Err(rejected()),
  }
}
