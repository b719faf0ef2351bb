// storefront/src/services/auth_client.rs

//! In-memory admin sessions and auth state events.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand_core::{OsRng, RngCore};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::AdminUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
  pub access_token: String,
  pub user_id: Uuid,
  pub email: String,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    now >= self.expires_at
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
  SignedIn { user_id: Uuid, email: String },
  SignedOut { access_token: String, user_id: Uuid },
}

pub struct AuthClient {
  ttl: Duration,
  sessions: RwLock<HashMap<String, Session>>,
  events: broadcast::Sender<AuthEvent>,
}

fn new_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl AuthClient {
  pub fn new(ttl_minutes: i64) -> Self {
    Self::with_ttl(Duration::minutes(ttl_minutes.max(1)))
  }

  pub fn with_ttl(ttl: Duration) -> Self {
    let (events, _) = broadcast::channel(64);
    Self {
      ttl,
      sessions: RwLock::new(HashMap::new()),
      events,
    }
  }

  /// Starts a session for an already verified admin.
  pub fn issue_session(&self, user: &AdminUser) -> Session {
    let session = Session {
      access_token: new_token(),
      user_id: user.id,
      email: user.email.clone(),
      expires_at: Utc::now() + self.ttl,
    };
    {
      let mut sessions = self.sessions.write();
      let now = Utc::now();
      sessions.retain(|_, s| !s.is_expired_at(now));
      sessions.insert(session.access_token.clone(), session.clone());
    }
    info!(user_id = %user.id, "Admin signed in.");
    let _ = self.events.send(AuthEvent::SignedIn {
      user_id: user.id,
      email: user.email.clone(),
    });
    session
  }

  /// The live session for `token`. Expired sessions are dropped and count as absent.
  pub fn get_session(&self, token: &str) -> Option<Session> {
    let now = Utc::now();
    let session = self.sessions.read().get(token).cloned()?;
    if session.is_expired_at(now) {
      self.sessions.write().remove(token);
      debug!(user_id = %session.user_id, "Session expired.");
      return None;
    }
    Some(session)
  }

  /// Returns whether a session was ended.
  pub fn sign_out(&self, token: &str) -> bool {
    let Some(session) = self.sessions.write().remove(token) else {
      return false;
    };
    info!(user_id = %session.user_id, "Admin signed out.");
    let _ = self.events.send(AuthEvent::SignedOut {
      access_token: session.access_token,
      user_id: session.user_id,
    });
    true
  }

  pub fn on_auth_state_change(&self) -> broadcast::Receiver<AuthEvent> {
    self.events.subscribe()
  }

  /// Drops every expired session. Returns how many were dropped.
  pub fn prune_expired(&self) -> usize {
    let now = Utc::now();
    let mut sessions = self.sessions.write();
    let before = sessions.len();
    sessions.retain(|_, s| !s.is_expired_at(now));
    let pruned = before - sessions.len();
    if pruned > 0 {
      debug!(pruned, "Expired sessions dropped.");
    }
    pruned
  }

  pub fn active_sessions(&self) -> usize {
    self.prune_expired();
    self.sessions.read().len()
  }

  /// Sessions held in memory, expired or not.
  pub fn stored_sessions(&self) -> usize {
    self.sessions.read().len()
  }
}
