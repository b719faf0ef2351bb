// tests/common/mod.rs
#![allow(dead_code)]

use olira_flow::{Control, FlowContext, FlowError, Handler};
use once_cell::sync::Lazy;
use tracing::Level;

#[derive(Clone, Debug, Default)]
pub struct TrailContext {
  pub counter: i32,
  pub trail: String,
  pub visited: Vec<String>,
  pub stop_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OtherContext {
  pub value: u32,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("flow error: {0}")]
  Flow(String),

  #[error("handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(e: FlowError) -> Self {
    TestError::Flow(e.to_string())
  }
}

/// Appends `mark` to the trail and records the step. Stops when `stop_at` names this step.
pub fn marking_handler(step: &'static str, mark: &'static str) -> Handler<TrailContext, TestError> {
  Box::new(move |ctx: FlowContext<TrailContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.trail.push_str(mark);
      guard.visited.push(step.to_string());
      tracing::debug!(target: "flow_tests", step, counter = guard.counter, "marked");
      if guard.stop_at.as_deref() == Some(step) {
        return Ok(Control::Stop);
      }
      Ok(Control::Continue)
    })
  })
}

pub fn failing_handler(step: &'static str, message: &'static str) -> Handler<TrailContext, TestError> {
  Box::new(move |ctx: FlowContext<TrailContext>| {
    Box::pin(async move {
      ctx.write().visited.push(step.to_string());
      Err(TestError::Handler(message.to_string()))
    })
  })
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
