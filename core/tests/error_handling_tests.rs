// tests/error_handling_tests.rs
mod common;

use common::*;
use olira_flow::{Flow, FlowContext, FlowError, Step};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn required_step_without_handlers_fails() {
  setup_tracing();
  let mut flow = Flow::<TrailContext, TestError>::new("gaps", vec![Step::required("a"), Step::required("b")]);
  flow.on("a", marking_handler("a", "a")).unwrap();

  let ctx = FlowContext::new(TrailContext::default());
  let err = flow.run(ctx.clone()).await.unwrap_err();

  match err {
    TestError::Flow(msg) => assert!(msg.contains("'b'") && msg.contains("no handlers"), "{msg}"),
    other => panic!("expected flow error, got {other:?}"),
  }
  assert_eq!(ctx.read().visited, vec!["a"]);
}

#[test]
fn hooks_on_unknown_steps_are_rejected() {
  let mut flow = Flow::<TrailContext, TestError>::new("strict", vec![Step::required("a")]);
  let err = flow.on("typo", marking_handler("typo", "t")).unwrap_err();
  assert!(matches!(err, FlowError::UnknownStep { ref step, .. } if step == "typo"));
}

#[test]
fn duplicate_step_names_are_rejected() {
  let mut flow = Flow::<TrailContext, TestError>::new("dupes", vec![Step::required("a")]);
  let err = flow.insert_after("a", Step::optional("a")).unwrap_err();
  assert!(matches!(err, FlowError::DuplicateStep { .. }));
  assert!(matches!(flow.remove_step("nope"), Err(FlowError::UnknownStep { .. })));
  assert!(matches!(flow.set_optional("nope", true), Err(FlowError::UnknownStep { .. })));
}

#[tokio::test]
#[serial]
async fn set_optional_relaxes_a_required_step() {
  setup_tracing();
  let mut flow = Flow::<TrailContext, TestError>::new("relaxed", vec![Step::required("empty")]);
  flow.set_optional("empty", true).unwrap();
  assert!(flow.run(FlowContext::new(TrailContext::default())).await.is_ok());
}

#[test]
fn anyhow_errors_convert_into_handler_failures() {
  let err: FlowError = anyhow::anyhow!("disk full").into();
  assert_eq!(err.to_string(), "step handler failed: disk full");
}
