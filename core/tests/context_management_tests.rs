// tests/context_management_tests.rs
mod common;

use common::*;
use olira_flow::{Control, Flow, FlowContext, Step};
use serial_test::serial;

#[test]
fn clones_share_the_same_data() {
  let ctx = FlowContext::new(TrailContext::default());
  let other = ctx.clone();
  other.write().counter = 7;
  assert_eq!(ctx.read().counter, 7);
}

#[test]
fn project_narrows_a_read_guard() {
  let ctx = FlowContext::new(TrailContext {
    trail: "abc".into(),
    ..Default::default()
  });
  let trail = ctx.project(|c| c.trail.as_str());
  assert_eq!(&*trail, "abc");
}

#[test]
fn update_returns_the_closure_result() {
  let ctx = FlowContext::new(OtherContext { value: 1 });
  let doubled = ctx.update(|c| {
    c.value *= 2;
    c.value
  });
  assert_eq!(doubled, 2);
  assert_eq!(ctx.snapshot(), OtherContext { value: 2 });
}

#[tokio::test]
#[serial]
async fn handlers_can_await_between_short_lock_scopes() {
  setup_tracing();
  let mut flow = Flow::<TrailContext, TestError>::new("awaiting", vec![Step::required("slow")]);
  flow
    .on("slow", |ctx: FlowContext<TrailContext>| async move {
      let start = ctx.read().counter;
      tokio::time::sleep(std::time::Duration::from_millis(5)).await;
      ctx.update(|c| {
        c.counter = start + 1;
        c.visited.push("slow".into());
      });
      Ok::<_, TestError>(Control::Continue)
    })
    .unwrap();

  let ctx = FlowContext::new(TrailContext::default());
  flow.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().counter, 1);
  assert_eq!(ctx.read().visited, vec!["slow"]);
}
