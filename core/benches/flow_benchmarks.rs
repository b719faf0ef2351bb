use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use olira_flow::{Control, Flow, FlowContext, FlowError, FlowRegistry, Handler, Step};
use tokio::runtime::Runtime;

#[derive(Clone, Debug, Default)]
struct BenchContext {
  lines: Vec<(i64, u32)>,
  total: i64,
}

fn summing_handler() -> Handler<BenchContext, FlowError> {
  Box::new(|ctx: FlowContext<BenchContext>| {
    Box::pin(async move {
      ctx.update(|c| c.total = c.lines.iter().map(|(price, qty)| price * i64::from(*qty)).sum());
      Ok(Control::Continue)
    })
  })
}

fn build_flow(steps: usize) -> Flow<BenchContext, FlowError> {
  let names: Vec<String> = (0..steps).map(|i| format!("step_{i}")).collect();
  let mut flow = Flow::new("bench", names.iter().map(Step::required).collect());
  for name in &names {
    flow.on(name, summing_handler()).unwrap();
  }
  flow
}

fn context(lines: usize) -> FlowContext<BenchContext> {
  FlowContext::new(BenchContext {
    lines: (0..lines).map(|i| (1000 + i as i64, 1 + (i % 3) as u32)).collect(),
    total: 0,
  })
}

fn bench_direct_run(c: &mut Criterion) {
  let mut group = c.benchmark_group("flow_direct");
  let rt = Runtime::new().unwrap();
  for steps in [1usize, 5, 10] {
    let flow = build_flow(steps);
    let flow = &flow;
    group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, _| {
      b.to_async(&rt).iter(|| async move { flow.run(context(20)).await.unwrap() });
    });
  }
  group.finish();
}

fn bench_registry_dispatch(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let registry = FlowRegistry::<FlowError>::new();
  registry.register(build_flow(5));
  let registry = &registry;
  c.bench_function("flow_registry_dispatch", |b| {
    b.to_async(&rt).iter(|| async move { registry.run(context(20)).await.unwrap() });
  });
}

criterion_group!(benches, bench_direct_run, bench_registry_dispatch);
criterion_main!(benches);
