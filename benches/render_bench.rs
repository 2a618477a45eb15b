// benches/render_bench.rs
//! Sequential vs bounded rendering of a synthetic mock batch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mockgen_engine::mock::{EntityModel, Member, MockRenderer, Param, ResolvedEntity};
use mockgen_engine::runtime::ThreadPool;
use mockgen_engine::{ExecutionStrategy, RenderEngine};
use std::num::NonZeroUsize;
use std::sync::Arc;

fn entities(count: i64) -> Vec<ResolvedEntity> {
    (0..count)
        .map(|i| {
            let mut model = EntityModel::new(format!("Service{}", i), i * 64);
            for m in 0..12 {
                model = model
                    .with_member(Member::variable(format!("value{}", m), "[String: Int]"))
                    .with_member(Member::method(
                        format!("call{}", m),
                        vec![Param::new("input", "String"), Param::new("retries", "Int")],
                        Some("Double"),
                    ));
            }
            ResolvedEntity::new(model)
        })
        .collect()
}

fn bench_render(c: &mut Criterion) {
    let batch = entities(500);
    let renderer = Arc::new(MockRenderer::new());
    let mut group = c.benchmark_group("render_batch");

    group.bench_function("sequential", |b| {
        let engine = RenderEngine::sequential();
        b.iter(|| {
            engine
                .render(batch.clone(), Arc::clone(&renderer), |text, _| {
                    black_box(text);
                })
                .unwrap()
        })
    });

    for budget in [2usize, 4, 8] {
        let engine = RenderEngine::new(ExecutionStrategy::bounded(
            NonZeroUsize::new(budget).unwrap(),
            Arc::new(ThreadPool::new(budget).unwrap()),
        ));

        group.bench_with_input(BenchmarkId::new("bounded", budget), &budget, |b, _| {
            b.iter(|| {
                engine
                    .render(batch.clone(), Arc::clone(&renderer), |text, _| {
                        black_box(text);
                    })
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
