mod fixtures;

use std::sync::Arc;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use simcmp::comparison;
use simcmp::config::ComparisonConfig;
use simcmp::format::ValueFormat;
use simcmp::insights::derive_insights;
use simcmp::registry::MetricRegistry;
use simcmp::resolve::Resolver;
use simcmp::session::ComparisonSession;
use simcmp::types::{MetricCategory, MetricId};

use fixtures::{MIXED, PROMO_ONLY, make_catalog, make_selection};

// ── Group 1: build: selection size scaling ─────────────────────────────────

fn bench_build(c: &mut Criterion) {
    let registry = MetricRegistry::canonical();
    let format = ValueFormat::default();
    let resolver = Resolver::new(&registry, &format);
    let catalog = make_catalog(&MIXED, 42);

    let mut group = c.benchmark_group("build");
    for &n in &[2usize, 3, 4, 8, 16] {
        let selected = make_selection(&catalog, n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &selected, |b, sel| {
            b.iter(|| comparison::build(sel, &resolver, &[]))
        });
    }
    group.finish();
}

// ── Group 2: insights: mixed vs single-kind ────────────────────────────────

fn bench_insights(c: &mut Criterion) {
    let registry = MetricRegistry::canonical();
    let format = ValueFormat::default();
    let resolver = Resolver::new(&registry, &format);
    let ranking = ComparisonConfig::canonical().ranking_metrics;

    let mut group = c.benchmark_group("insights");
    for (name, workload) in [("mixed", &MIXED), ("promo_only", &PROMO_ONLY)] {
        let selected = make_selection(&make_catalog(workload, 7), 4);
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| derive_insights(&selected, &resolver, &ranking))
        });
    }
    group.finish();
}

// ── Group 3: session: select, toggle, view ─────────────────────────────────

fn bench_session(c: &mut Criterion) {
    let registry = Arc::new(MetricRegistry::canonical());
    let selected = make_selection(&make_catalog(&MIXED, 11), 4);
    let base = ComparisonSession::new(Arc::clone(&registry), ComparisonConfig::canonical());

    let mut group = c.benchmark_group("session");
    group.bench_function("select", |b| {
        b.iter_batched(|| selected.clone(), |sel| base.select(sel), BatchSize::SmallInput)
    });

    let comparing = match base.select(selected.clone()) {
        Ok(s) => s,
        Err(e) => panic!("bench selection rejected: {e}"),
    };
    group.bench_function("toggle_metric", |b| {
        b.iter(|| comparing.toggle_metric_visibility(MetricId::Roi))
    });
    group.bench_function("toggle_category", |b| {
        b.iter(|| comparing.toggle_category_expansion(MetricCategory::Financial))
    });
    group.bench_function("view", |b| b.iter(|| comparing.view()));
    group.finish();
}

criterion_group!(benches, bench_build, bench_insights, bench_session);
criterion_main!(benches);
