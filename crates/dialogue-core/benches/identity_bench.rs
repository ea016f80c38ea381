//! Criterion benchmarks for the per-tick identity and status lookups.
//!
//! Every client tick may classify menu clicks and look up the status of each
//! visible dialogue option, so these paths must stay well under a frame.
//!
//! Run with:
//! ```bash
//! cargo bench --package dialogue-core --bench identity_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dialogue_core::{
    classify_click, menu_identity, ConfigStore, MenuAction, RegionHit, TargetId,
};

// ── Store fixture builders ────────────────────────────────────────────────────

/// Creates a store with `n` targets, each holding eight decorated options.
fn build_store_with_n_targets(n: i32) -> ConfigStore {
    let mut store = ConfigStore::new();
    for raw in 1..=n {
        let target = TargetId::new(raw).expect("positive ids are never reserved");
        for option in 0..8 {
            if option % 2 == 0 {
                store.set_locked(target, &format!("Option {option}"));
            } else {
                store.set_highlighted(target, &format!("Option {option}"));
            }
        }
    }
    store
}

// ── Benchmarks: identity ──────────────────────────────────────────────────────

fn bench_menu_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("menu_identity");

    group.bench_function("direct_target", |b| {
        b.iter(|| menu_identity(black_box("Talk-to"), black_box("Hans")))
    });

    group.bench_function("proxied_target", |b| {
        b.iter(|| menu_identity(black_box("Talk-to"), black_box("NPC Contact Hans")))
    });

    group.finish();
}

fn bench_classify_click(c: &mut Criterion) {
    c.bench_function("classify_click/world_object", |b| {
        b.iter(|| {
            classify_click(
                black_box(MenuAction::ObjectOption(1)),
                black_box(false),
                black_box(RegionHit::Outside),
            )
        })
    });
}

// ── Benchmarks: status lookups ────────────────────────────────────────────────

fn bench_status_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("status_lookup");

    for n in [10, 100, 1000] {
        let store = build_store_with_n_targets(n);
        let target = TargetId::new(n / 2 + 1).expect("non-reserved");
        group.bench_with_input(BenchmarkId::from_parameter(n), &store, |b, store| {
            b.iter(|| store.status(black_box(target), black_box("Option 4")))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_menu_identity,
    bench_classify_click,
    bench_status_lookup
);
criterion_main!(benches);
