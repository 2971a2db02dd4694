//! Benchmarks for permission checks
//!
//! Run with: cargo bench --bench registry_bench

use authorize_roles::{Principal, PrincipalOptions, Role, RoleMixin, RoleRegistry};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Builds a linear inheritance chain `level0 <- level1 <- ... <- level{depth-1}`
fn chain(depth: usize) -> RoleMixin {
    let registry = RoleRegistry::new();
    registry.register("level0", ["read", "doc:*"]).unwrap();
    for i in 1..depth {
        registry
            .register_role(
                Role::new(format!("level{}", i))
                    .with_action(format!("action{}", i))
                    .inherits_from(format!("level{}", i - 1)),
            )
            .unwrap();
    }
    RoleMixin::new(registry)
}

fn top(roles: &RoleMixin, depth: usize) -> Principal {
    roles
        .build_principal(
            "user:bench",
            PrincipalOptions::with_role(format!("level{}", depth - 1)),
        )
        .unwrap()
}

fn bench_can_perform(c: &mut Criterion) {
    let mut group = c.benchmark_group("can_perform");

    for depth in [1usize, 5, 20] {
        let roles = chain(depth);
        let principal = top(&roles, depth);

        group.bench_with_input(BenchmarkId::new("cached", depth), &depth, |b, _| {
            b.iter(|| {
                roles
                    .can_perform(black_box(&principal), black_box("doc:edit"))
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("cold", depth), &depth, |b, _| {
            b.iter(|| {
                roles.registry().clear_cache();
                roles.can_perform(black_box(&principal), black_box("read")).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    c.bench_function("register_100_roles", |b| {
        b.iter(|| {
            let registry = RoleRegistry::new();
            for i in 0..100 {
                registry
                    .register(format!("role{}", i), ["read", "write"])
                    .unwrap();
            }
            black_box(registry.len())
        })
    });
}

criterion_group!(benches, bench_can_perform, bench_registration);
criterion_main!(benches);
