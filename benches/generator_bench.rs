//! Benchmarks for CPU-side transform generation and seed pools.
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use instancing::instancing::{
    seeds, Extent, InstanceTable, ScaleMode, ScaleRange, TransformGenerator,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn forest_generator() -> TransformGenerator {
    let extent = Extent::new(140.0).unwrap();
    let scale = ScaleRange::new(0.5, 2.5).unwrap();
    TransformGenerator::new(extent, scale).with_mode(ScaleMode::Vertical)
}

fn generate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_transforms");
    let generator = forest_generator();

    for count in [1_000, 15_000, 100_000] {
        let _ = group.bench_function(format!("{count}_instances"), |b| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| black_box(generator.generate(black_box(count), &mut rng)));
        });
    }
    group.finish();
}

fn regenerate_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let mut table = InstanceTable::new(forest_generator(), 15_000, &mut rng);

    let _ = c.bench_function("regenerate_and_pack_15000", |b| {
        b.iter(|| {
            table.regenerate(15_000, &mut rng);
            black_box(table.to_raw())
        });
    });
}

fn seed_pool_benchmark(c: &mut Criterion) {
    let _ = c.bench_function("supertorus_pool_100000", |b| {
        let mut rng = StdRng::seed_from_u64(3);
        b.iter(|| black_box(seeds::supertorus_points(100_000, &mut rng)));
    });
}

criterion_group!(
    benches,
    generate_benchmark,
    regenerate_benchmark,
    seed_pool_benchmark
);
criterion_main!(benches);
