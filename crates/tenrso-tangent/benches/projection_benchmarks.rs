//! Performance benchmarks for tenrso-tangent
//!
//! Run with: cargo bench -p tenrso-tangent
//!
//! Benchmarks cover:
//! - Serial projection over growing sample counts
//! - Parallel projection (chunked accumulators)
//! - Scaling with TT rank and order

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tenrso_tangent::*;

fn create_cores(shape: &TtShape, seed: u64) -> Vec<Vec<f64>> {
    (0..shape.order())
        .map(|i| {
            (0..shape.core_len(i))
                .map(|j| ((seed as f64 + i as f64 * 7.0 + j as f64) * 0.37).sin())
                .collect()
        })
        .collect()
}

fn create_samples(shape: &TtShape, count: usize) -> SampleSet<f64> {
    let d = shape.order();
    let mut indices = Vec::with_capacity(d * count);
    for j in 0..count {
        for (i, &n) in shape.mode_sizes().iter().enumerate() {
            indices.push((j.wrapping_mul(2654435761) >> (i % 8)) % n);
        }
    }
    let weights = (0..count).map(|j| (j as f64 * 0.13).cos()).collect();
    SampleSet::from_zero_based(d, indices, weights).unwrap()
}

fn bench_sample_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_samples");

    let shape = TtShape::uniform(vec![50; 6], 8).unwrap();
    let u = create_cores(&shape, 1);
    let v = create_cores(&shape, 2);
    let u = CoreFamily::from_vecs("U", &shape, &u).unwrap();
    let v = CoreFamily::from_vecs("V", &shape, &v).unwrap();

    for &count in [1_000, 10_000, 100_000].iter() {
        let samples = create_samples(&shape, count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("serial", count), &count, |bencher, _| {
            bencher.iter(|| {
                black_box(tt_tangent_project(&u, &v, &samples).unwrap());
            });
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(BenchmarkId::new("parallel", count), &count, |bencher, _| {
            bencher.iter(|| {
                black_box(tt_tangent_project_parallel(&u, &v, &samples, 1024).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_rank");
    let count = 20_000;

    for &rank in [2, 5, 10, 20].iter() {
        let shape = TtShape::uniform(vec![30; 5], rank).unwrap();
        let u = create_cores(&shape, 3);
        let v = create_cores(&shape, 4);
        let u = CoreFamily::from_vecs("U", &shape, &u).unwrap();
        let v = CoreFamily::from_vecs("V", &shape, &v).unwrap();
        let samples = create_samples(&shape, count);

        // d * r^2 multiply-adds per sample, for each sweep
        let ops = count * shape.order() * rank * rank * 2;
        group.throughput(Throughput::Elements(ops as u64));

        group.bench_with_input(
            BenchmarkId::new("serial", format!("d5_r{}", rank)),
            &rank,
            |bencher, _| {
                bencher.iter(|| {
                    black_box(tt_tangent_project(&u, &v, &samples).unwrap());
                });
            },
        );
    }
    group.finish();
}

fn bench_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_order");
    let count = 20_000;

    for &d in [3, 6, 10].iter() {
        let shape = TtShape::uniform(vec![20; d], 6).unwrap();
        let u = create_cores(&shape, 5);
        let v = create_cores(&shape, 6);
        let u = CoreFamily::from_vecs("U", &shape, &u).unwrap();
        let v = CoreFamily::from_vecs("V", &shape, &v).unwrap();
        let samples = create_samples(&shape, count);
        let projector = TangentProjector::default();

        group.bench_with_input(
            BenchmarkId::new("auto", format!("d{}_r6", d)),
            &d,
            |bencher, _| {
                bencher.iter(|| {
                    black_box(projector.project(&u, &v, &samples).unwrap());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_sample_count, bench_rank, bench_order);
criterion_main!(benches);
