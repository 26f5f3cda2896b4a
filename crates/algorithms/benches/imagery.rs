//! Benchmarks for imagery transforms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array2, Array3, ArrayD};
use rsutils_algorithms::imagery::{
    limit_range, manual_stretch, LimitRange, StretchOptions, StretchParams,
};

fn create_cube(size: usize, bands: usize) -> ArrayD<u16> {
    Array3::from_shape_fn((size, size, bands), |(row, col, b)| {
        ((row * 7 + col * 13 + b * 31) % 4000) as u16
    })
    .into_dyn()
}

fn bench_stretch(c: &mut Criterion) {
    let mut group = c.benchmark_group("imagery/manual_stretch");
    let params = StretchParams::multi([(10.0, 3000.0), (22.0, 2500.0), (1.0, 1200.0)]);
    let opts = StretchOptions::default()
        .with_no_data(0.0)
        .with_gain_offset(255.0, 0.0)
        .with_output_range(0.0, 255.0)
        .with_int_output(true);

    for size in [256, 512, 1024] {
        let cube = create_cube(size, 3);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| manual_stretch(black_box(cube.view()), &params, &opts).unwrap())
        });
    }
    group.finish();
}

fn bench_limit_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("imagery/limit_range");
    for size in [256, 512, 1024, 2048] {
        let plane = Array2::from_shape_fn((size, size), |(r, c)| {
            ((r * 7 + c * 13) % 200) as f64 / 100.0 - 0.5
        })
        .into_dyn();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| limit_range(black_box(plane.view()), &LimitRange::default()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stretch, bench_limit_range);
criterion_main!(benches);
