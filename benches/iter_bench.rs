use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use strided_ndarray::{ColumnMajor, NdArray, Slice};

fn random_array(size: usize) -> NdArray<f64, 2> {
    let mut rng = StdRng::seed_from_u64(0);
    NdArray::from_fn([size, size], |_| rng.gen::<f64>())
}

// Sum over the interior of a square array: run-based iteration against a
// coordinate loop that recomputes the full offset for every element.
fn bench_sum_sliced(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_sliced");
    for size in [100usize, 500, 1000] {
        let a = random_array(size);
        let inner = a
            .slice([Slice::new(1, size - 1, 1), Slice::new(1, size - 1, 2)])
            .unwrap_or_else(|err| panic!("slice failed: {err}"));
        group.throughput(Throughput::Elements(inner.len() as u64));

        group.bench_with_input(BenchmarkId::new("per_element", size), &size, |b, _| {
            b.iter(|| {
                let [rows, cols] = *inner.shape();
                let mut s = 0.0;
                for i in 0..rows {
                    for j in 0..cols {
                        s += inner[[i, j]];
                    }
                }
                black_box(s)
            })
        });

        group.bench_with_input(BenchmarkId::new("runs", size), &size, |b, _| {
            b.iter(|| black_box(inner.iter().sum::<f64>()))
        });
    }
    group.finish();
}

// Column-major traversal of a column-major array: the fastest axis is
// contiguous, so each run is a unit-stride span.
fn bench_sum_column_major(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_column_major");
    for size in [100usize, 500, 1000] {
        let a: NdArray<f64, 2, ColumnMajor> =
            NdArray::from_fn([size, size], |[i, j]| (i * size + j) as f64);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("per_element", size), &size, |b, _| {
            b.iter(|| {
                let mut s = 0.0;
                for j in 0..size {
                    for i in 0..size {
                        s += a[[i, j]];
                    }
                }
                black_box(s)
            })
        });

        group.bench_with_input(BenchmarkId::new("runs", size), &size, |b, _| {
            b.iter(|| black_box(a.iter().sum::<f64>()))
        });
    }
    group.finish();
}

fn bench_materialize_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize_slice");
    for size in [100usize, 500] {
        let a = random_array(size);
        let view = a
            .slice([Slice::full().step_by(2), Slice::full().step_by(3)])
            .unwrap_or_else(|err| panic!("slice failed: {err}"));
        group.throughput(Throughput::Elements(view.len() as u64));
        group.bench_with_input(BenchmarkId::new("to_owned", size), &size, |b, _| {
            b.iter(|| view.to_owned())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_sum_sliced,
    bench_sum_column_major,
    bench_materialize_slice
);
criterion_main!(benches);
