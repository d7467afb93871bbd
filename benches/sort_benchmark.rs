use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use paste::paste;
use rand::{distributions::Standard, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};

pub fn create_uniform_data<T>(size: usize) -> Vec<T>
where
    Standard: Distribution<T>,
{
    let mut rng = StdRng::seed_from_u64(42);
    let vals: Vec<T> = (0..size).map(|_| rng.gen::<T>()).collect();
    vals
}

fn slice_sort_unstable<T: Ord>(data: &mut [T]) {
    data.sort_unstable();
}

fn slice_sort_unstable_by<T: PartialOrd>(data: &mut [T]) {
    data.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
}

macro_rules! std_sort_bench {
    ($group:ident, $ty:ident, $sort_fn:ident) => {
        paste! {
            {
                let data_t = create_uniform_data::<$ty>(1024 * 1024);
                $group.bench_function(concat!("std_unstable_", stringify!($ty)), move |b| {
                    // This will avoid timing the to_vec call.
                    b.iter_batched(
                        || data_t.clone(),
                        |mut data| {
                            $sort_fn(&mut data);
                            black_box(data);
                        },
                        BatchSize::LargeInput,
                    )
                });
            }
        }
    };
}

macro_rules! vexsort_bench {
    ($group:ident, $ty:ident) => {
        paste! {
            {
                let data_t = create_uniform_data::<$ty>(1024 * 1024);
                $group.bench_function(concat!("vexsort_", stringify!($ty)), move |b| {
                    // This will avoid timing the to_vec call.
                    b.iter_batched(
                        || data_t.clone(),
                        |mut data| {
                            vexsort::[<sort_ $ty>](&mut data);
                            black_box(data);
                        },
                        BatchSize::LargeInput,
                    )
                });
            }
        }
    };
}

macro_rules! vexselect_bench {
    ($group:ident, $ty:ident) => {
        paste! {
            {
                let data_t = create_uniform_data::<$ty>(1024 * 1024);
                $group.bench_function(concat!("vexselect_median_", stringify!($ty)), move |b| {
                    b.iter_batched(
                        || data_t.clone(),
                        |mut data| {
                            let mid = data.len() / 2;
                            vexsort::[<select_ $ty>](&mut data, mid, false);
                            black_box(data);
                        },
                        BatchSize::LargeInput,
                    )
                });
            }
        }
    };
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort benchmarks");
    group.throughput(Throughput::Bytes(1024 * 1024 * 8));

    std_sort_bench!(group, i64, slice_sort_unstable);
    std_sort_bench!(group, u64, slice_sort_unstable);
    std_sort_bench!(group, i32, slice_sort_unstable);
    std_sort_bench!(group, u16, slice_sort_unstable);
    std_sort_bench!(group, f64, slice_sort_unstable_by);
    std_sort_bench!(group, f32, slice_sort_unstable_by);

    vexsort_bench!(group, i64);
    vexsort_bench!(group, u64);
    vexsort_bench!(group, i32);
    vexsort_bench!(group, u16);
    vexsort_bench!(group, f64);
    vexsort_bench!(group, f32);

    vexselect_bench!(group, i64);
    vexselect_bench!(group, f32);

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
