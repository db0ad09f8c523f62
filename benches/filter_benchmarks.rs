use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use membership_filter::{MembershipFilter, probe_positions};
use rand::{Rng, distr::Alphanumeric};
use std::hint::black_box;

// Helper function to generate random string data
fn generate_random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn generate_test_data(count: usize) -> Vec<String> {
    (0..count).map(|_| generate_random_string(32)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_operations");

    for expected_items in [1_000, 10_000, 100_000] {
        let test_data = generate_test_data(expected_items);

        group.bench_with_input(
            BenchmarkId::new("insert", expected_items),
            &(expected_items, &test_data),
            |b, (n, data)| {
                b.iter_batched(
                    || {
                        MembershipFilter::with_params(*n, 0.01)
                            .expect("Failed to create filter")
                    },
                    |mut filter| {
                        for item in data.iter() {
                            filter.insert(black_box(item.as_bytes()));
                        }
                        filter
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains_operations");

    for expected_items in [1_000, 10_000, 100_000] {
        let known = generate_test_data(expected_items);
        let hits = known[..1_000].to_vec();
        let unknown = generate_test_data(1_000);
        let mut filter = MembershipFilter::with_params(expected_items, 0.01)
            .expect("Failed to create filter");
        for item in &known {
            filter.insert(item.as_bytes());
        }

        group.bench_with_input(
            BenchmarkId::new("hit", expected_items),
            &hits,
            |b, items| {
                b.iter(|| {
                    for item in items {
                        black_box(filter.contains(item.as_bytes()));
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("miss", expected_items),
            &unknown,
            |b, items| {
                b.iter(|| {
                    for item in items {
                        black_box(filter.contains(item.as_bytes()));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_probe_positions(c: &mut Criterion) {
    let item = generate_random_string(32);

    c.bench_function("probe_positions_k7", |b| {
        b.iter(|| {
            probe_positions(black_box(item.as_bytes()), 7, 95_851).sum::<usize>()
        })
    });
}

criterion_group!(benches, bench_insert, bench_contains, bench_probe_positions);
criterion_main!(benches);
