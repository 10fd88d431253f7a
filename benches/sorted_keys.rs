use anyfile::ordering::{sorted_keys, SortRule};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

fn random_map(len: usize) -> HashMap<String, f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    (0..len)
        .map(|i| (format!("key_{i:08}"), rng.gen_range(-1.0e6..1.0e6)))
        .collect()
}

fn bench_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_keys");

    for &len in &[100usize, 10_000, 100_000] {
        let map = random_map(len);
        for rule in SortRule::ALL {
            group.bench_with_input(BenchmarkId::new(rule.name(), len), &map, |b, map| {
                b.iter(|| black_box(sorted_keys(map, rule)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_rules);
criterion_main!(benches);
