use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use trellis_layout::{Dimension, distribute};

fn bench_distribute(c: &mut Criterion) {
    let dims: Vec<Dimension> = (0u16..16)
        .map(|i| {
            Dimension::between(i % 5, 40 + i)
                .preferring(10 + i * 2)
                .weighted(1 + i % 4)
        })
        .collect();

    c.bench_function("distribute_16_mixed", |b| {
        b.iter(|| distribute(black_box(237), black_box(&dims)))
    });

    let uniform = vec![Dimension::default(); 64];
    c.bench_function("distribute_64_uniform", |b| {
        b.iter(|| distribute(black_box(500), black_box(&uniform)))
    });
}

criterion_group!(benches, bench_distribute);
criterion_main!(benches);
