use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use icebreaker_sampler::{create, next, sample_n, ShuffleStrategy};
use std::hint::black_box;

fn bench_next(c: &mut Criterion) {
    c.bench_function("mulberry32_next_1k", |b| {
        b.iter(|| {
            let mut state = create(black_box(42));
            let mut acc = 0.0;
            for _ in 0..1_000 {
                let (draw, next_state) = next(state);
                acc += draw;
                state = next_state;
            }
            black_box(acc)
        })
    });
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_n");
    for len in [8usize, 64, 512] {
        let items: Vec<u32> = (0..len as u32).collect();
        for strategy in [ShuffleStrategy::LegacyComparator, ShuffleStrategy::FisherYates] {
            group.bench_with_input(BenchmarkId::new(strategy.to_string(), len), &items, |b, items| {
                b.iter(|| sample_n(create(black_box(7)), items, 3, strategy))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_next, bench_sample);
criterion_main!(benches);
