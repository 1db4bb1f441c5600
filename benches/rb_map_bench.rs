use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rw_rbmap::RbMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_put(c: &mut Criterion) {
    c.bench_function("rb_map_put_10k", |b| {
        b.iter_batched(
            RbMap::<u64, u64>::new,
            |m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.put(x, i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("rb_map_get_hit", |b| {
        let m = RbMap::new();
        let keys: Vec<u64> = lcg(7).take(20_000).collect();
        for (i, &k) in keys.iter().enumerate() {
            m.put(k, i as u64).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("rb_map_get_miss", |b| {
        let m = RbMap::new();
        for (i, x) in lcg(11).take(10_000).enumerate() {
            m.put(x, i as u64).unwrap();
        }
        // Different stream: hits are astronomically unlikely.
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = miss.next().unwrap();
            black_box(m.get(&k).unwrap());
        })
    });
}

fn bench_iter_drain(c: &mut Criterion) {
    c.bench_function("rb_map_iter_10k", |b| {
        let m = RbMap::new();
        for (i, x) in lcg(3).take(10_000).enumerate() {
            m.put(x, i as u64).unwrap();
        }
        b.iter(|| {
            let n = m.iter().count();
            black_box(n);
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_put, bench_get_hit, bench_get_miss, bench_iter_drain
}
criterion_main!(benches);
