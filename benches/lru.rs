use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use memocache::builder::LruCacheBuilder;
use memocache::hook::{EvictionCause, NotifyMode};
use memocache::policy::lru::{ConcurrentLruCache, LruCore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

fn filled_core(capacity: usize) -> LruCore<u64, Arc<u64>> {
    let mut cache = LruCore::new(capacity);
    for i in 0..capacity as u64 {
        cache.insert(i, Arc::new(i));
    }
    cache
}

fn bench_lru_insert_get(c: &mut Criterion) {
    c.bench_function("lru_insert_get", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for i in 0..1024u64 {
                    cache.insert(std::hint::black_box(i + 10_000), Arc::new(i));
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_eviction_churn(c: &mut Criterion) {
    c.bench_function("lru_eviction_churn", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for i in 0..4096u64 {
                    cache.insert(std::hint::black_box(10_000 + i), Arc::new(i));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_get_hotset(c: &mut Criterion) {
    c.bench_function("lru_get_hotset", |b| {
        b.iter_batched(
            || {
                let keys: Vec<u64> = {
                    let mut rng = StdRng::seed_from_u64(7);
                    (0..4096).map(|_| rng.gen_range(0..512)).collect()
                };
                (filled_core(4096), keys)
            },
            |(mut cache, keys)| {
                for key in &keys {
                    let _ = std::hint::black_box(cache.get(key));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_concurrent_memoize(c: &mut Criterion) {
    c.bench_function("concurrent_memoize_4_threads", |b| {
        b.iter_batched(
            || ConcurrentLruCache::<u64, u64>::new(1000),
            |cache| {
                let handles: Vec<_> = (0..4u64)
                    .map(|seed| {
                        let cache = cache.clone();
                        thread::spawn(move || {
                            let mut rng = StdRng::seed_from_u64(seed);
                            for _ in 0..2_000 {
                                let key = rng.gen_range(0..2_000u64);
                                std::hint::black_box(cache.get_or_insert_with(key, || key * 2));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_hook_notify_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction_hook");
    for notify in [NotifyMode::Immediate, NotifyMode::Deferred] {
        group.bench_function(format!("{notify:?}"), |b| {
            b.iter_batched(
                || {
                    let evicted = Arc::new(AtomicU64::new(0));
                    let counter = Arc::clone(&evicted);
                    LruCacheBuilder::new(256)
                        .notify_mode(notify)
                        .eviction_hook(move |_: &u64, _: &u64, _: EvictionCause| {
                            counter.fetch_add(1, Ordering::Relaxed);
                        })
                        .build()
                },
                |cache| {
                    for i in 0..2048u64 {
                        cache.insert(std::hint::black_box(i), i);
                    }
                    cache.clear();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_lru_insert_get,
    bench_lru_eviction_churn,
    bench_lru_get_hotset,
    bench_concurrent_memoize,
    bench_hook_notify_modes
);
criterion_main!(benches);
