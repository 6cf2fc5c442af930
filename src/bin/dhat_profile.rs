//! DHAT heap profiler for memocache.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::sync::Arc;
use std::thread;

use memocache::builder::{CacheConfig, LruCacheBuilder};
use memocache::hook::{EvictionCause, NotifyMode};
use memocache::policy::lru::ConcurrentLruCache;
use memocache::traits::CoreCache;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

fn page_url(id: u64) -> String {
    format!("https://example.org/item/{id}")
}

/// 90% of accesses hit 10% of keys; misses "fetch" a page body.
fn hotset_workload<C: CoreCache<String, Vec<u8>>>(
    cache: &mut C,
    operations: usize,
    universe: u64,
    seed: u64,
) {
    let mut rng = XorShift64::new(seed);
    let hot_size = (universe as f64 * 0.1) as u64;

    for _ in 0..operations {
        let id = if rng.next_f64() < 0.9 {
            rng.next_u64() % hot_size
        } else {
            hot_size + (rng.next_u64() % (universe - hot_size))
        };

        let url = page_url(id);
        if cache.get(&url).is_none() {
            let _ = cache.insert(url, vec![0u8; 256]);
        }
    }
}

fn profile_core() {
    println!("=== Profiling LruCore ===");
    let mut cache = CacheConfig {
        capacity: 1000,
        prealloc: true,
        ..CacheConfig::default()
    }
    .build_core();

    hotset_workload(&mut cache, 100_000, 8_192, 42);
    println!("  Final size: {}", CoreCache::len(&cache));
}

fn profile_concurrent(notify: NotifyMode) {
    println!("=== Profiling ConcurrentLruCache ({notify:?}) ===");
    let cache: ConcurrentLruCache<String, Vec<u8>> = LruCacheBuilder::new(1000)
        .notify_mode(notify)
        .eviction_hook(|_: &String, _: &Vec<u8>, _: EvictionCause| {})
        .build();

    let handles: Vec<_> = (0..4u64)
        .map(|worker| {
            let cache = cache.clone();
            thread::spawn(move || {
                let mut rng = XorShift64::new(worker + 1);
                for _ in 0..25_000 {
                    let url = page_url(rng.next_u64() % 4_096);
                    cache.get_or_insert_with(url, || vec![0u8; 256]);
                }
            })
        })
        .collect();
    for handle in handles {
        if handle.join().is_err() {
            eprintln!("  worker panicked");
        }
    }

    let held: Vec<Arc<Vec<u8>>> = cache.keys().iter().filter_map(|k| cache.peek(k)).collect();
    println!("  Final size: {} ({} values held)", cache.len(), held.len());
    cache.clear();
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("memocache DHAT Heap Profiling");
    println!("=============================\n");

    profile_core();
    profile_concurrent(NotifyMode::Immediate);
    profile_concurrent(NotifyMode::Deferred);

    println!("\n=============================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
