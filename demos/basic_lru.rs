//! Basic LRU cache usage with an eviction hook.
//!
//! Run with: cargo run --example basic_lru

use memocache::builder::LruCacheBuilder;
use memocache::hook::EvictionCause;
use memocache::policy::lru::ConcurrentLruCache;

fn main() {
    println!("=== LRU Cache ===\n");

    let cache: ConcurrentLruCache<u64, String> = LruCacheBuilder::new(3)
        .eviction_hook(|key: &u64, value: &String, cause: EvictionCause| {
            println!("   evicted {key} => {value:?} ({cause})");
        })
        .build();

    cache.insert(1, "one".to_string());
    cache.insert(2, "two".to_string());
    cache.insert(3, "three".to_string());

    // Access key 1 to make it MRU
    cache.get(&1);

    // Insert key 4, evicts LRU (key 2)
    println!("1. Insert over capacity");
    cache.insert(4, "four".to_string());

    println!("   contains 1? {} (was accessed)", cache.contains(&1));
    println!("   contains 2? {} (evicted as LRU)", cache.contains(&2));
    println!("   contains 4? {} (just inserted)", cache.contains(&4));
    println!("   order (MRU first): {:?}", cache.keys());
    println!();

    // Updating does not evict or notify
    println!("2. Update in place");
    let previous = cache.insert(3, "THREE".to_string());
    println!("   previous value: {:?}", previous.as_deref());
    println!("   len: {}", cache.len());
    println!();

    println!("3. Explicit remove");
    cache.remove(&4);
    println!();

    println!("4. Clear");
    cache.clear();
    println!("   len after clear: {}, capacity: {}", cache.len(), cache.capacity());
}
