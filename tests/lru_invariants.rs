// ==============================================
// LRU BEHAVIOR TESTS (integration)
// ==============================================
//
// End-to-end checks of the public cache API: recency ordering, capacity
// enforcement and eviction notifications, driven only through what a
// downstream crate can see.

use std::sync::Arc;

use memocache::prelude::*;
use parking_lot::Mutex;

type Events = Arc<Mutex<Vec<(String, i32, EvictionCause)>>>;

fn cache_with_log(capacity: usize) -> (ConcurrentLruCache<String, i32>, Events) {
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let cache = LruCacheBuilder::new(capacity)
        .eviction_hook(move |key: &String, value: &i32, cause: EvictionCause| {
            sink.lock().push((key.clone(), *value, cause));
        })
        .build();
    (cache, events)
}

fn k(key: &str) -> String {
    key.to_string()
}

// ==============================================
// Capacity-2 walkthrough
// ==============================================

mod walkthrough {
    use super::*;

    #[test]
    fn insert_evict_promote_evict() {
        let (cache, events) = cache_with_log(2);

        // a) fill to capacity
        cache.insert(k("a"), 1);
        cache.insert(k("b"), 2);
        assert_eq!(cache.len(), 2);
        assert!(events.lock().is_empty());

        // b) third key pushes out the oldest
        cache.insert(k("c"), 3);
        assert_eq!(*events.lock(), vec![(k("a"), 1, EvictionCause::Capacity)]);
        assert_eq!(cache.len(), 2);

        // c) lookups
        assert!(cache.get(&k("a")).is_none());
        assert_eq!(cache.get(&k("b")).as_deref(), Some(&2));
        assert_eq!(cache.get(&k("c")).as_deref(), Some(&3));

        // d) touching b makes c the eviction candidate
        cache.get(&k("b"));
        cache.insert(k("d"), 4);
        assert_eq!(
            events.lock().last(),
            Some(&(k("c"), 3, EvictionCause::Capacity))
        );
        assert_eq!(cache.keys(), vec![k("d"), k("b")]);
    }
}

// ==============================================
// Properties
// ==============================================

mod properties {
    use super::*;

    #[test]
    fn len_never_exceeds_capacity() {
        let (cache, _) = cache_with_log(5);
        for i in 0..100 {
            cache.insert(format!("key-{i}"), i);
            assert!(cache.len() <= 5);
        }
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn get_after_insert_returns_value() {
        let (cache, _) = cache_with_log(3);
        cache.insert(k("x"), 42);
        assert_eq!(cache.get(&k("x")).as_deref(), Some(&42));
    }

    #[test]
    fn update_keeps_len_and_skips_hook() {
        let (cache, events) = cache_with_log(2);
        cache.insert(k("a"), 1);
        cache.insert(k("b"), 2);
        cache.insert(k("a"), 11);
        assert_eq!(cache.len(), 2);
        assert!(events.lock().is_empty());
        assert_eq!(cache.get(&k("a")).as_deref(), Some(&11));
    }

    #[test]
    fn update_refreshes_recency() {
        let (cache, events) = cache_with_log(2);
        cache.insert(k("a"), 1);
        cache.insert(k("b"), 2);
        cache.insert(k("a"), 10);
        cache.insert(k("c"), 3);
        assert_eq!(*events.lock(), vec![(k("b"), 2, EvictionCause::Capacity)]);
    }

    #[test]
    fn miss_does_not_change_order() {
        let (cache, _) = cache_with_log(3);
        cache.insert(k("a"), 1);
        cache.insert(k("b"), 2);
        let before = cache.keys();
        assert!(cache.get(&k("zzz")).is_none());
        assert_eq!(cache.keys(), before);
    }

    #[test]
    fn remove_fires_hook_once_and_absent_key_is_silent() {
        let (cache, events) = cache_with_log(3);
        cache.insert(k("a"), 1);
        cache.remove(&k("a"));
        cache.remove(&k("a"));
        cache.remove(&k("never"));
        assert_eq!(*events.lock(), vec![(k("a"), 1, EvictionCause::Explicit)]);
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_notifies_every_entry_and_keeps_capacity() {
        let (cache, events) = cache_with_log(4);
        for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
            cache.insert(k(key), i as i32);
        }
        cache.clear();

        let mut keys: Vec<String> = events.lock().iter().map(|(key, _, _)| key.clone()).collect();
        keys.sort();
        assert_eq!(keys, vec![k("a"), k("b"), k("c"), k("d")]);
        assert!(events
            .lock()
            .iter()
            .all(|(_, _, cause)| *cause == EvictionCause::Cleared));
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn clear_on_empty_cache_is_silent() {
        let (cache, events) = cache_with_log(4);
        cache.clear();
        assert!(events.lock().is_empty());
    }

    #[test]
    fn unbounded_cache_never_evicts() {
        let (cache, events) = cache_with_log(0);
        for i in 0..5_000 {
            cache.insert(format!("{i}"), i);
        }
        assert_eq!(cache.len(), 5_000);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn capacity_one() {
        let (cache, events) = cache_with_log(1);
        cache.insert(k("a"), 1);
        cache.insert(k("b"), 2);
        assert_eq!(cache.keys(), vec![k("b")]);
        assert_eq!(events.lock().len(), 1);
    }

    #[test]
    fn keys_run_most_to_least_recent() {
        let (cache, _) = cache_with_log(4);
        for key in ["a", "b", "c", "d"] {
            cache.insert(k(key), 0);
        }
        cache.get(&k("b"));
        cache.peek(&k("a"));
        assert_eq!(cache.keys(), vec![k("b"), k("d"), k("c"), k("a")]);
        assert!(cache.check_invariants().is_ok());
    }
}

// ==============================================
// Single-threaded core through the traits
// ==============================================

mod core_traits {
    use super::*;

    fn fill<C: MutableCache<u32, u32>>(cache: &mut C, n: u32) {
        for i in 0..n {
            cache.insert(i, i);
        }
    }

    #[test]
    fn generic_driver_respects_capacity() {
        let mut cache = CacheConfig::new(10).build_core::<u32, u32>();
        fill(&mut cache, 100);
        assert_eq!(CoreCache::len(&cache), 10);
        assert!(CoreCache::contains(&cache, &99));
        assert!(!CoreCache::contains(&cache, &0));
        assert_eq!(MutableCache::remove(&mut cache, &95), Some(95));
    }
}
