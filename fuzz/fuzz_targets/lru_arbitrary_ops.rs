#![no_main]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use libfuzzer_sys::fuzz_target;
use memocache::hook::{EvictionCause, NotifyMode};
use memocache::builder::LruCacheBuilder;

// Fuzz arbitrary operation sequences on ConcurrentLruCache
//
// The first byte picks capacity and notify mode. Every entry that leaves the
// cache must be reported to the hook exactly once, so after each step
// inserted_new - reported == len().
fuzz_target!(|data: &[u8]| {
    let Some((&header, ops)) = data.split_first() else {
        return;
    };

    let capacity = usize::from(header % 16);
    let notify = if header & 0x80 == 0 {
        NotifyMode::Immediate
    } else {
        NotifyMode::Deferred
    };

    let reported = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reported);
    let cache = LruCacheBuilder::new(capacity)
        .notify_mode(notify)
        .eviction_hook(move |_: &u8, _: &u8, _: EvictionCause| {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .build();

    let mut inserted_new = 0usize;

    for pair in ops.chunks_exact(2) {
        let (op, key) = (pair[0] % 6, pair[1] % 32);

        match op {
            0 | 1 => {
                // insert
                let was_present = cache.contains(&key);
                let previous = cache.insert(key, pair[0]);
                assert_eq!(previous.is_some(), was_present);
                if !was_present {
                    inserted_new += 1;
                }
                assert_eq!(cache.keys().first(), Some(&key));
            },
            2 => {
                // get
                let present = cache.contains(&key);
                assert_eq!(cache.get(&key).is_some(), present);
                if present {
                    assert_eq!(cache.keys().first(), Some(&key));
                }
            },
            3 => {
                // peek
                let before = cache.keys();
                let _ = cache.peek(&key);
                assert_eq!(cache.keys(), before);
            },
            4 => {
                // remove
                let present = cache.contains(&key);
                assert_eq!(cache.remove(&key).is_some(), present);
                assert!(!cache.contains(&key));
            },
            5 => {
                // clear
                cache.clear();
                assert!(cache.is_empty());
            },
            _ => unreachable!(),
        }

        if capacity > 0 {
            assert!(cache.len() <= capacity);
        }
        assert_eq!(inserted_new - reported.load(Ordering::Relaxed), cache.len());
        assert!(cache.check_invariants().is_ok());
    }
});
