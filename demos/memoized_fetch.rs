//! Memoizing a slow fetch-and-parse step across worker threads.
//!
//! A listing yields detail URLs; each worker resolves one URL through the
//! cache, only "fetching" on a miss. Repeated URLs are served from memory.
//!
//! Run with: RUST_LOG=memocache=trace,memoized_fetch=debug cargo run --example memoized_fetch

use std::thread;
use std::time::Duration;

use memocache::builder::{CacheConfig, LruCacheBuilder};
use memocache::hook::{EvictionCause, NotifyMode};
use memocache::policy::lru::ConcurrentLruCache;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug)]
struct Detail {
    url: String,
    title: String,
}

#[derive(Debug)]
struct FetchError(String);

fn fetch_and_parse(url: &str) -> Result<Detail, FetchError> {
    thread::sleep(Duration::from_millis(20));
    if url.ends_with("/404") {
        return Err(FetchError(format!("{url}: not found")));
    }
    let title = url.rsplit('/').next().unwrap_or_default().to_uppercase();
    Ok(Detail {
        url: url.to_string(),
        title,
    })
}

fn listing() -> Vec<String> {
    let mut urls: Vec<String> = (0..12)
        .map(|i| format!("https://example.org/detail/item{}", i % 8))
        .collect();
    urls.push("https://example.org/detail/404".to_string());
    urls
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cache: ConcurrentLruCache<String, Detail> =
        LruCacheBuilder::from_config(CacheConfig::new(6))
            .notify_mode(NotifyMode::Deferred)
            .eviction_hook(|url: &String, _: &Detail, cause: EvictionCause| {
                debug!(%url, %cause, "dropped cached detail");
            })
            .build();

    for pass in 1..=2 {
        info!(pass, "resolving listing");
        let handles: Vec<_> = listing()
            .into_iter()
            .map(|url| {
                let cache = cache.clone();
                thread::spawn(move || {
                    let hit = cache.contains(&url);
                    match cache.try_get_or_insert_with(url.clone(), || fetch_and_parse(&url)) {
                        Ok(detail) => {
                            debug!(url = %detail.url, title = %detail.title, hit, "resolved")
                        },
                        Err(FetchError(reason)) => warn!(%reason, "fetch failed"),
                    }
                })
            })
            .collect();

        for handle in handles {
            if handle.join().is_err() {
                warn!("worker panicked");
            }
        }
        info!(pass, cached = cache.len(), keys = ?cache.keys(), "pass complete");
    }
}
