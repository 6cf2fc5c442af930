use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for metrics recorded through `&self`.
///
/// `peek` runs under a shared lock, so several threads may bump the same
/// counter at once. Increments are relaxed atomics; counters are
/// observational and never order other memory.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(AtomicU64);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_at_zero_and_counts() {
        let cell = MetricsCell::new();
        assert_eq!(cell.get(), 0);
        cell.incr();
        cell.incr();
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let cell = Arc::new(MetricsCell::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        cell.incr();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cell.get(), 4_000);
    }
}
