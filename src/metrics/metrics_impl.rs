use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::LruMetricsSnapshot;
use crate::metrics::traits::{CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder};

#[derive(Debug, Default)]
pub struct LruMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evicted_entries: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub clear_calls: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
}

impl LruMetrics {
    /// Copies the counters and attaches the given gauges.
    pub fn snapshot(&self, cache_len: usize, capacity: usize) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            evicted_entries: self.evicted_entries,
            remove_calls: self.remove_calls,
            remove_found: self.remove_found,
            peek_calls: self.peek_calls.get(),
            peek_found: self.peek_found.get(),
            clear_calls: self.clear_calls,
            cache_len,
            capacity,
        }
    }
}

impl CoreMetricsRecorder for LruMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl LruMetricsRecorder for LruMetrics {
    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }
}

impl LruMetricsReadRecorder for LruMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_hits_and_misses_both_count_as_calls() {
        let mut metrics = LruMetrics::default();
        metrics.record_get_hit();
        metrics.record_get_miss();
        metrics.record_get_miss();
        assert_eq!(metrics.get_calls, 3);
        assert_eq!(metrics.get_hits, 1);
        assert_eq!(metrics.get_misses, 2);
    }

    #[test]
    fn snapshot_copies_counters_and_gauges() {
        let mut metrics = LruMetrics::default();
        metrics.record_insert_call();
        metrics.record_insert_new();
        metrics.record_evicted_entry();
        metrics.record_remove_call();
        metrics.record_peek_call();
        metrics.record_peek_found();

        let snapshot = metrics.snapshot(3, 8);
        assert_eq!(snapshot.insert_calls, 1);
        assert_eq!(snapshot.insert_new, 1);
        assert_eq!(snapshot.evicted_entries, 1);
        assert_eq!(snapshot.remove_calls, 1);
        assert_eq!(snapshot.remove_found, 0);
        assert_eq!(snapshot.peek_calls, 1);
        assert_eq!(snapshot.peek_found, 1);
        assert_eq!(snapshot.cache_len, 3);
        assert_eq!(snapshot.capacity, 8);
    }
}
