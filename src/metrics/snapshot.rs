/// Copy of [`LruMetrics`](crate::metrics::metrics_impl::LruMetrics) plus
/// gauges captured at snapshot time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evicted_entries: u64,

    pub remove_calls: u64,
    pub remove_found: u64,
    pub peek_calls: u64,
    pub peek_found: u64,
    pub clear_calls: u64,

    // gauges
    pub cache_len: usize,
    pub capacity: usize,
}

impl LruMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `None` before the first call.
    pub fn hit_ratio(&self) -> Option<f64> {
        if self.get_calls == 0 {
            None
        } else {
            Some(self.get_hits as f64 / self.get_calls as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ratio_needs_calls() {
        let empty = LruMetricsSnapshot::default();
        assert_eq!(empty.hit_ratio(), None);

        let snapshot = LruMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            get_misses: 1,
            ..Default::default()
        };
        assert_eq!(snapshot.hit_ratio(), Some(0.75));
    }
}
