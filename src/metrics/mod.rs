//! Operation counters for the LRU cache (feature `metrics`).
//!
//! Recording, snapshotting and exporting are kept apart:
//! [`LruMetrics`](metrics_impl::LruMetrics) is written by the cache under its
//! lock, [`LruMetricsSnapshot`](snapshot::LruMetricsSnapshot) is a plain copy
//! taken on demand, and [`PrometheusTextExporter`](exporter::PrometheusTextExporter)
//! publishes snapshots in the Prometheus text exposition format.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
