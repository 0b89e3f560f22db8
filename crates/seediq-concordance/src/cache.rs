//! Frequency-report cache owned by the service layer.
//!
//! The core aggregation is a pure function, so its result is cacheable by
//! corpus snapshot plus the include-examples flag. Entries are never
//! invalidated in place; a new corpus snapshot gets a new key.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use seediq_corpus::FrequencyReport;

/// Cache key: corpus fingerprint plus the example-inclusion flag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SnapshotKey {
    pub snapshot: u64,
    pub include_examples: bool,
}

/// Concurrent, read-mostly cache of aggregated frequency reports.
#[derive(Clone, Default)]
pub struct ReportCache {
    reports: Arc<DashMap<SnapshotKey, Arc<FrequencyReport>>>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached report for `key`, computing and storing it on miss.
    pub fn get_or_compute<F>(&self, key: SnapshotKey, compute: F) -> Arc<FrequencyReport>
    where
        F: FnOnce() -> FrequencyReport,
    {
        if let Some(hit) = self.reports.get(&key) {
            debug!("report cache hit for {:016x}", key.snapshot);
            return Arc::clone(&hit);
        }
        debug!("report cache miss for {:016x}", key.snapshot);
        let report = Arc::new(compute());
        self.reports.insert(key, Arc::clone(&report));
        report
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seediq_corpus::{CorpusStats, aggregate};

    fn key(snapshot: u64) -> SnapshotKey {
        SnapshotKey {
            snapshot,
            include_examples: false,
        }
    }

    #[test]
    fn computes_once_per_key() {
        let cache = ReportCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            cache.get_or_compute(key(1), || {
                calls += 1;
                aggregate(&[], &[], CorpusStats::default(), false)
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_keys_get_distinct_entries() {
        let cache = ReportCache::new();
        cache.get_or_compute(key(1), || aggregate(&[], &[], CorpusStats::default(), false));
        cache.get_or_compute(
            SnapshotKey {
                snapshot: 1,
                include_examples: true,
            },
            || aggregate(&[], &[], CorpusStats::default(), true),
        );
        assert_eq!(cache.len(), 2);
    }
}
