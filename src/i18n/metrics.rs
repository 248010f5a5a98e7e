//! Translation metrics for missing-key observability.
//!
//! A missing key never fails a report: the literal key is rendered instead.
//! These counters make that degradation visible. Each `Translator` owns its
//! own instance, so the numbers describe exactly one report.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lookup counters for one translator.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Number of catalog lookups performed
    lookups: AtomicUsize,

    /// Number of lookups that fell back to a caller fallback or the raw key
    misses: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup that resolved to a catalog string.
    pub fn record_hit(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that missed the catalog.
    pub fn record_miss(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current lookup count.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Get the current miss count.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let lookups = self.lookups();
        let misses = self.misses();
        let hit_rate = if lookups > 0 {
            ((lookups - misses) as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            lookups,
            misses,
            hit_rate,
        }
    }
}

/// Snapshot of translation statistics for one report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Number of catalog lookups
    pub lookups: usize,

    /// Number of lookups that missed the catalog
    pub misses: usize,

    /// Share of lookups that resolved, as a percentage (0-100)
    pub hit_rate: f64,
}

impl MetricsReport {
    /// True when at least one label rendered as a raw key or fallback.
    pub fn has_misses(&self) -> bool {
        self.misses > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_record_hit() {
        let metrics = TranslationMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        assert_eq!(metrics.lookups(), 2);
        assert_eq!(metrics.misses(), 0);
    }

    #[test]
    fn test_record_miss_counts_as_lookup() {
        let metrics = TranslationMetrics::new();
        metrics.record_miss();
        assert_eq!(metrics.lookups(), 1);
        assert_eq!(metrics.misses(), 1);
    }

    #[test]
    fn test_instances_are_independent() {
        let first = TranslationMetrics::new();
        let second = TranslationMetrics::new();
        first.record_miss();
        assert_eq!(second.misses(), 0);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = TranslationMetrics::new().report();
        assert_eq!(report.lookups, 0);
        assert_eq!(report.misses, 0);
        assert_eq!(report.hit_rate, 0.0);
        assert!(!report.has_misses());
    }

    #[test]
    fn test_report_hit_rate() {
        let metrics = TranslationMetrics::new();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        let report = metrics.report();
        assert_eq!(report.lookups, 4);
        assert_eq!(report.misses, 1);
        assert_eq!(report.hit_rate, 75.0);
        assert!(report.has_misses());
    }

    #[test]
    fn test_report_serializes() {
        let metrics = TranslationMetrics::new();
        metrics.record_hit();
        let json = serde_json::to_value(metrics.report()).unwrap();
        assert_eq!(json["lookups"], 1);
        assert_eq!(json["hit_rate"], 100.0);
    }
}
