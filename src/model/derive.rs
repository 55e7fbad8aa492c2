//! Per-record scaling metrics: phase time normalized by the data each process handled.

use crate::log::RunRecord;
use serde::Serialize;

/// Derived values for one record. `None` means undefined (no data per process).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub load_per_item: Option<f64>,
    pub render_per_item: Option<f64>,
}

impl DerivedMetrics {
    pub fn of(record: &RunRecord) -> Self {
        Self {
            load_per_item: per_item(record.load_ms, record.data_per_process),
            render_per_item: per_item(record.render_ms, record.data_per_process),
        }
    }
}

/// A record paired with its derived metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyzedRun<'a> {
    pub record: &'a RunRecord,
    pub derived: DerivedMetrics,
}

fn per_item(ms: u64, items: u64) -> Option<f64> {
    (items != 0).then(|| ms as f64 / items as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(data_per_process: u64, load_ms: u64, render_ms: u64) -> RunRecord {
        RunRecord {
            data_per_process,
            load_ms,
            render_ms,
            ..RunRecord::from_values([0; 8])
        }
    }

    #[test]
    fn load_per_item_is_exact() {
        let m = DerivedMetrics::of(&record(100, 50, 30));
        assert_eq!(m.load_per_item, Some(0.5));
        assert_eq!(m.render_per_item, Some(0.3));
    }

    #[test]
    fn zero_data_is_undefined_not_a_fault() {
        let m = DerivedMetrics::of(&record(0, 50, 30));
        assert_eq!(m.load_per_item, None);
        assert_eq!(m.render_per_item, None);
    }

    #[test]
    fn zero_duration_is_defined() {
        let m = DerivedMetrics::of(&record(8, 0, 0));
        assert_eq!(m.load_per_item, Some(0.0));
    }
}
