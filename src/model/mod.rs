//! Aggregation model: every run summary from every matched log, in listing order.

pub mod derive;

pub use derive::{AnalyzedRun, DerivedMetrics};

use crate::error::ScalingError;
use crate::log::{Extractor, RunRecord};
use crate::source::{self, LogFile};

use std::path::{Path, PathBuf};

/// What to do when one file contains a malformed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Drop the whole file, warn, and keep going.
    #[default]
    SkipFile,
    /// Fail the invocation.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// All records of one analysis, in file listing order then match order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSet {
    records: Vec<RunRecord>,
    files: usize,
    skipped: Vec<SkippedFile>,
}

impl RunSet {
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of files that contributed (including those that yielded no records).
    pub fn files(&self) -> usize {
        self.files
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Pair every record with its derived metrics, in record order.
    pub fn analyze(&self) -> Vec<AnalyzedRun<'_>> {
        self.records
            .iter()
            .map(|record| AnalyzedRun {
                record,
                derived: DerivedMetrics::of(record),
            })
            .collect()
    }
}

/// Extract every record of one file, failing on the first malformed value.
pub fn extract_file(file: &LogFile, extractor: &Extractor) -> Result<Vec<RunRecord>, ScalingError> {
    extractor
        .records(&file.text)
        .map(|r| {
            r.map_err(|e| ScalingError::MalformedRecord {
                path: file.path.clone(),
                line: e.line,
                label: e.label,
                value: e.value,
            })
        })
        .collect()
}

/// Build a RunSet from already-read files.
///
/// Each file is extracted on its own, then the per-file results are concatenated in the order
/// the files were given. No sorting, no deduplication.
pub fn aggregate(
    files: &[LogFile],
    extractor: &Extractor,
    policy: FailurePolicy,
) -> Result<RunSet, ScalingError> {
    let per_file: Vec<(&LogFile, Result<Vec<RunRecord>, ScalingError>)> = files
        .iter()
        .map(|file| (file, extract_file(file, extractor)))
        .collect();

    let mut out = RunSet {
        files: files.len(),
        ..RunSet::default()
    };
    for (file, result) in per_file {
        match result {
            Ok(records) => {
                tracing::debug!(
                    path = %file.path.display(),
                    records = records.len(),
                    "extracted run summaries"
                );
                out.records.extend(records);
            }
            Err(e @ ScalingError::MalformedRecord { .. }) if policy == FailurePolicy::SkipFile => {
                tracing::warn!(path = %file.path.display(), "skipping file: {}", e);
                out.skipped.push(SkippedFile {
                    path: file.path.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(out)
}

/// Discover, read and aggregate every log under `root` matching `pattern`.
pub fn load_run_set(
    root: &Path,
    pattern: &str,
    extractor: &Extractor,
    policy: FailurePolicy,
) -> Result<RunSet, ScalingError> {
    let paths = source::discover(root, pattern)?;
    tracing::info!(
        root = %root.display(),
        pattern,
        files = paths.len(),
        "matched log files"
    );
    let files = source::read_all(&paths)?;
    let set = aggregate(&files, extractor, policy)?;
    tracing::info!(
        records = set.len(),
        skipped = set.skipped().len(),
        "aggregated run summaries"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LabelTable;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn block(values: [u64; 8]) -> String {
        format!(
            "Data per process: {}\nProcesses: {}\nOpen file: {}ms\nLoad positions: {}ms\n\
             Sort positions: {}ms\nLoad: {}ms\nRender: {}ms\nCommunication: {}ms\n",
            values[0], values[1], values[2], values[3], values[4], values[5], values[6], values[7]
        )
    }

    fn file(name: &str, text: String) -> LogFile {
        LogFile {
            path: PathBuf::from(name),
            text,
        }
    }

    fn extractor() -> Extractor {
        Extractor::new(LabelTable::default()).unwrap()
    }

    fn process_counts(set: &RunSet) -> Vec<u64> {
        set.records().iter().map(|r| r.process_count).collect()
    }

    #[test]
    fn aggregation_follows_listing_order() {
        let a = file(
            "A",
            format!("{}{}", block([1, 1, 0, 0, 0, 0, 0, 0]), block([1, 2, 0, 0, 0, 0, 0, 0])),
        );
        let b = file("B", block([1, 3, 0, 0, 0, 0, 0, 0]));
        let ex = extractor();

        let ab = aggregate(&[a.clone(), b.clone()], &ex, FailurePolicy::SkipFile).unwrap();
        assert_eq!(process_counts(&ab), vec![1, 2, 3]);

        let ba = aggregate(&[b, a], &ex, FailurePolicy::SkipFile).unwrap();
        assert_eq!(process_counts(&ba), vec![3, 1, 2]);
    }

    #[test]
    fn duplicates_are_kept() {
        let text = block([5, 5, 5, 5, 5, 5, 5, 5]);
        let set = aggregate(
            &[file("A", text.clone()), file("B", text)],
            &extractor(),
            FailurePolicy::Abort,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0], set.records()[1]);
    }

    #[test]
    fn no_files_and_no_matches_give_empty_set() {
        let ex = extractor();
        let none = aggregate(&[], &ex, FailurePolicy::Abort).unwrap();
        assert!(none.is_empty());
        assert_eq!(none.files(), 0);

        let quiet = aggregate(&[file("A", "nothing here\n".to_string())], &ex, FailurePolicy::Abort)
            .unwrap();
        assert!(quiet.is_empty());
        assert_eq!(quiet.files(), 1);
    }

    #[test]
    fn malformed_file_is_skipped_whole_by_default() {
        let good = file("good", block([1, 4, 0, 0, 0, 0, 0, 0]));
        let bad = file(
            "bad",
            format!(
                "{}{}",
                block([1, 8, 0, 0, 0, 0, 0, 0]),
                block([1, 16, 0, 0, 0, 0, 0, 0]).replace("Load: 0ms", "Load: n/a")
            ),
        );

        let set = aggregate(&[bad, good], &extractor(), FailurePolicy::SkipFile).unwrap();
        assert_eq!(process_counts(&set), vec![4]);
        assert_eq!(set.skipped().len(), 1);
        assert_eq!(set.skipped()[0].path, PathBuf::from("bad"));
        assert!(set.skipped()[0].reason.contains("Load"));
    }

    #[test]
    fn malformed_file_aborts_under_strict_policy() {
        let bad = file("bad", block([1, 1, 1, 1, 1, 1, 1, 1]).replace("Render: 1ms", "Render: -1ms"));
        let err = aggregate(&[bad], &extractor(), FailurePolicy::Abort).unwrap_err();
        match err {
            ScalingError::MalformedRecord {
                path, line, label, value,
            } => {
                assert_eq!(path, PathBuf::from("bad"));
                assert_eq!(line, 7);
                assert_eq!(label, "Render");
                assert_eq!(value, "-1ms");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stray_label_with_bad_value_does_not_skip_the_file() {
        let text = format!(
            "Data per process: unknown\n{}Data per process: 7\nProcesses: ?\n",
            block([1, 8, 0, 0, 0, 0, 0, 0])
        );
        let set = aggregate(&[file("A", text)], &extractor(), FailurePolicy::Abort).unwrap();
        assert_eq!(process_counts(&set), vec![8]);
        assert!(set.skipped().is_empty());
    }

    #[test]
    fn analyze_pairs_records_with_metrics() {
        let set = aggregate(
            &[file("A", block([100, 4, 10, 1, 2, 50, 30, 5]))],
            &extractor(),
            FailurePolicy::Abort,
        )
        .unwrap();
        let runs = set.analyze();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].record, &set.records()[0]);
        assert_eq!(runs[0].derived.load_per_item, Some(0.5));
    }

    #[test]
    fn load_run_set_reads_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("slurm-1.out"), block([100, 4, 10, 1, 2, 20, 30, 5]))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), block([1, 1, 1, 1, 1, 1, 1, 1])).unwrap();

        let set =
            load_run_set(dir.path(), "slurm-*.out", &extractor(), FailurePolicy::Abort).unwrap();
        assert_eq!(process_counts(&set), vec![4]);
        assert_eq!(set.files(), 1);
    }
}
