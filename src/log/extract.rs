use crate::error::ScalingError;
use crate::log::record::RunRecord;
use crate::schema::{Field, LabelTable};

use regex::Regex;
use std::iter::Enumerate;
use std::str::Lines;
use thiserror::Error;

/// A value in an otherwise complete run summary that is not an integer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {label} has non-numeric value {value:?}")]
pub struct MalformedValue {
    pub line: usize,
    pub label: String,
    pub value: String,
}

/// Scans log text for run summaries laid out as in a `LabelTable`.
///
/// Expected block (one labeled line per field, in `Field::ALL` order):
/// Data per process: 8797
/// Processes: 32
/// Open file: 432ms
/// Load positions: 0ms
/// Sort positions: 5ms
/// Load: 17ms
/// Render: 30ms
/// Communication: 173ms
#[derive(Debug, Clone)]
pub struct Extractor {
    table: LabelTable,
    line_re: Regex,
}

impl Extractor {
    pub fn new(table: LabelTable) -> Result<Self, ScalingError> {
        // Capture:
        // 1) label: one of the eight configured labels
        // 2) value: rest of the line, surrounding whitespace trimmed
        let alternatives: Vec<String> = Field::ALL
            .into_iter()
            .map(|f| regex::escape(table.label(f)))
            .collect();
        let pattern = format!(
            r#"^\s*(?P<label>{})\s*:\s*(?P<value>.*?)\s*$"#,
            alternatives.join("|")
        );
        let line_re = Regex::new(&pattern)
            .map_err(|e| ScalingError::Schema(format!("cannot build line matcher: {}", e)))?;

        Ok(Self { table, line_re })
    }

    /// Lazily yield every complete run summary in `text`, top to bottom.
    ///
    /// Calling this again on the same text starts a fresh scan.
    pub fn records<'a>(&'a self, text: &'a str) -> Records<'a> {
        Records {
            extractor: self,
            lines: text.lines().enumerate(),
            partial: Partial::default(),
            failed: false,
        }
    }

    fn parse_value(&self, field: Field, lno: usize, raw: &str) -> Result<u64, MalformedValue> {
        let digits = if field.is_duration() {
            raw.strip_suffix(self.table.duration_suffix())
                .unwrap_or(raw)
                .trim_end()
        } else {
            raw
        };

        let malformed = || MalformedValue {
            line: lno,
            label: self.table.label(field).to_string(),
            value: raw.to_string(),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        digits.parse::<u64>().map_err(|_| malformed())
    }
}

/// Raw values (with their line numbers) captured so far for the block being matched.
///
/// Values are only parsed once all eight labels are present, so a block that never
/// completes is dropped without error whatever its values look like.
#[derive(Debug, Default)]
struct Partial<'a> {
    raw: [(usize, &'a str); Field::COUNT],
    next: usize,
}

impl Partial<'_> {
    fn reset(&mut self) {
        self.next = 0;
    }
}

/// Iterator over the run summaries of one text. Stops after the first complete summary
/// holding a malformed value.
#[derive(Debug)]
pub struct Records<'a> {
    extractor: &'a Extractor,
    lines: Enumerate<Lines<'a>>,
    partial: Partial<'a>,
    failed: bool,
}

impl Iterator for Records<'_> {
    type Item = Result<RunRecord, MalformedValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let table = &self.extractor.table;
        for (lineno, line) in self.lines.by_ref() {
            let lno = lineno + 1;

            let Some(caps) = self.extractor.line_re.captures(line) else {
                if !table.allow_interleaved() {
                    self.partial.reset();
                }
                continue;
            };

            // The regex only admits configured labels.
            let Some(field) = table.field_for(&caps["label"]) else {
                continue;
            };

            if field.index() != self.partial.next {
                self.partial.reset();
                if field != Field::DataPerProcess {
                    continue;
                }
            }

            let raw = caps.name("value").map_or("", |m| m.as_str());
            self.partial.raw[field.index()] = (lno, raw);
            self.partial.next += 1;

            if self.partial.next == Field::COUNT {
                self.partial.reset();
                let mut values = [0u64; Field::COUNT];
                for (field, (lno, raw)) in Field::ALL.into_iter().zip(self.partial.raw) {
                    match self.extractor.parse_value(field, lno, raw) {
                        Ok(v) => values[field.index()] = v,
                        Err(e) => {
                            self.failed = true;
                            return Some(Err(e));
                        }
                    }
                }
                return Some(Ok(RunRecord::from_values(values)));
            }
        }

        None
    }
}
