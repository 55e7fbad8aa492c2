//! Label table: which text labels the run summary lines carry.
//!
//! JSON shape (every key optional, missing keys fall back to the standard convention):
//! {
//!   "data_per_process": "Data per process",
//!   "processes": "Processes",
//!   "open_file": "Open file",
//!   "load_positions": "Load positions",
//!   "sort_positions": "Sorting",
//!   "load": "Loading",
//!   "render": "Rendering",
//!   "communication": "Communication",
//!   "duration_suffix": "ms",
//!   "allow_interleaved": false
//! }

use crate::error::ScalingError;
use crate::schema::Field;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Built-in labeling conventions seen across revisions of the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Convention {
    /// `Sort positions`, `Load`, `Render`.
    #[default]
    Standard,
    /// `Sorting`, `Loading`, `Rendering`.
    Verbose,
}

impl Convention {
    fn labels(self) -> [&'static str; Field::COUNT] {
        match self {
            Convention::Standard => [
                "Data per process",
                "Processes",
                "Open file",
                "Load positions",
                "Sort positions",
                "Load",
                "Render",
                "Communication",
            ],
            Convention::Verbose => [
                "Data per process",
                "Processes",
                "Open file",
                "Load positions",
                "Sorting",
                "Loading",
                "Rendering",
                "Communication",
            ],
        }
    }
}

/// Label table as it appears in JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLabelTable {
    #[serde(default)]
    pub data_per_process: Option<String>,
    #[serde(default)]
    pub processes: Option<String>,
    #[serde(default)]
    pub open_file: Option<String>,
    #[serde(default)]
    pub load_positions: Option<String>,
    #[serde(default)]
    pub sort_positions: Option<String>,
    #[serde(default)]
    pub load: Option<String>,
    #[serde(default)]
    pub render: Option<String>,
    #[serde(default)]
    pub communication: Option<String>,

    #[serde(default)]
    pub duration_suffix: Option<String>,

    #[serde(default)]
    pub allow_interleaved: bool,
}

/// Validated label table ready for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: [String; Field::COUNT],
    duration_suffix: String,
    allow_interleaved: bool,
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::convention(Convention::Standard)
    }
}

impl LabelTable {
    pub fn convention(convention: Convention) -> Self {
        Self {
            labels: convention.labels().map(str::to_string),
            duration_suffix: "ms".to_string(),
            allow_interleaved: false,
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ScalingError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ScalingError::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ScalingError> {
        let raw: RawLabelTable = serde_json::from_str(text)
            .map_err(|e| ScalingError::Schema(format!("cannot parse label table: {}", e)))?;
        raw.validate_and_build()
    }

    pub fn label(&self, field: Field) -> &str {
        &self.labels[field.index()]
    }

    /// Field whose label is exactly `label`, if any.
    pub fn field_for(&self, label: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| self.label(*f) == label)
    }

    pub fn duration_suffix(&self) -> &str {
        &self.duration_suffix
    }

    pub fn allow_interleaved(&self) -> bool {
        self.allow_interleaved
    }

    pub fn with_interleaving(mut self, allow: bool) -> Self {
        self.allow_interleaved = allow;
        self
    }
}

impl RawLabelTable {
    /// Fill defaults from the standard convention, then check that every label is usable
    /// as a line key and that no two fields share a label.
    pub fn validate_and_build(self) -> Result<LabelTable, ScalingError> {
        let defaults = Convention::Standard.labels();
        let given = [
            self.data_per_process,
            self.processes,
            self.open_file,
            self.load_positions,
            self.sort_positions,
            self.load,
            self.render,
            self.communication,
        ];

        let mut labels: [String; Field::COUNT] = Default::default();
        let mut seen: BTreeMap<String, Field> = BTreeMap::new();
        for ((field, label), default) in Field::ALL.into_iter().zip(given).zip(defaults) {
            let label = label
                .as_deref()
                .map(str::trim)
                .unwrap_or(default)
                .to_string();

            if label.is_empty() {
                return Err(ScalingError::Schema(format!(
                    "label for {} cannot be empty",
                    field.key()
                )));
            }
            if label.contains(':') {
                return Err(ScalingError::Schema(format!(
                    "label for {} cannot contain ':' ({:?})",
                    field.key(),
                    label
                )));
            }
            if let Some(prev) = seen.insert(label.clone(), field) {
                return Err(ScalingError::Schema(format!(
                    "label {:?} is used by both {} and {}",
                    label,
                    prev.key(),
                    field.key()
                )));
            }
            labels[field.index()] = label;
        }

        let duration_suffix = self
            .duration_suffix
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "ms".to_string());
        if duration_suffix.chars().any(|c| c.is_ascii_digit()) {
            return Err(ScalingError::Schema(format!(
                "duration suffix cannot contain digits ({:?})",
                duration_suffix
            )));
        }

        Ok(LabelTable {
            labels,
            duration_suffix,
            allow_interleaved: self.allow_interleaved,
        })
    }
}
