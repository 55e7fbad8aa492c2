//! Extraction of run summaries from renderer log text.

pub mod extract;
pub mod record;

pub use extract::Extractor;
pub use record::RunRecord;
