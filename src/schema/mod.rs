//! Schema layer: the labeled-line layout of one run summary in a log.
//!
//! This module is intentionally separate from extraction and rendering.
//! It owns:
//! - Field (the eight values of a run summary, in emission order)
//! - LabelTable (label text per field, loaded from JSON or a built-in convention)

pub mod field;
pub mod labels;

pub use field::Field;
pub use labels::{Convention, LabelTable};
