use crate::schema::Field;
use serde::Serialize;

/// One run summary printed by the renderer. Durations are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    pub data_per_process: u64,
    pub process_count: u64,
    pub open_file_ms: u64,
    pub load_positions_ms: u64,
    pub sort_positions_ms: u64,
    pub load_ms: u64,
    pub render_ms: u64,
    pub communication_ms: u64,
}

impl RunRecord {
    /// Build from values in `Field::ALL` order.
    pub fn from_values(values: [u64; Field::COUNT]) -> Self {
        let [
            data_per_process,
            process_count,
            open_file_ms,
            load_positions_ms,
            sort_positions_ms,
            load_ms,
            render_ms,
            communication_ms,
        ] = values;
        Self {
            data_per_process,
            process_count,
            open_file_ms,
            load_positions_ms,
            sort_positions_ms,
            load_ms,
            render_ms,
            communication_ms,
        }
    }
}
