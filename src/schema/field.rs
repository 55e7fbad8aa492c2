//! The eight values a run prints, in the order it prints them.
//!
//! Example block:
//! Data per process: 8797
//! Processes: 32
//! Open file: 432ms
//! ...
//! Communication: 173ms

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    DataPerProcess,
    Processes,
    OpenFile,
    LoadPositions,
    SortPositions,
    Load,
    Render,
    Communication,
}

impl Field {
    pub const COUNT: usize = 8;

    pub const ALL: [Field; Field::COUNT] = [
        Field::DataPerProcess,
        Field::Processes,
        Field::OpenFile,
        Field::LoadPositions,
        Field::SortPositions,
        Field::Load,
        Field::Render,
        Field::Communication,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Phase durations carry a unit suffix; the two preamble counts do not.
    pub fn is_duration(self) -> bool {
        !matches!(self, Field::DataPerProcess | Field::Processes)
    }

    /// Key used in label table JSON.
    pub fn key(self) -> &'static str {
        match self {
            Field::DataPerProcess => "data_per_process",
            Field::Processes => "processes",
            Field::OpenFile => "open_file",
            Field::LoadPositions => "load_positions",
            Field::SortPositions => "sort_positions",
            Field::Load => "load",
            Field::Render => "render",
            Field::Communication => "communication",
        }
    }
}
