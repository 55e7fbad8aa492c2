use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScalingError {
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("malformed record in {}:{line}: {label} has non-numeric value {value:?}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        label: String,
        value: String,
    },

    #[error("invalid label table: {0}")]
    Schema(String),

    #[error("raw image {}: {message}", .path.display())]
    RawImage { path: PathBuf, message: String },

    #[error("artifact name {0:?} is requested more than once")]
    ArtifactCollision(String),
}

impl ScalingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
