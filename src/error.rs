use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Could not open {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed route table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stops {first:?} and {second:?} share sequence {sequence}")]
    DuplicateSequence {
        sequence: i64,
        first: String,
        second: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Invalid time of day {0:?}, expected HH:MM")]
    InvalidTimeOfDay(String),
}
