//! Error types for the fallible edges of the crate
//!
//! Normalization and projection never fail. Only preset loading and output
//! writing can go wrong.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DcaError>;

#[derive(Error, Debug)]
pub enum DcaError {
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid preset row {row}: {message}")]
    InvalidPreset { row: usize, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
