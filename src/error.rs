//! Errors for the fallible edges of the crate (configuration and files).
//!
//! The simulation itself never fails; see `sim::placement::FullRowPolicy`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("grid must have at least 2 rows and 1 column (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("palette must hold between 1 and 255 colors (got {0})")]
    InvalidPalette(usize),
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
