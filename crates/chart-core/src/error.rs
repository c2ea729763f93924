// File: crates/chart-core/src/error.rs
// Summary: Error type shared by chart builders and scene serialization.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    /// A builder was called without an extractor it cannot work without.
    #[error("missing required `{0}` extractor")]
    MissingExtractor(&'static str),

    #[error("color palette is empty")]
    EmptyPalette,

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("scene serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ChartError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }
}
