//! Settings store error types.

use thiserror::Error;

/// Settings persistence error variants.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("settings IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings could not be encoded.
    #[error("failed to serialize settings: {0}")]
    Serialize(String),

    /// The settings file could not be decoded.
    #[error("failed to parse settings: {0}")]
    Deserialize(String),
}
