//! Error types for the presentation timer

use thiserror::Error;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the engine, the data model and the settings store
///
/// Out-of-order transitions (e.g. `pause()` while idle) are not errors; the
/// engine ignores them.
#[derive(Error, Debug)]
pub enum Error {
    /// Countdown length was zero or otherwise unusable
    #[error("Invalid duration: {0} seconds (must be at least 1)")]
    InvalidDuration(i64),

    /// Alert configuration failed validation
    #[error("Invalid alert config: {0}")]
    InvalidAlertConfig(String),

    /// Minutes/seconds timer configuration failed validation
    #[error("Invalid timer config: {0}")]
    InvalidTimerConfig(String),

    /// Settings file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio output device could not be opened
    #[error("Audio output unavailable: {0}")]
    Audio(String),

    /// Settings file could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error comes from rejected caller input rather than I/O
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidDuration(_) | Error::InvalidAlertConfig(_) | Error::InvalidTimerConfig(_)
        )
    }
}
