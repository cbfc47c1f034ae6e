//! Error types for podium-core.

use thiserror::Error;

/// Error type for podium operations.
///
/// Most configuration problems are recovered locally (clamped or replaced by a
/// default). These variants are returned by the strict entry points only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown technique: {0}")]
    UnknownTechnique(String),

    #[error("Unknown polar pattern: {0}")]
    UnknownPattern(String),

    #[error("Unknown reverb preset: {0}")]
    UnknownReverbPreset(String),

    #[error("Unknown ground surface: {0}")]
    UnknownSurface(String),

    #[error("Sample rate mismatch: expected {expected} Hz, found {found} Hz")]
    SampleRateMismatch { expected: u32, found: u32 },

    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Gate worker is not running")]
    WorkerUnavailable,
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
