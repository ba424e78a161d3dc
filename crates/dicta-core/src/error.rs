//! Error taxonomy for the dictation pipeline.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by capture, provider calls, and publishing.
#[derive(Debug, Error)]
pub enum DictationError {
    /// The default input device could not be opened or started.
    #[error("audio input device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Recording failed mid-capture, or the artifact could not be written.
    #[error("audio capture failed: {0:#}")]
    CaptureIo(anyhow::Error),

    /// The profile is missing something its selected backend requires.
    #[error("invalid profile '{profile}': {reason}")]
    InvalidProfile { profile: String, reason: String },

    /// Transport or backend failure during transcription.
    #[error("transcription failed: {0:#}")]
    Transcription(anyhow::Error),

    /// Transport or backend failure during transcript cleanup.
    #[error("text cleanup failed: {0:#}")]
    Cleanup(anyhow::Error),

    /// The publish sink rejected the cleaned text.
    #[error("publish failed: {0:#}")]
    Publish(anyhow::Error),

    /// A network call exceeded the configured request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}
