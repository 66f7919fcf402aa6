//! Error types for the transcription library.
//!
//! Most failures in this crate are recoverable: a phonemizer that
//! cannot be started or exits with an error degrades to an empty transcription,
//! and an unreadable checkpoint degrades to "no progress". The variants below
//! still exist so the fallible layers can report what went wrong before the
//! caller decides to swallow it.

use std::path::PathBuf;

/// Result type alias for transcription operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while transcribing documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Checkpoint (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The external phonemizer binary could not be started
    #[error("External tool unavailable: {program}: {source}")]
    ExternalToolUnavailable {
        /// Program that was invoked
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The external phonemizer exited with a nonzero status
    #[error("External tool failed: {program} exited with {code:?}: {stderr}")]
    ExternalToolFailed {
        /// Program that was invoked
        program: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// A checkpoint file exists but could not be read or parsed
    #[error("Checkpoint unreadable at {}: {reason}", path.display())]
    CheckpointUnreadable {
        /// Checkpoint path
        path: PathBuf,
        /// Reason for the failure
        reason: String,
    },

    /// Invalid caller input (bad paths, missing output for directory mode, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
