//! Error types for the lifecycle harness.
//!
//! All failure modes are explicit; nothing in the harness panics on the
//! caller's behalf.

use std::path::PathBuf;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Error type covering every failure mode of the harness.
///
/// Work-function errors and hook errors travel through the harness verbatim
/// as `ServiceError` values; the harness itself only ever adds the variants
/// below. [`ServiceError::ForceStop`] is the distinguished sentinel returned
/// when the operator escalates past a graceful shutdown with a second
/// termination signal.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// I/O error (pidfile access, signal listener installation).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The pidfile exists but does not contain a valid process id.
    #[error("invalid pid in {path}: {content:?}")]
    InvalidPid {
        /// Path of the offending pidfile.
        path: PathBuf,
        /// Trimmed file content that failed to parse.
        content: String,
    },

    /// The background instance could not be launched.
    #[error("spawn failed: {0}")]
    Spawn(String),

    /// A signal could not be delivered.
    #[error("signal error: {0}")]
    Signal(String),

    /// Runtime error reported by the work function.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Error reported by the shutdown hook.
    #[error("shutdown error: {0}")]
    Shutdown(String),

    /// A second termination signal arrived before the shutdown hook
    /// finished; graceful shutdown was abandoned.
    #[error("force stop")]
    ForceStop,
}

impl ServiceError {
    /// Creates a spawn error.
    #[must_use]
    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::Spawn(msg.into())
    }

    /// Creates a signal delivery error.
    #[must_use]
    pub fn signal(msg: impl Into<String>) -> Self {
        Self::Signal(msg.into())
    }

    /// Creates a runtime error.
    #[must_use]
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Creates a shutdown error.
    #[must_use]
    pub fn shutdown(msg: impl Into<String>) -> Self {
        Self::Shutdown(msg.into())
    }

    /// Returns true if this is the forced-stop escalation sentinel.
    #[must_use]
    pub const fn is_force_stop(&self) -> bool {
        matches!(self, Self::ForceStop)
    }
}
