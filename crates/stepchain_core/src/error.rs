//! Error types for stepchain_core operations.

use thiserror::Error;

/// Core error type for stepchain_core operations.
///
/// Running steps never produces one of these: a failing step is a
/// `success == false` outcome and a panicking step body unwinds to the caller.
#[derive(Error, Debug)]
pub enum StepchainError {
    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A reporter name that does not match any known reporter.
    #[error("unknown reporter '{0}' (expected console, tracing or quiet)")]
    UnknownReporter(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StepchainError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ConfigError(_) => Some(
                "Check stepchain.toml, or run 'stepchain init --force' to rewrite the defaults.",
            ),
            Self::UnknownReporter(_) => Some("Use one of: console, tracing, quiet."),
            Self::Io(_) => None,
        }
    }
}

/// Convenience Result type for stepchain_core operations.
pub type Result<T> = std::result::Result<T, StepchainError>;
