//! Top-level error types.
//!
//! Argument problems are reported separately from pipeline failures so the
//! CLI can tell a usage mistake (nothing happened) from a failed build.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("{0}")]
    Cli(#[from] CliError),

    /// Pipeline errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl BundlerError {
    /// Whether this error is a usage mistake with no side effects.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::Cli(_))
    }

    /// Whether re-running the same command may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Bundler(e) => e.is_retryable(),
            _ => false,
        }
    }
}
