//! Error types for bundle build operations.
//!
//! Each pipeline stage fails with its own variant so callers can tell an
//! unusable toolchain apart from a network problem or a broken install.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for bundle build operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building a bundle.
#[derive(Error, Debug)]
pub enum Error {
    /// No candidate location produced a working provisioning tool.
    #[error("{tool} not found (tried: {})", tried.join(", "))]
    ToolNotFound {
        /// Tool name
        tool: String,
        /// Candidates probed, in order
        tried: Vec<String>,
    },

    /// The provisioning tool could neither find nor install the interpreter.
    #[error("python {version} unavailable: {reason}")]
    InterpreterUnavailable {
        /// Requested interpreter version
        version: String,
        /// Reason for the error
        reason: String,
    },

    /// The source archive could not be downloaded.
    #[error("download failed: {url}: {reason}")]
    Acquisition {
        /// Archive URL
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// The source archive could not be extracted.
    #[error("extraction failed: {}: {reason}", archive.display())]
    Extraction {
        /// Archive path
        archive: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// The package installer reported a failure.
    #[error("install failed: {reason}")]
    Install {
        /// Reason for the error
        reason: String,
    },

    /// The provisioned runtime has no shared library to link.
    #[error("missing libpython in {}", dir.display())]
    MissingRuntimeLibrary {
        /// Library directory that was scanned
        dir: PathBuf,
    },

    /// An external command exited unsuccessfully.
    #[error("command failed ({}): {command}", code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
    },

    /// An external command could not be started.
    #[error("failed to execute {command}: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Filesystem error with the operation and path it happened on.
    #[error("{context} {}: {source}", path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Whether re-running the same build may succeed without changing the
    /// environment.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Acquisition { .. } | Self::Extraction { .. })
    }
}

/// Attaches a context message and path to filesystem errors.
pub trait ErrorExt<T> {
    /// Converts the error into [`Error::Fs`].
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Turns missing values and foreign errors into [`Error::GenericError`].
pub trait Context<T> {
    /// Adds a message describing what was expected.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

/// Returns early with an [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_renders_exit_code() {
        let err = Error::CommandFailed {
            command: "tar -xzf a.tar.gz".into(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "command failed (2): tar -xzf a.tar.gz");
    }

    #[test]
    fn tool_not_found_lists_candidates() {
        let err = Error::ToolNotFound {
            tool: "uv".into(),
            tried: vec!["/usr/local/bin/uv".into(), "uv in PATH".into()],
        };
        assert_eq!(
            err.to_string(),
            "uv not found (tried: /usr/local/bin/uv, uv in PATH)"
        );
    }

    #[test]
    fn only_download_problems_are_retryable() {
        let acquisition = Error::Acquisition {
            url: "https://example.invalid".into(),
            reason: "404".into(),
        };
        let install = Error::Install {
            reason: "exit 1".into(),
        };
        assert!(acquisition.is_retryable());
        assert!(!install.is_retryable());
    }

    #[test]
    fn fs_context_keeps_path() {
        let res: std::io::Result<()> = Err(io::Error::from(io::ErrorKind::NotFound));
        let err = res.fs_context("reading launcher", "/x/bin/aws").unwrap_err();
        match err {
            Error::Fs { path, .. } => assert_eq!(path, PathBuf::from("/x/bin/aws")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
