//! Relocatable AWS CLI bundle builder.
//!
//! This library fetches an AWS CLI source release, installs it into a private
//! Python runtime provisioned with `uv`, prunes build-only files, and rewrites
//! the `aws` entrypoint so the resulting directory can be moved anywhere.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
