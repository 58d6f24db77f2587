//! Configuration structures for bundle builds.
//!
//! This module provides the application description, interpreter
//! provisioning options, and a builder for constructing settings.

mod builder;
mod core;
mod package;
mod toolchain;

// Re-export all public types
pub use builder::{DEFAULT_OUTPUT_DIRECTORY, SettingsBuilder};
pub use self::core::{PublishStrategy, Settings, share_dir_in};
pub use package::AppSettings;
pub use toolchain::{DEFAULT_PYTHON_VERSION, ToolLocation, ToolchainSettings, WELL_KNOWN_UV_PATH};
