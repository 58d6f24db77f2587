//! Relocatable bundle builder.
//!
//! Turns a release version into a pruned directory tree with its own Python
//! runtime and a launcher that finds that runtime relative to itself:
//!
//! ```text
//! out/
//! ├── bin/aws
//! └── share/awscli/{bin,lib}
//! ```

pub mod builder;
pub mod error;
pub mod install;
pub mod prune;
pub mod runtime;
pub mod settings;
pub mod source;
pub mod utils;

pub use builder::{BuildProgress, BuildState, BundledArtifact, Bundler, Stage};
pub use error::{Error, Result};
pub use settings::{
    AppSettings, PublishStrategy, Settings, SettingsBuilder, ToolLocation, ToolchainSettings,
};
