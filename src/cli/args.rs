//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation
//! that maps onto [`CliError`].

use crate::bundler::{PublishStrategy, SettingsBuilder, settings::DEFAULT_PYTHON_VERSION};
use crate::error::CliError;
use clap::Parser;
use std::path::PathBuf;

/// Build the AWS CLI from source into a relocatable bundle
#[derive(Parser, Debug)]
#[command(
    name = "awscli_bundle",
    version,
    about = "Build the AWS CLI from source.",
    long_about = "Build the AWS CLI from source.

Downloads the requested release, installs it into a private Python runtime
and writes a relocatable bundle with bin/aws and share/awscli.

Examples:
  awscli_bundle 2.15.24
  awscli_bundle 2.15.24 --out ./out"
)]
pub struct Args {
    /// AWS CLI release to build (e.g. 2.15.24)
    #[arg(id = "release_version", value_name = "VERSION")]
    pub version: String,

    /// Bundle output directory
    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "prefix",
        value_name = "DIR",
        default_value = "out"
    )]
    pub out: PathBuf,

    /// Python version to bundle
    #[arg(long = "python", value_name = "VERSION", default_value = DEFAULT_PYTHON_VERSION)]
    pub python: String,

    /// Path to uv, probed before the default locations
    #[arg(long, value_name = "PATH", env = "AWSCLI_BUNDLE_UV")]
    pub uv: Option<PathBuf>,

    /// Do not search PATH for uv
    #[arg(long)]
    pub no_path_search: bool,

    /// Clear the output directory up front and build directly into it
    #[arg(long)]
    pub in_place: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if self.version.trim().is_empty() {
            return Err(CliError::MissingArgument {
                argument: "<VERSION>".to_string(),
            });
        }

        if self.version.starts_with('-') {
            return Err(CliError::InvalidArguments {
                reason: format!("unknown option: {}", self.version),
            });
        }

        if self.out.as_os_str().is_empty() {
            return Err(CliError::InvalidArguments {
                reason: "missing value for --out".to_string(),
            });
        }

        if self.python.trim().is_empty() {
            return Err(CliError::InvalidArguments {
                reason: "missing value for --python".to_string(),
            });
        }

        Ok(())
    }

    /// Settings builder pre-filled from the arguments.
    pub fn settings_builder(&self) -> SettingsBuilder {
        let mut builder = SettingsBuilder::new()
            .version(self.version.clone())
            .output_directory(&self.out)
            .python_version(self.python.clone())
            .path_search(!self.no_path_search)
            .publish(if self.in_place {
                PublishStrategy::InPlace
            } else {
                PublishStrategy::Staged
            });

        if let Some(uv) = &self.uv {
            builder = builder.uv_path(uv);
        }

        builder
    }
}
