//! Command line interface for the bundle builder.

mod args;

pub use args::Args;

use crate::bundler::Bundler;
use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Validates `args`, builds the bundle, and returns the exit code.
pub async fn execute(args: &Args) -> Result<i32> {
    args.validate()?;

    let settings = args
        .settings_builder()
        .build()
        .map_err(|e| CliError::InvalidArguments {
            reason: e.to_string(),
        })?;

    let artifact = Bundler::new(settings).build().await?;
    for launcher in &artifact.launchers {
        println!("{}", launcher.display());
    }

    Ok(0)
}
