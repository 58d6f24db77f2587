//! Package installation and launcher rewriting.

mod launcher;

pub use launcher::{launcher_shim, retarget_scripts, rewrite_launcher, write_launcher};

use crate::bundler::{
    error::{Error, Result},
    utils::process,
};
use std::path::Path;
use tokio::process::Command;

/// Installs the package in `source_dir` into the environment with its own
/// `pip`, without using the download cache.
pub async fn install(environment_root: &Path, source_dir: &Path) -> Result<()> {
    log::info!("Installing into venv");

    process::run(
        Command::new(environment_root.join("bin").join("pip"))
            .args(["install", "--no-cache-dir", "."])
            .current_dir(source_dir),
    )
    .await
    .map_err(|e| Error::Install {
        reason: e.to_string(),
    })
}
