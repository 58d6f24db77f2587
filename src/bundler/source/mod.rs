//! Source archive acquisition.
//!
//! Downloads a release archive of the application and unpacks it with the
//! system `tar`, dropping the archive's single top-level directory
//! (`aws-cli-<version>/...` becomes `src/...`).

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::AppSettings,
    utils::{http, process},
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Downloads the source archive for `version` into `workspace`.
///
/// Returns the path of the written archive.
pub async fn fetch(app: &AppSettings, version: &str, workspace: &Path) -> Result<PathBuf> {
    let url = app.source_url(version);
    let archive = workspace.join(app.archive_name(version));

    http::download(&url, &app.user_agent, &archive).await?;
    Ok(archive)
}

/// Extracts a `.tar.gz` archive into `dest_dir`, stripping one leading
/// path component.
pub async fn extract(archive: &Path, dest_dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dest_dir)
        .await
        .fs_context("creating source directory", dest_dir)?;

    log::info!("Extracting {}", archive.display());

    process::run(
        Command::new("tar")
            .arg("-xzf")
            .arg(archive)
            .arg("--strip-components=1")
            .arg("-C")
            .arg(dest_dir),
    )
    .await
    .map_err(|e| Error::Extraction {
        archive: archive.to_path_buf(),
        reason: e.to_string(),
    })
}
