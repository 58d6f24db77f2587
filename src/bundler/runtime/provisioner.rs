//! Interpreter provisioning through `uv`.

use crate::bundler::{
    error::{Error, Result},
    utils::process,
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Returns the path of a managed interpreter of exactly `version`,
/// installing it first if `uv` cannot find one.
///
/// Repeated builds hit the `uv` cache and skip the install.
pub async fn ensure_interpreter(uv: &Path, version: &str) -> Result<PathBuf> {
    let unavailable = |reason: String| Error::InterpreterUnavailable {
        version: version.to_string(),
        reason,
    };

    match find_interpreter(uv, version).await {
        Ok(path) => return Ok(path),
        Err(e) => log::info!("python {} not found ({}), installing", version, e),
    }

    process::run(
        Command::new(uv)
            .args(["python", "install", "--managed-python"])
            .arg(version),
    )
    .await
    .map_err(|e| unavailable(e.to_string()))?;

    find_interpreter(uv, version)
        .await
        .map_err(|e| unavailable(e.to_string()))
}

async fn find_interpreter(uv: &Path, version: &str) -> Result<PathBuf> {
    let found = process::output(
        Command::new(uv)
            .args(["python", "find", "--managed-python"])
            .arg(version),
    )
    .await?;

    if found.is_empty() {
        return Err(Error::GenericError("uv python find printed nothing".into()));
    }

    Ok(PathBuf::from(found))
}
