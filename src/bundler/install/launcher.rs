//! Portable launcher generation.
//!
//! pip writes console scripts with an absolute shebang pointing into the
//! build-time venv. The rewritten launcher starts with a shim that is both a
//! shell script and a Python string literal: `sh` runs the `exec` line, which
//! re-runs the same file through the bundled interpreter; Python sees a
//! harmless docstring and continues with the original body.

use crate::bundler::{
    error::{ErrorExt, Result},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Shim placed in front of every rewritten launcher.
pub fn launcher_shim(app_id: &str) -> String {
    format!(
        r#"#!/bin/sh
""":"
d="$(cd "$(dirname "$0")/.." && pwd)"
exec "$d/share/{app_id}/bin/python" "$0" "$@"
":"""

"#
    )
}

/// Replaces the first line of `original` with the shim.
///
/// The result is always `shim + original_without_first_line`; a launcher with
/// no newline contributes an empty body.
pub fn rewrite_launcher(original: &str, app_id: &str) -> String {
    let body = original.split_once('\n').map_or("", |(_, rest)| rest);
    let mut rewritten = launcher_shim(app_id);
    rewritten.push_str(body);
    rewritten
}

/// Rewrites `environment_root/bin/<program>` into `output_bin_dir/<program>`
/// and marks it executable.
///
/// Returns the path of the written launcher.
pub async fn write_launcher(
    environment_root: &Path,
    output_bin_dir: &Path,
    program: &str,
    app_id: &str,
) -> Result<PathBuf> {
    let source = environment_root.join("bin").join(program);
    let original = tokio::fs::read_to_string(&source)
        .await
        .fs_context("reading launcher", &source)?;

    fs::create_dir_all(output_bin_dir, false).await?;
    let launcher = output_bin_dir.join(program);
    tokio::fs::write(&launcher, rewrite_launcher(&original, app_id))
        .await
        .fs_context("writing launcher", &launcher)?;
    fs::set_executable(&launcher).await?;

    log::info!("Wrote launcher {}", launcher.display());
    Ok(launcher)
}

/// Rewrites absolute references to `from` as `to` in the environment's
/// scripts and `pyvenv.cfg`.
///
/// Only regular files in `bin/` that start with `#!` are considered. A changed
/// file is replaced by a new inode with the old permissions, so content
/// shared through a hard link is never modified. Returns the number of files
/// rewritten.
pub async fn retarget_scripts(environment_root: &Path, from: &Path, to: &Path) -> Result<usize> {
    if from == to {
        return Ok(0);
    }
    let from = from.to_string_lossy();
    let to = to.to_string_lossy();

    let bin_dir = environment_root.join("bin");
    let mut candidates = vec![environment_root.join("pyvenv.cfg")];
    let mut entries = match tokio::fs::read_dir(&bin_dir).await {
        Ok(entries) => Some(entries),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e).fs_context("reading directory", &bin_dir),
    };
    if let Some(entries) = entries.as_mut() {
        while let Some(entry) = entries
            .next_entry()
            .await
            .fs_context("reading directory", &bin_dir)?
        {
            let is_file = entry
                .file_type()
                .await
                .fs_context("inspecting", entry.path())?
                .is_file();
            if is_file {
                candidates.push(entry.path());
            }
        }
    }
    candidates.sort();

    let mut rewritten = 0;
    for path in candidates {
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e).fs_context("reading", &path),
        };
        let is_config = path.file_name().is_some_and(|name| name == "pyvenv.cfg");
        if !is_config && !bytes.starts_with(b"#!") {
            continue;
        }
        let Ok(text) = String::from_utf8(bytes) else {
            continue;
        };
        if !text.contains(&*from) {
            continue;
        }

        let permissions = tokio::fs::metadata(&path)
            .await
            .fs_context("inspecting", &path)?
            .permissions();
        fs::remove_if_exists(&path).await?;
        tokio::fs::write(&path, text.replace(&*from, &to))
            .await
            .fs_context("writing", &path)?;
        tokio::fs::set_permissions(&path, permissions)
            .await
            .fs_context("setting permissions on", &path)?;
        log::debug!("Retargeted {}", path.display());
        rewritten += 1;
    }

    Ok(rewritten)
}
