//! Removal of build-only artifacts from a materialised environment.
//!
//! Every pass works from names and patterns alone, so each one can be run
//! again on an already-pruned tree and removes nothing further.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    utils::fs,
};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// `*.dist-info` prefixes of packaging tools.
const BUILD_TOOL_DIST_INFO_PREFIXES: &[&str] = &["pip-", "setuptools-", "wheel-"];

/// Importable packages that only the installer needs.
const BUILD_TOOL_PACKAGES: &[&str] = &["setuptools", "_distutils_hack", "pip", "pkg_resources"];

/// Names in `bin/` that serve the venv, not the program.
const BIN_EXTRA_PATTERNS: &[&str] = &[r"(?i)^activate(\.|$)", r"^pip(\d|$)", r"^easy_install(\d|$)"];

static BIN_EXTRAS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BIN_EXTRA_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// Entries removed by each pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneReport {
    /// Headers, `tests/` and `__pycache__/` under `lib/python*`.
    pub sweep: usize,
    /// Build-tool metadata and packages in `site-packages`.
    pub packaging: usize,
    /// Empty include directories.
    pub include: usize,
    /// Activation scripts and installer executables in `bin/`.
    pub bin_extras: usize,
}

impl PruneReport {
    /// Total entries removed.
    pub fn total(&self) -> usize {
        self.sweep + self.packaging + self.include + self.bin_extras
    }
}

/// Runs every pass over the environment at `prefix`, in order.
pub async fn prune_environment(prefix: &Path) -> Result<PruneReport> {
    let report = PruneReport {
        sweep: sweep_site_tree(prefix).await?,
        packaging: prune_packaging_metadata(prefix).await?,
        include: prune_empty_include(prefix).await?,
        bin_extras: prune_bin_extras(prefix).await?,
    };

    log::info!(
        "Pruned {} entries (sweep {}, packaging {}, include {}, bin {})",
        report.total(),
        report.sweep,
        report.packaging,
        report.include,
        report.bin_extras
    );
    Ok(report)
}

/// Returns the first `lib/python*` directory of the environment.
async fn python_lib_dir(prefix: &Path) -> Result<Option<PathBuf>> {
    let lib_dir = prefix.join("lib");
    let mut entries = match tokio::fs::read_dir(&lib_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).fs_context("reading directory", &lib_dir),
    };

    let mut candidates = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading directory", &lib_dir)?
    {
        let is_dir = entry
            .file_type()
            .await
            .fs_context("inspecting", entry.path())?
            .is_dir();
        if is_dir && entry.file_name().to_string_lossy().starts_with("python") {
            candidates.push(entry.path());
        }
    }

    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// Removes `*.h` files and every `tests` / `__pycache__` directory below
/// `lib/python*`. Matched directories are not descended into.
pub async fn sweep_site_tree(prefix: &Path) -> Result<usize> {
    let Some(python_dir) = python_lib_dir(prefix).await? else {
        return Ok(0);
    };

    let targets = tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
        let mut targets = Vec::new();
        let mut walker = walkdir::WalkDir::new(&python_dir)
            .follow_links(false)
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| Error::GenericError(format!("walking tree: {e}")))?;
            let name = entry.file_name().to_string_lossy();

            if entry.file_type().is_dir() {
                if entry.depth() > 0 && (name == "tests" || name == "__pycache__") {
                    targets.push(entry.path().to_path_buf());
                    walker.skip_current_dir();
                }
            } else if entry.file_type().is_file() && name.ends_with(".h") {
                targets.push(entry.path().to_path_buf());
            }
        }

        Ok(targets)
    })
    .await
    .map_err(|e| Error::GenericError(format!("tree walk task panicked: {e}")))??;

    for target in &targets {
        fs::remove_if_exists(target).await?;
    }

    Ok(targets.len())
}

/// Removes packaging-tool `*.dist-info` directories and the tools' own
/// packages from `site-packages`.
pub async fn prune_packaging_metadata(prefix: &Path) -> Result<usize> {
    let Some(python_dir) = python_lib_dir(prefix).await? else {
        return Ok(0);
    };
    let site_packages = python_dir.join("site-packages");

    let mut removed = 0;
    let mut entries = match tokio::fs::read_dir(&site_packages).await {
        Ok(entries) => Some(entries),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e).fs_context("reading directory", &site_packages),
    };

    if let Some(entries) = entries.as_mut() {
        let mut doomed = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .fs_context("reading directory", &site_packages)?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry
                .file_type()
                .await
                .fs_context("inspecting", entry.path())?
                .is_dir();
            if is_dir && is_build_tool_dist_info(&name) {
                doomed.push(entry.path());
            }
        }
        for path in doomed {
            fs::remove_if_exists(&path).await?;
            removed += 1;
        }
    }

    for package in BUILD_TOOL_PACKAGES {
        let path = site_packages.join(package);
        if tokio::fs::symlink_metadata(&path).await.is_ok() {
            fs::remove_if_exists(&path).await?;
            removed += 1;
        }
    }

    Ok(removed)
}

fn is_build_tool_dist_info(name: &str) -> bool {
    name.ends_with(".dist-info")
        && BUILD_TOOL_DIST_INFO_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

/// Removes empty `include/python3*` directories, then `include/` itself if
/// nothing is left in it. Non-empty directories are never touched.
pub async fn prune_empty_include(prefix: &Path) -> Result<usize> {
    let include_dir = prefix.join("include");
    let mut entries = match tokio::fs::read_dir(&include_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e).fs_context("reading directory", &include_dir),
    };

    let mut removed = 0;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading directory", &include_dir)?
    {
        let is_dir = entry
            .file_type()
            .await
            .fs_context("inspecting", entry.path())?
            .is_dir();
        if !is_dir || !entry.file_name().to_string_lossy().starts_with("python3") {
            continue;
        }
        if fs::is_dir_empty(&entry.path()).await? {
            fs::remove_if_exists(&entry.path()).await?;
            removed += 1;
        }
    }

    if fs::is_dir_empty(&include_dir).await? {
        fs::remove_if_exists(&include_dir).await?;
        removed += 1;
    }

    Ok(removed)
}

/// Returns whether a `bin/` entry is a venv or installer leftover.
pub fn is_bin_extra(name: &str) -> bool {
    BIN_EXTRAS.iter().any(|pattern| pattern.is_match(name))
}

/// Removes activation scripts and pip / easy_install executables from `bin/`.
pub async fn prune_bin_extras(prefix: &Path) -> Result<usize> {
    let bin_dir = prefix.join("bin");
    let mut entries = match tokio::fs::read_dir(&bin_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e).fs_context("reading directory", &bin_dir),
    };

    let mut doomed = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading directory", &bin_dir)?
    {
        let file_type = entry
            .file_type()
            .await
            .fs_context("inspecting", entry.path())?;
        if !file_type.is_file() && !file_type.is_symlink() {
            continue;
        }
        if is_bin_extra(&entry.file_name().to_string_lossy()) {
            doomed.push(entry.path());
        }
    }

    for path in &doomed {
        fs::remove_if_exists(path).await?;
    }

    Ok(doomed.len())
}
