//! Isolated environment creation and interpreter relinking.
//!
//! A fresh venv points back at the provisioned interpreter through symlinks
//! and `pyvenv.cfg`. [`relink`] replaces the interpreter aliases with hard
//! links to the real binary and pulls the shared `libpython` next to them, so
//! the environment carries its own runtime.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    utils::{
        fs::{self, Materialized},
        process,
    },
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Populates `target_dir` with a standard venv skeleton using the
/// provisioned interpreter.
pub async fn create_environment(interpreter: &Path, target_dir: &Path) -> Result<()> {
    log::info!("Creating venv: {}", target_dir.display());

    if let Some(parent) = target_dir.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }

    process::run(
        Command::new(interpreter)
            .args(["-m", "venv"])
            .arg(target_dir),
    )
    .await
}

/// Interpreter alias names placed in `bin/` for `version`.
pub fn interpreter_aliases(version: &str) -> [String; 3] {
    [
        "python".to_string(),
        "python3".to_string(),
        format!("python{version}"),
    ]
}

/// Returns whether `name` is a shared `libpython` for this platform.
pub fn is_runtime_library(name: &str) -> bool {
    if !name.starts_with("libpython") {
        return false;
    }

    if cfg!(target_os = "macos") {
        name.ends_with(".dylib")
    } else {
        name.ends_with(".so") || name.contains(".so.")
    }
}

/// Makes the environment at `target_dir` self-sufficient.
///
/// Every alias in `bin/` becomes a hard link to the resolved interpreter and
/// every shared `libpython` from the provisioned prefix's `lib/` is linked
/// into `target_dir/lib/`. Falls back to copies across filesystems.
///
/// # Errors
///
/// [`Error::MissingRuntimeLibrary`] if the provisioned prefix has no shared
/// runtime library.
pub async fn relink(target_dir: &Path, interpreter: &Path, version: &str) -> Result<()> {
    let real_interpreter = tokio::fs::canonicalize(interpreter)
        .await
        .fs_context("resolving interpreter", interpreter)?;

    let bin_dir = target_dir.join("bin");
    for alias in interpreter_aliases(version) {
        let link = bin_dir.join(&alias);
        let how = fs::hard_link_or_copy(&real_interpreter, &link).await?;
        fs::set_executable(&link).await?;
        log::debug!("{:?} {} -> {}", how, real_interpreter.display(), link.display());
    }

    let prefix = real_interpreter
        .parent()
        .and_then(Path::parent)
        .ok_or_else(|| {
            Error::GenericError(format!(
                "cannot determine install prefix of {}",
                real_interpreter.display()
            ))
        })?;
    let source_lib_dir = prefix.join("lib");

    let libraries = runtime_libraries(&source_lib_dir).await?;
    if libraries.is_empty() {
        return Err(Error::MissingRuntimeLibrary {
            dir: source_lib_dir,
        });
    }

    let lib_dir = target_dir.join("lib");
    for library in &libraries {
        let name = library
            .file_name()
            .ok_or_else(|| Error::GenericError(format!("{library:?} has no file name")))?;
        let how = fs::hard_link_or_copy(library, &lib_dir.join(name)).await?;
        if how == Materialized::Copied {
            log::warn!("{} copied into the bundle", library.display());
        }
    }

    Ok(())
}

/// Lists regular files in `lib_dir` that are shared runtime libraries.
///
/// A missing directory yields an empty list.
async fn runtime_libraries(lib_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(lib_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).fs_context("reading runtime library directory", lib_dir),
    };

    let mut libraries = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading runtime library directory", lib_dir)?
    {
        let file_type = entry
            .file_type()
            .await
            .fs_context("inspecting", entry.path())?;
        let name = entry.file_name();
        if file_type.is_file() && is_runtime_library(&name.to_string_lossy()) {
            libraries.push(entry.path());
        }
    }

    libraries.sort();
    Ok(libraries)
}
