//! Scratch workspace owned by one build.

use crate::bundler::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};

/// Prefix of workspace directory names.
pub const WORKSPACE_PREFIX: &str = "aws-cli-build-";

/// Uniquely named temporary directory holding the downloaded archive and the
/// extracted `src/` tree.
///
/// The directory and everything in it is deleted when the value is dropped,
/// on success and failure alike.
#[derive(Debug)]
pub struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    /// Creates a fresh workspace under `parent`, or under the system temp
    /// directory when `None`.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let base = parent.map_or_else(std::env::temp_dir, Path::to_path_buf);
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&base)
            .fs_context("creating workspace in", &base)?;

        log::debug!("Workspace: {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the source archive is extracted into.
    pub fn source_dir(&self) -> PathBuf {
        self.dir.path().join("src")
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        log::debug!("Removing workspace {}", self.dir.path().display());
    }
}
