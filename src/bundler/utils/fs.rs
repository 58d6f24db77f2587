//! File system utilities for bundling.
//!
//! Provides idempotent removal, emptiness checks, and hard-link-or-copy
//! materialisation with comprehensive error handling.

use crate::bundler::error::{ErrorExt, Result};
use std::{
    io::{self},
    path::Path,
};
use tokio::fs;

/// Removes a file, symlink, or directory tree if it exists.
///
/// Missing paths are not an error. Symlinks are removed, never followed.
pub async fn remove_if_exists(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).fs_context("inspecting", path),
    };

    let res = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };

    match res {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing", path),
    }
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_if_exists(path).await?;
    }

    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Returns whether `path` is a directory with no entries.
///
/// A missing path is reported as `Ok(false)`.
pub async fn is_dir_empty(path: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(path).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).fs_context("reading directory", path),
    };

    Ok(entries
        .next_entry()
        .await
        .fs_context("reading directory", path)?
        .is_none())
}

/// Marks a file as executable (`0o755`).
#[cfg(unix)]
pub async fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .fs_context("setting permissions on", path)
}

/// Marks a file as executable (no-op off unix).
#[cfg(not(unix))]
pub async fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Returns whether `a` and `b` live on the same filesystem.
///
/// Both paths must exist.
#[cfg(unix)]
pub async fn same_filesystem(a: &Path, b: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;
    let a_dev = fs::metadata(a).await.fs_context("inspecting", a)?.dev();
    let b_dev = fs::metadata(b).await.fs_context("inspecting", b)?.dev();
    Ok(a_dev == b_dev)
}

#[cfg(not(unix))]
pub async fn same_filesystem(_a: &Path, _b: &Path) -> Result<bool> {
    Ok(false)
}

/// How a file ended up at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// The destination shares the source's inode.
    HardLinked,
    /// The destination is an independent copy.
    Copied,
}

/// Places `src` at `dest`, replacing whatever was there.
///
/// A hard link is used when both sides are on the same filesystem; the new
/// entry then shares the source inode and has no lifetime of its own.
/// Otherwise, or if linking fails, the file is copied and a warning logged.
pub async fn hard_link_or_copy(src: &Path, dest: &Path) -> Result<Materialized> {
    let parent = dest
        .parent()
        .ok_or_else(|| crate::bundler::Error::GenericError(format!("{dest:?} has no parent")))?;
    fs::create_dir_all(parent)
        .await
        .fs_context("creating directory", parent)?;
    remove_if_exists(dest).await?;

    if same_filesystem(src, parent).await? {
        match fs::hard_link(src, dest).await {
            Ok(()) => return Ok(Materialized::HardLinked),
            Err(e) => log::warn!(
                "hard link {} -> {} failed ({}), copying instead",
                src.display(),
                dest.display(),
                e
            ),
        }
    } else {
        log::warn!(
            "{} and {} are on different filesystems, copying instead of hard linking",
            src.display(),
            parent.display()
        );
    }

    fs::copy(src, dest).await.fs_context("copying to", dest)?;
    Ok(Materialized::Copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn remove_if_exists_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a/b");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("f"), "x").unwrap();

        remove_if_exists(&temp.path().join("a")).await.unwrap();
        assert!(!temp.path().join("a").exists());
        remove_if_exists(&temp.path().join("a")).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn remove_if_exists_does_not_follow_symlinks() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        remove_if_exists(&link).await.unwrap();
        assert!(!link.exists());
        assert!(target.join("keep").exists());
    }

    #[tokio::test]
    async fn is_dir_empty_reports_entries() {
        let temp = TempDir::new().unwrap();
        assert!(is_dir_empty(temp.path()).await.unwrap());
        std::fs::write(temp.path().join("f"), "x").unwrap();
        assert!(!is_dir_empty(temp.path()).await.unwrap());
        assert!(!is_dir_empty(&temp.path().join("missing")).await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hard_link_shares_inode_on_same_filesystem() {
        use std::os::unix::fs::MetadataExt;
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src.bin");
        std::fs::write(&src, "payload").unwrap();
        let dest = temp.path().join("out/bin/dest.bin");
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::fs::write(&dest, "stale").unwrap();

        let how = hard_link_or_copy(&src, &dest).await.unwrap();
        assert_eq!(how, Materialized::HardLinked);
        assert_eq!(
            std::fs::metadata(&src).unwrap().ino(),
            std::fs::metadata(&dest).unwrap().ino()
        );
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "payload");
    }
}
