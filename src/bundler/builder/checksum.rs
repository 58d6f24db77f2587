//! Bundle checksum calculation.
//!
//! This module summarises a finished bundle tree: file count, total size and
//! a SHA-256 over every regular file's relative path and content.

use crate::bundler::{
    Result,
    error::{Error, ErrorExt},
};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Summary of a bundle tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    /// Number of regular files.
    pub files: usize,
    /// Total size of regular files in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the tree.
    pub checksum: String,
}

/// Calculates the summary of a directory tree.
///
/// # Algorithm
///
/// 1. Recursively collect all regular files using walkdir (symlinks skipped)
/// 2. Sort paths lexicographically for deterministic order
/// 3. For each file: hash(relative_path + file_content)
/// 4. Return final combined hash
pub async fn summarize(dir_path: &Path) -> Result<TreeSummary> {
    // Collect all files recursively
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(dir_path).follow_links(false) {
        let entry =
            entry.map_err(|e| Error::GenericError(format!("walking bundle tree: {e}")))?;
        if entry.file_type().is_file() {
            entries.push(entry);
        }
    }

    // Sort by path for deterministic ordering
    entries.sort_by_key(|e| e.path().to_path_buf());

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];
    let mut size = 0u64;

    for entry in &entries {
        // Include relative path in hash (preserves directory structure)
        if let Ok(rel_path) = entry.path().strip_prefix(dir_path) {
            hasher.update(rel_path.to_string_lossy().as_bytes());
        }

        let mut file = tokio::fs::File::open(entry.path())
            .await
            .fs_context("opening file for hashing", entry.path())?;

        loop {
            let n = file
                .read(&mut buffer)
                .await
                .fs_context("reading file for hash calculation", entry.path())?;
            if n == 0 {
                break;
            }
            size += n as u64;
            hasher.update(&buffer[..n]);
        }
    }

    Ok(TreeSummary {
        files: entries.len(),
        size,
        checksum: format!("{:x}", hasher.finalize()),
    })
}
