//! Getting the finished bundle to the output directory.
//!
//! With [`PublishStrategy::Staged`] the bundle is assembled in a hidden
//! sibling of the output directory and renamed into place only after every
//! stage succeeded. Staging next to the target keeps the final rename on one
//! filesystem.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::PublishStrategy,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Directory the bundle is being assembled in.
#[derive(Debug)]
pub enum OutputRoot {
    /// Hidden sibling, renamed onto the target on publish.
    Staged(StagedOutput),
    /// The target itself, already cleared.
    InPlace(PathBuf),
}

impl OutputRoot {
    /// Prepares the assembly directory for `target`.
    ///
    /// For [`PublishStrategy::InPlace`] this clears `target`.
    pub async fn prepare(target: &Path, strategy: PublishStrategy) -> Result<Self> {
        match strategy {
            PublishStrategy::Staged => Ok(Self::Staged(StagedOutput::create(target).await?)),
            PublishStrategy::InPlace => {
                log::info!("Clearing {}", target.display());
                fs::create_dir_all(target, true).await?;
                Ok(Self::InPlace(target.to_path_buf()))
            }
        }
    }

    /// Directory stages should write the bundle into.
    pub fn root(&self) -> &Path {
        match self {
            Self::Staged(staged) => staged.root(),
            Self::InPlace(target) => target,
        }
    }

    /// Path the bundle will have once published.
    pub fn target(&self) -> &Path {
        match self {
            Self::Staged(staged) => &staged.target,
            Self::InPlace(target) => target,
        }
    }

    /// Makes the bundle visible at the target and returns its path.
    pub async fn publish(self) -> Result<PathBuf> {
        match self {
            Self::Staged(staged) => staged.commit().await,
            Self::InPlace(target) => Ok(target),
        }
    }
}

/// Staging directory that is removed on drop unless committed.
#[derive(Debug)]
pub struct StagedOutput {
    staging: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedOutput {
    /// Creates `<parent>/.<name>.partial-<uuid>` for `target`.
    pub async fn create(target: &Path) -> Result<Self> {
        let staging = sibling(target, "partial")?;
        if let Some(parent) = staging.parent() {
            fs::create_dir_all(parent, false).await?;
        }
        tokio::fs::create_dir(&staging)
            .await
            .fs_context("creating staging directory", &staging)?;

        log::debug!("Staging bundle in {}", staging.display());
        Ok(Self {
            staging,
            target: target.to_path_buf(),
            committed: false,
        })
    }

    /// Staging directory.
    pub fn root(&self) -> &Path {
        &self.staging
    }

    /// Replaces the target with the staged tree.
    ///
    /// An existing bundle is moved aside first and only deleted once the new
    /// one is in place; if the final rename fails it is moved back.
    pub async fn commit(mut self) -> Result<PathBuf> {
        let previous = if tokio::fs::symlink_metadata(&self.target).await.is_ok() {
            let aside = sibling(&self.target, "old")?;
            tokio::fs::rename(&self.target, &aside)
                .await
                .fs_context("moving previous bundle aside", &self.target)?;
            Some(aside)
        } else {
            None
        };

        if let Err(e) = tokio::fs::rename(&self.staging, &self.target).await {
            if let Some(aside) = &previous {
                if let Err(restore) = tokio::fs::rename(aside, &self.target).await {
                    log::error!(
                        "could not restore previous bundle from {}: {}",
                        aside.display(),
                        restore
                    );
                }
            }
            return Err(e).fs_context("publishing bundle to", &self.target);
        }
        self.committed = true;

        if let Some(aside) = previous {
            fs::remove_if_exists(&aside).await?;
        }

        log::info!("Published {}", self.target.display());
        Ok(self.target.clone())
    }
}

impl Drop for StagedOutput {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        log::debug!("Discarding staged bundle {}", self.staging.display());
        if let Err(e) = std::fs::remove_dir_all(&self.staging) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to remove {}: {}", self.staging.display(), e);
            }
        }
    }
}

/// Hidden, uniquely named sibling of `target`.
fn sibling(target: &Path, tag: &str) -> Result<PathBuf> {
    let name = target.file_name().ok_or_else(|| {
        Error::GenericError(format!("{} has no final component", target.display()))
    })?;
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    Ok(parent.join(format!(
        ".{}.{}-{}",
        name.to_string_lossy(),
        tag,
        uuid::Uuid::new_v4()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn siblings(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn commit_replaces_previous_bundle() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out");
        std::fs::create_dir_all(target.join("bin")).unwrap();
        std::fs::write(target.join("bin/old"), "old").unwrap();

        let output = OutputRoot::prepare(&target, PublishStrategy::Staged)
            .await
            .unwrap();
        assert_ne!(output.root(), target);
        assert_eq!(output.target(), target);
        assert!(target.join("bin/old").exists(), "target untouched while staging");
        std::fs::create_dir_all(output.root().join("bin")).unwrap();
        std::fs::write(output.root().join("bin/aws"), "new").unwrap();

        let published = output.publish().await.unwrap();
        assert_eq!(published, target);
        assert!(target.join("bin/aws").exists());
        assert!(!target.join("bin/old").exists());
        assert_eq!(siblings(temp.path()), ["out"]);
    }

    #[tokio::test]
    async fn dropped_staging_leaves_target_alone() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        let output = OutputRoot::prepare(&target, PublishStrategy::Staged)
            .await
            .unwrap();
        std::fs::write(output.root().join("partial"), "x").unwrap();
        drop(output);

        assert!(target.join("keep").exists());
        assert_eq!(siblings(temp.path()), ["out"]);
    }

    #[tokio::test]
    async fn in_place_clears_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("out");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("stale"), "x").unwrap();

        let output = OutputRoot::prepare(&target, PublishStrategy::InPlace)
            .await
            .unwrap();
        assert_eq!(output.root(), target);
        assert_eq!(output.target(), target);
        assert!(fs::is_dir_empty(&target).await.unwrap());
        assert_eq!(output.publish().await.unwrap(), target);
    }
}
