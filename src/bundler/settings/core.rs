//! Core Settings struct and implementations.

use super::{AppSettings, ToolchainSettings};
use std::path::{Path, PathBuf};

/// How the finished bundle reaches the output directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PublishStrategy {
    /// Build in a sibling staging directory and rename it into place on
    /// success. A failed build leaves the output directory untouched.
    #[default]
    Staged,
    /// Clear the output directory before materialising and build directly
    /// into it. A failed build leaves it absent or incomplete.
    InPlace,
}

/// Main settings for a bundle build.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder).
///
/// # Examples
///
/// ```no_run
/// use awscli_bundle::bundler::SettingsBuilder;
///
/// # fn example() -> awscli_bundle::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .version("2.15.24")
///     .output_directory("out")
///     .build()?;
/// assert_eq!(settings.share_dir().file_name().unwrap(), "awscli");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Application release to build.
    version: String,

    /// Final bundle location (absolute).
    output_directory: PathBuf,

    /// Application description.
    app: AppSettings,

    /// Interpreter provisioning.
    toolchain: ToolchainSettings,

    publish: PublishStrategy,

    /// Where scratch workspaces are created; the system temp directory when unset.
    workspace_parent: Option<PathBuf>,
}

impl Settings {
    /// Returns the application release being built.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the absolute output directory.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Returns the application description.
    pub fn app(&self) -> &AppSettings {
        &self.app
    }

    /// Returns the provisioning configuration.
    pub fn toolchain(&self) -> &ToolchainSettings {
        &self.toolchain
    }

    /// Returns the publish strategy.
    pub fn publish(&self) -> PublishStrategy {
        self.publish
    }

    /// Returns the directory scratch workspaces are created in, if overridden.
    pub fn workspace_parent(&self) -> Option<&Path> {
        self.workspace_parent.as_deref()
    }

    /// Environment root inside the output directory (`share/<app>`).
    pub fn share_dir(&self) -> PathBuf {
        share_dir_in(&self.output_directory, &self.app)
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        version: String,
        output_directory: PathBuf,
        app: AppSettings,
        toolchain: ToolchainSettings,
        publish: PublishStrategy,
        workspace_parent: Option<PathBuf>,
    ) -> Self {
        Self {
            version,
            output_directory,
            app,
            toolchain,
            publish,
            workspace_parent,
        }
    }
}

/// Environment root for a bundle rooted at `root`.
pub fn share_dir_in(root: &Path, app: &AppSettings) -> PathBuf {
    root.join("share").join(&app.app_id)
}
