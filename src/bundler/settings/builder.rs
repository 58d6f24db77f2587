//! Builder for constructing Settings.

use super::{AppSettings, PublishStrategy, Settings, ToolLocation, ToolchainSettings};
use crate::bundler::error::{Context, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Default output directory when none is given.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "out";

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use awscli_bundle::bundler::{SettingsBuilder, PublishStrategy};
///
/// # fn example() -> awscli_bundle::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .version("2.15.24")
///     .output_directory("./out")
///     .python_version("3.12")
///     .uv_path("/opt/uv/bin/uv")
///     .publish(PublishStrategy::InPlace)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    version: Option<String>,
    output_directory: Option<PathBuf>,
    app: AppSettings,
    toolchain: ToolchainSettings,
    explicit_uv: Option<PathBuf>,
    path_search: Option<bool>,
    publish: PublishStrategy,
    workspace_parent: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the application release to build.
    ///
    /// # Required
    ///
    /// This field is required and must be non-empty.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the bundle output directory.
    ///
    /// Default: `out`, resolved against the current directory.
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the application description.
    pub fn app(mut self, app: AppSettings) -> Self {
        self.app = app;
        self
    }

    /// Sets the interpreter version.
    ///
    /// Default: `3.12`
    pub fn python_version(mut self, version: impl Into<String>) -> Self {
        self.toolchain.python_version = version.into();
        self
    }

    /// Probes this path for `uv` before any other location.
    pub fn uv_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.explicit_uv = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the ordered list of `uv` locations.
    pub fn uv_locations(mut self, locations: Vec<ToolLocation>) -> Self {
        self.toolchain.uv_locations = locations;
        self
    }

    /// Enables or disables searching `PATH` for `uv`.
    ///
    /// Default: enabled
    pub fn path_search(mut self, enabled: bool) -> Self {
        self.path_search = Some(enabled);
        self
    }

    /// Sets the publish strategy.
    ///
    /// Default: [`PublishStrategy::Staged`]
    pub fn publish(mut self, strategy: PublishStrategy) -> Self {
        self.publish = strategy;
        self
    }

    /// Creates scratch workspaces under `path` instead of the system temp
    /// directory.
    pub fn workspace_parent<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.workspace_parent = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `version` is missing or empty, if no launcher
    /// programs are configured, or if the output directory cannot be made
    /// absolute.
    pub fn build(self) -> Result<Settings> {
        let version = self.version.context("version is required")?;
        if version.trim().is_empty() {
            crate::bail!("version must not be empty");
        }
        if self.app.programs.is_empty() {
            crate::bail!("at least one launcher program is required");
        }

        let output_directory = self
            .output_directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIRECTORY));
        let output_directory = output_directory
            .absolutize()
            .context("resolving output directory")?
            .into_owned();

        let mut toolchain = self.toolchain;
        if self.path_search == Some(false) {
            toolchain
                .uv_locations
                .retain(|location| *location != ToolLocation::PathSearch);
        }
        if let Some(explicit) = self.explicit_uv {
            toolchain
                .uv_locations
                .insert(0, ToolLocation::ExplicitPath(explicit));
        }

        Ok(Settings::new(
            version,
            output_directory,
            self.app,
            toolchain,
            self.publish,
            self.workspace_parent,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_out_against_cwd() {
        let settings = SettingsBuilder::new().version("2.15.24").build().unwrap();
        assert!(settings.output_directory().is_absolute());
        assert!(settings.output_directory().ends_with("out"));
        assert_eq!(settings.toolchain().python_version, "3.12");
        assert_eq!(settings.publish(), PublishStrategy::Staged);
        assert!(settings.share_dir().ends_with("out/share/awscli"));
        assert_eq!(settings.workspace_parent(), None);
    }

    #[test]
    fn empty_version_is_rejected() {
        assert!(SettingsBuilder::new().version("  ").build().is_err());
        assert!(SettingsBuilder::new().build().is_err());
    }

    #[test]
    fn explicit_uv_is_probed_first_and_path_search_can_be_disabled() {
        let settings = SettingsBuilder::new()
            .version("1")
            .uv_path("/opt/uv")
            .path_search(false)
            .build()
            .unwrap();
        assert_eq!(
            settings.toolchain().uv_locations,
            vec![
                ToolLocation::ExplicitPath("/opt/uv".into()),
                ToolLocation::WellKnown("/usr/local/bin/uv".into()),
            ]
        );
    }
}
