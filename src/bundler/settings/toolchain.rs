//! Interpreter and provisioning tool configuration.

use std::path::PathBuf;

/// Default interpreter version installed into the bundle.
pub const DEFAULT_PYTHON_VERSION: &str = "3.12";

/// Conventional install location of the provisioning tool.
pub const WELL_KNOWN_UV_PATH: &str = "/usr/local/bin/uv";

/// One place to look for the provisioning tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolLocation {
    /// A path the user asked for explicitly.
    ExplicitPath(PathBuf),
    /// Search `PATH` for the tool name.
    PathSearch,
    /// A fixed install location.
    WellKnown(PathBuf),
}

impl std::fmt::Display for ToolLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExplicitPath(path) | Self::WellKnown(path) => write!(f, "{}", path.display()),
            Self::PathSearch => f.write_str("uv in PATH"),
        }
    }
}

/// Runtime provisioning configuration.
#[derive(Clone, Debug)]
pub struct ToolchainSettings {
    /// Interpreter version (e.g. "3.12"); also names the `python<version>` alias.
    pub python_version: String,

    /// Where to look for `uv`, probed in order.
    pub uv_locations: Vec<ToolLocation>,
}

impl Default for ToolchainSettings {
    fn default() -> Self {
        Self {
            python_version: DEFAULT_PYTHON_VERSION.into(),
            uv_locations: vec![
                ToolLocation::WellKnown(PathBuf::from(WELL_KNOWN_UV_PATH)),
                ToolLocation::PathSearch,
            ],
        }
    }
}
