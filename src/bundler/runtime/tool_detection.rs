//! Provisioning tool detection.
//!
//! Candidates are probed in the configured order; the first one that answers
//! `--version` successfully wins.

use crate::bundler::{
    error::{Error, Result},
    settings::ToolLocation,
    utils::process,
};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Name of the provisioning tool.
pub const UV: &str = "uv";

/// Returns the first location that yields a working `uv`, if any.
pub async fn find_uv(locations: &[ToolLocation]) -> Option<PathBuf> {
    for location in locations {
        let candidate = match location {
            ToolLocation::ExplicitPath(path) | ToolLocation::WellKnown(path) => path.clone(),
            ToolLocation::PathSearch => match which::which(UV) {
                Ok(path) => path,
                Err(e) => {
                    log::debug!("{} not found in PATH: {}", UV, e);
                    continue;
                }
            },
        };

        if let Some(version) = probe(&candidate).await {
            log::info!("✓ {} available: {} ({})", UV, candidate.display(), version);
            return Some(candidate);
        }
    }

    None
}

/// Resolves `uv` or fails with [`Error::ToolNotFound`] naming every candidate.
pub async fn resolve_uv(locations: &[ToolLocation]) -> Result<PathBuf> {
    find_uv(locations).await.ok_or_else(|| Error::ToolNotFound {
        tool: UV.to_string(),
        tried: locations.iter().map(ToString::to_string).collect(),
    })
}

async fn probe(candidate: &Path) -> Option<String> {
    match process::output(Command::new(candidate).arg("--version")).await {
        Ok(version) => Some(version),
        Err(e) => {
            log::debug!("{} rejected: {}", candidate.display(), e);
            None
        }
    }
}
