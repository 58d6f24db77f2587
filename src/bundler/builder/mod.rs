//! Bundle build orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that sequences the
//! pipeline stages and owns the lifecycle of the scratch workspace and the
//! output directory.
//!
//! # Overview
//!
//! The bundler:
//! 1. Resolves the provisioning tool
//! 2. Downloads and extracts the source release
//! 3. Finds or installs the interpreter
//! 4. Materialises and relinks the environment
//! 5. Installs the application and rewrites its launchers
//! 6. Prunes build-only files
//! 7. Publishes the bundle and returns a [`BundledArtifact`]
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 summary of the finished bundle
//! - [`orchestrator`] - Main [`Bundler`] struct and state machine
//! - [`publish`] - Staged or in-place output handling
//! - [`workspace`] - Scratch directory removed on drop

mod checksum;
mod orchestrator;
mod publish;
mod workspace;

pub use checksum::{TreeSummary, summarize};
pub use orchestrator::{BuildProgress, BuildState, BundledArtifact, Bundler, Stage};
pub use publish::{OutputRoot, StagedOutput};
pub use workspace::{WORKSPACE_PREFIX, Workspace};
