//! Main bundle build orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that runs the pipeline
//! stages in order and publishes the result.

use crate::bundler::{
    Result,
    install,
    prune::{self, PruneReport},
    runtime,
    settings::{Settings, share_dir_in},
    source,
};
use std::path::PathBuf;

use super::{
    checksum::summarize,
    publish::OutputRoot,
    workspace::Workspace,
};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Resolving the provisioning tool before any network access.
    Preflight,
    /// Downloading and extracting the source archive.
    Acquiring,
    /// Finding or installing the interpreter.
    Provisioning,
    /// Creating and relinking the environment.
    Materializing,
    /// Installing the application into the environment.
    Installing,
    /// Writing portable launchers.
    Rewriting,
    /// Removing build-only artifacts.
    Pruning,
    /// Pointing leftover absolute paths at the output directory and moving
    /// the bundle there.
    Publishing,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Where a build currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Not started.
    Pending,
    /// Executing a stage.
    Running(Stage),
    /// Bundle published.
    Done,
    /// Aborted during a stage; later stages did not run.
    Failed(Stage),
}

/// State machine record of one build.
#[derive(Debug, Clone)]
pub struct BuildProgress {
    state: BuildState,
    visited: Vec<Stage>,
}

impl Default for BuildProgress {
    fn default() -> Self {
        Self {
            state: BuildState::Pending,
            visited: Vec::new(),
        }
    }
}

impl BuildProgress {
    /// Current state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Stages entered so far, in order.
    pub fn visited(&self) -> &[Stage] {
        &self.visited
    }

    fn enter(&mut self, stage: Stage) {
        log::info!("==> {}", stage);
        self.state = BuildState::Running(stage);
        self.visited.push(stage);
    }

    fn finish(&mut self) {
        self.state = BuildState::Done;
    }

    fn fail(&mut self) {
        if let BuildState::Running(stage) = self.state {
            self.state = BuildState::Failed(stage);
        }
    }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BundledArtifact {
    /// Bundle root (the output directory).
    pub root: PathBuf,
    /// Rewritten launchers under `bin/`.
    pub launchers: Vec<PathBuf>,
    /// What pruning removed.
    pub prune: PruneReport,
    /// Number of regular files in the bundle.
    pub files: usize,
    /// Total size of the bundle in bytes.
    pub size: u64,
    /// SHA-256 over the bundle tree.
    pub checksum: String,
}

/// Main bundle build orchestrator.
///
/// # Examples
///
/// ```no_run
/// use awscli_bundle::bundler::{Bundler, SettingsBuilder};
///
/// # async fn example() -> awscli_bundle::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .version("2.15.24")
///     .output_directory("./out")
///     .build()?;
///
/// let artifact = Bundler::new(settings).build().await?;
/// println!("{} ({} files, {} bytes)", artifact.root.display(), artifact.files, artifact.size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the full pipeline.
    pub async fn build(&self) -> Result<BundledArtifact> {
        self.build_with_progress(&mut BuildProgress::default()).await
    }

    /// Runs the full pipeline, recording stage transitions in `progress`.
    ///
    /// The first failing stage aborts the build. The scratch workspace is
    /// removed on every exit path.
    pub async fn build_with_progress(
        &self,
        progress: &mut BuildProgress,
    ) -> Result<BundledArtifact> {
        match self.run_stages(progress).await {
            Ok(artifact) => {
                progress.finish();
                log::info!("Done: {}", artifact.root.display());
                Ok(artifact)
            }
            Err(e) => {
                progress.fail();
                if let BuildState::Failed(stage) = progress.state() {
                    log::error!("{} failed: {}", stage, e);
                }
                Err(e)
            }
        }
    }

    async fn run_stages(&self, progress: &mut BuildProgress) -> Result<BundledArtifact> {
        let settings = &self.settings;
        let app = settings.app();
        let python_version = settings.toolchain().python_version.as_str();

        progress.enter(Stage::Preflight);
        let uv = runtime::resolve_uv(&settings.toolchain().uv_locations).await?;

        let workspace = Workspace::create(settings.workspace_parent())?;

        progress.enter(Stage::Acquiring);
        let archive = source::fetch(app, settings.version(), workspace.path()).await?;
        let source_dir = workspace.source_dir();
        source::extract(&archive, &source_dir).await?;

        progress.enter(Stage::Provisioning);
        let python = runtime::ensure_interpreter(&uv, python_version).await?;

        progress.enter(Stage::Materializing);
        let output = OutputRoot::prepare(settings.output_directory(), settings.publish()).await?;
        let share_dir = share_dir_in(output.root(), app);
        runtime::create_environment(&python, &share_dir).await?;
        runtime::relink(&share_dir, &python, python_version).await?;

        progress.enter(Stage::Installing);
        install::install(&share_dir, &source_dir).await?;

        progress.enter(Stage::Rewriting);
        let bin_dir = output.root().join("bin");
        for program in &app.programs {
            install::write_launcher(&share_dir, &bin_dir, program, &app.app_id).await?;
        }

        progress.enter(Stage::Pruning);
        let prune = prune::prune_environment(&share_dir).await?;

        progress.enter(Stage::Publishing);
        install::retarget_scripts(&share_dir, output.root(), output.target()).await?;
        let summary = summarize(output.root()).await?;
        let root = output.publish().await?;
        drop(workspace);

        log::info!(
            "Bundle has {} files, {} bytes, sha256 {}",
            summary.files,
            summary.size,
            summary.checksum
        );

        Ok(BundledArtifact {
            launchers: app
                .programs
                .iter()
                .map(|program| root.join("bin").join(program))
                .collect(),
            root,
            prune,
            files: summary.files,
            size: summary.size,
            checksum: summary.checksum,
        })
    }
}
