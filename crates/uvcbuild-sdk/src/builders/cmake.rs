//! CMake build automation.
//!
//! Builds the driver once per Android ABI: a generate step that configures a
//! Ninja build tree with the ABI's toolchain file, followed by a build step
//! that compiles and installs into the shared install prefix.

use std::fmt;
use std::path::Path;

use super::common::{CommandRunner, DryRunRunner, Invocation, SystemRunner};
use crate::provision::{provision_arch_dir, provision_output_root};
use crate::types::{
    Architecture, BuildConfiguration, BuildError, BuildPhase, BuildStepResult,
};

/// Build-configuration and build tool.
pub const CMAKE: &str = "cmake";
/// Generator passed to the configure step.
pub const GENERATOR: &str = "Ninja";

/// Progress of a run.
///
/// `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Generating(Architecture),
    Building(Architecture),
    Succeeded,
    Failed,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildState::Idle => f.write_str("idle"),
            BuildState::Generating(arch) => write!(f, "generating {}", arch),
            BuildState::Building(arch) => write!(f, "building {}", arch),
            BuildState::Succeeded => f.write_str("succeeded"),
            BuildState::Failed => f.write_str("failed"),
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Architectures that completed both steps, in build order.
    pub completed: Vec<Architecture>,
    /// Every step executed, in order.
    pub steps: Vec<(Architecture, BuildStepResult)>,
}

/// Drives the generate and build steps for every configured architecture.
pub struct CMakeBuilder<'a> {
    config: &'a BuildConfiguration,
    verbose: bool,
    dry_run: bool,
    state: BuildState,
}

impl<'a> CMakeBuilder<'a> {
    pub fn new(config: &'a BuildConfiguration) -> Self {
        Self {
            config,
            verbose: false,
            dry_run: false,
            state: BuildState::Idle,
        }
    }

    /// Enables verbose output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Prints commands instead of running them and skips directory creation.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Runs the build with real processes, or printed ones in dry-run mode.
    pub fn build(&mut self) -> Result<BuildReport, BuildError> {
        if self.dry_run {
            self.build_with(&mut DryRunRunner)
        } else {
            self.build_with(&mut SystemRunner)
        }
    }

    /// Runs the build through `runner`.
    ///
    /// Architectures are processed strictly in order. The first step that
    /// fails to start or exits non-zero aborts the run; nothing after it is
    /// attempted and the builder ends in [`BuildState::Failed`].
    pub fn build_with<R: CommandRunner>(
        &mut self,
        runner: &mut R,
    ) -> Result<BuildReport, BuildError> {
        let result = self.run_all(runner);
        self.transition(if result.is_ok() {
            BuildState::Succeeded
        } else {
            BuildState::Failed
        });
        result
    }

    fn run_all<R: CommandRunner>(&mut self, runner: &mut R) -> Result<BuildReport, BuildError> {
        let config = self.config;
        if !self.dry_run {
            provision_output_root(&config.output_dir)?;
        }

        let mut report = BuildReport {
            completed: Vec::with_capacity(config.architectures.len()),
            steps: Vec::new(),
        };

        for &arch in &config.architectures {
            self.transition(BuildState::Generating(arch));
            println!("Generating arch: {}", arch);

            let output_dir = if self.dry_run {
                config.arch_output_dir(arch)
            } else {
                provision_arch_dir(&config.output_dir, arch)?
            };

            let generate = self.generate_invocation(arch, &output_dir);
            let step = self.run_step(runner, BuildPhase::Generate, &generate)?;
            report.steps.push((arch, step));
            step.into_result(arch)?;

            self.transition(BuildState::Building(arch));
            println!("Building arch: {}", arch);

            let build = self.build_invocation(&output_dir);
            let step = self.run_step(runner, BuildPhase::Build, &build)?;
            report.steps.push((arch, step));
            step.into_result(arch)?;

            report.completed.push(arch);
        }

        Ok(report)
    }

    fn run_step<R: CommandRunner>(
        &self,
        runner: &mut R,
        phase: BuildPhase,
        invocation: &Invocation,
    ) -> Result<BuildStepResult, BuildError> {
        if self.verbose && !self.dry_run {
            println!("  {}", invocation.command_line());
        }
        let exit_code = runner.run(invocation)?;
        log::trace!("{} step exited with {}", phase, exit_code);
        Ok(BuildStepResult { phase, exit_code })
    }

    /// Configure step for one architecture.
    pub fn generate_invocation(&self, arch: Architecture, output_dir: &Path) -> Invocation {
        let config = self.config;
        Invocation::new(CMAKE, output_dir)
            .args(["-G", GENERATOR])
            .arg(format!(
                "-DVUFORIA_HEADER_DIR='{}'",
                config.header_dir.display()
            ))
            .arg(format!(
                "-DEXTERNAL_UVC_DIR='{}'",
                config.external_dir.display()
            ))
            .arg(format!(
                "-DCMAKE_INSTALL_PREFIX='{}'",
                config.install_dir.display()
            ))
            .arg(format!(
                "-DCMAKE_TOOLCHAIN_FILE='{}'",
                config.toolchain_file(arch).display()
            ))
            .arg(format!("-DCMAKE_BUILD_TYPE={}", config.build_type))
            .arg(config.source_dir.display().to_string())
    }

    /// Build-and-install step, run inside an already generated build tree.
    pub fn build_invocation(&self, output_dir: &Path) -> Invocation {
        Invocation::new(CMAKE, output_dir).args(["--build", ".", "--target", "install"])
    }

    fn transition(&mut self, next: BuildState) {
        log::trace!("build state: {} -> {}", self.state, next);
        self.state = next;
    }
}
