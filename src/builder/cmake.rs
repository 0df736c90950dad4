//! CMake driver for the CoACD source tree.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::builder::resolver::{resolve_plan, BuildPlan, CommandLine, ResolveOptions};
use crate::core::environment::Environment;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_cmake, ProcessBuilder};

/// Runs the resolved configure and build steps inside a build directory.
pub struct CMakeBuilder<'a> {
    env: &'a Environment,
    build_dir: PathBuf,
    opts: ResolveOptions,
    echo: bool,
}

impl<'a> CMakeBuilder<'a> {
    /// Create a new CMake builder. `build_dir` is where `cmake ..` runs, so
    /// it must sit directly below the CMake source directory.
    pub fn new(env: &'a Environment, build_dir: impl Into<PathBuf>) -> Self {
        CMakeBuilder {
            env,
            build_dir: build_dir.into(),
            opts: ResolveOptions::default(),
            echo: true,
        }
    }

    /// Set the number of parallel build jobs.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.opts.jobs = jobs;
        self
    }

    /// Mirror tool output to the console.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Resolve both command lines without running anything.
    pub fn plan(&self) -> Result<BuildPlan> {
        Ok(resolve_plan(self.env, &self.opts)?)
    }

    /// Configure, then build. The build step only runs after configure has
    /// exited successfully.
    pub fn build(&self) -> Result<BuildPlan> {
        let plan = self.plan()?;

        // The web wrappers find cmake themselves.
        if plan.configure.program() == Some("cmake") && find_cmake().is_none() {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build CoACD.\n\
                 Install CMake and ensure it's in your PATH."
            );
        }

        self.execute(&plan)?;
        Ok(plan)
    }

    fn execute(&self, plan: &BuildPlan) -> Result<()> {
        ensure_dir(&self.build_dir)?;

        tracing::info!("Configuring CoACD for {}", self.env);
        self.run(&plan.configure)
            .context("CMake configuration failed")?;

        tracing::info!("Building CoACD for {}", self.env);
        self.run(&plan.build).context("CMake build failed")?;

        Ok(())
    }

    fn run(&self, command: &CommandLine) -> Result<()> {
        tracing::debug!("{}", command);
        ProcessBuilder::from_command_line(command)?
            .cwd(&self.build_dir)
            .echo(self.echo)
            .exec_streaming_and_check()?;
        Ok(())
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{Arch, Platform};
    use tempfile::TempDir;

    #[test]
    fn test_is_cmake_project() {
        let tmp = TempDir::new().unwrap();

        assert!(!is_cmake_project(tmp.path()));

        std::fs::write(
            tmp.path().join("CMakeLists.txt"),
            "cmake_minimum_required(VERSION 3.10)",
        )
        .unwrap();

        assert!(is_cmake_project(tmp.path()));
    }

    #[test]
    fn test_plan_does_not_touch_build_dir() {
        let tmp = TempDir::new().unwrap();
        let build_dir = tmp.path().join("build");
        let env = Environment::new(Platform::Windows, Arch::Arm64);

        let plan = CMakeBuilder::new(&env, &build_dir)
            .jobs(Some(4))
            .plan()
            .unwrap();

        assert!(plan.configure.contains_pair("-A", "ARM64"));
        assert!(plan.build.contains_pair("--parallel", "4"));
        assert!(!build_dir.exists());
    }

    #[test]
    fn test_build_stops_on_configuration_error() {
        let tmp = TempDir::new().unwrap();
        let build_dir = tmp.path().join("build");
        let env = Environment::new(Platform::Android, Arch::Arm64);

        // No ANDROID_HOME: resolution fails before anything runs.
        assert!(CMakeBuilder::new(&env, &build_dir).build().is_err());
        assert!(!build_dir.exists());
    }

    #[cfg(unix)]
    fn sh(script: &str) -> CommandLine {
        CommandLine::new(vec!["sh".into(), "-c".into(), script.into()])
    }

    #[cfg(unix)]
    #[test]
    fn test_build_step_skipped_after_failed_configure() {
        let tmp = TempDir::new().unwrap();
        let build_dir = tmp.path().join("build");
        let env = Environment::new(Platform::Linux, Arch::X86_64);
        let plan = BuildPlan {
            environment: env.clone(),
            configure: sh("echo 'CMake Error' >&2; exit 1"),
            build: sh("touch built"),
        };

        let err = CMakeBuilder::new(&env, &build_dir)
            .echo(false)
            .execute(&plan)
            .unwrap_err();

        assert!(format!("{:#}", err).contains("CMake configuration failed"));
        assert!(build_dir.exists());
        assert!(!build_dir.join("built").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_steps_run_in_order_inside_build_dir() {
        let tmp = TempDir::new().unwrap();
        let build_dir = tmp.path().join("build");
        let env = Environment::new(Platform::Linux, Arch::X86_64);
        let plan = BuildPlan {
            environment: env.clone(),
            configure: sh("touch configured"),
            build: sh("test -f configured && touch built"),
        };

        CMakeBuilder::new(&env, &build_dir)
            .echo(false)
            .execute(&plan)
            .unwrap();

        assert!(build_dir.join("built").is_file());
    }
}
