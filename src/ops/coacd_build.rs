//! The `build` operation: configure and build CoACD, then collect what the
//! plugin needs from the build tree.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::builder::artifacts::{find_libraries, Artifact};
use crate::builder::cmake::{is_cmake_project, CMakeBuilder};
use crate::builder::licenses::collect_licenses;
use crate::builder::resolver::BuildPlan;
use crate::core::environment::Environment;
use crate::util::fs::remove_dir_all_if_exists;

/// Options for one build invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// CoACD source directory
    pub source_dir: PathBuf,
    /// Directory `cmake ..` runs in
    pub build_dir: PathBuf,
    /// Remove the build directory and stop
    pub clean: bool,
    /// Do nothing (the surrounding build reuses a previous result)
    pub skip: bool,
    /// Resolve commands only
    pub plan: bool,
    /// Parallel build jobs
    pub jobs: Option<usize>,
    /// Copy third-party licenses here after building
    pub plugin_dir: Option<PathBuf>,
    /// Mirror tool output to the console
    pub echo: bool,
}

/// What a build invocation did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildResult {
    /// Resolved commands; absent for clean/skip
    pub plan: Option<BuildPlan>,
    /// Libraries found after a real build
    pub libraries: Vec<Artifact>,
    /// License files written into the plugin directory
    pub licenses: Vec<PathBuf>,
}

/// Build CoACD for `env`.
pub fn build(env: &Environment, opts: &BuildOptions) -> Result<BuildResult> {
    if opts.skip {
        tracing::info!("Skipping CoACD build");
        return Ok(BuildResult::default());
    }

    if opts.clean {
        remove_dir_all_if_exists(&opts.build_dir)?;
        tracing::info!("Removed {}", opts.build_dir.display());
        return Ok(BuildResult::default());
    }

    let builder = CMakeBuilder::new(env, &opts.build_dir)
        .jobs(opts.jobs)
        .echo(opts.echo);

    if opts.plan {
        return Ok(BuildResult {
            plan: Some(builder.plan()?),
            ..BuildResult::default()
        });
    }

    if !is_cmake_project(&opts.source_dir) {
        bail!(
            "no CMakeLists.txt in {}\n\
             \n\
             Point `--source-dir` (or `[build] source_dir`) at a CoACD checkout.",
            opts.source_dir.display()
        );
    }

    let plan = builder.build()?;

    let libraries = find_libraries(&opts.build_dir, env)
        .with_context(|| format!("failed to locate libraries for {}", env.label()))?;
    for lib in &libraries {
        tracing::debug!("library `{}` at {}", lib.name, lib.path.display());
    }

    let licenses = match opts.plugin_dir {
        Some(ref plugin_dir) => collect_licenses(&opts.build_dir, plugin_dir)?,
        None => Vec::new(),
    };

    Ok(BuildResult {
        plan: Some(plan),
        libraries,
        licenses,
    })
}
