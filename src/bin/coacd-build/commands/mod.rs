//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod doctor;
pub mod licenses;
pub mod locate;
pub mod matrix;
pub mod resolve;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::TargetArgs;
use coacd_build::util::{Config, GlobalContext};
use coacd_build::Environment;

/// Context and configuration shared by every command.
pub struct Session {
    pub ctx: GlobalContext,
    pub config: Config,
    source_dir: Option<PathBuf>,
}

impl Session {
    pub fn new(source_dir: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let mut ctx = GlobalContext::new()?;
        ctx.set_verbose(verbose);
        let config = ctx.load_config();
        let source_dir = source_dir.map(|dir| ctx.cwd().join(dir));

        Ok(Session {
            ctx,
            config,
            source_dir,
        })
    }

    /// CoACD source directory: `--source-dir` > config > default.
    pub fn source_dir(&self) -> PathBuf {
        self.source_dir
            .clone()
            .unwrap_or_else(|| self.config.source_dir(self.ctx.project_root()))
    }

    pub fn build_dir(&self) -> PathBuf {
        self.config.build_dir(&self.source_dir())
    }

    /// Build the target environment.
    ///
    /// Later pairs win: config defaults, then `ANDROID_HOME`, then the
    /// pairs given on the command line.
    pub fn environment(&self, target: &TargetArgs) -> Result<Environment> {
        let mut pairs = self.config.default_pairs();
        if let Some(ref home) = target.android_home {
            pairs.push(format!("ANDROID_HOME={}", home.display()));
        }
        pairs.extend(target.pairs.iter().cloned());

        let env = Environment::from_pairs(&pairs)?;
        tracing::debug!("target: {}", env);
        Ok(env)
    }

    /// Parallel jobs: CLI > config > generator default.
    pub fn jobs(&self, jobs: Option<usize>) -> Option<usize> {
        jobs.or(self.config.build.jobs)
    }
}
