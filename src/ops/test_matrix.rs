//! Build-matrix driver.
//!
//! Runs one full build per target, strictly one after another, wiping the
//! build tree before each round (plan-only runs resolve commands and touch
//! nothing). A failing target is recorded with its
//! diagnostic text and the driver moves on to the next one.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::core::environment::Environment;
use crate::core::platform::{Arch, Compiler, Platform};
use crate::ops::coacd_build::{build, BuildOptions};

/// One matrix entry as written in a matrix file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixTarget {
    pub platform: Platform,
    #[serde(default)]
    pub arch: Option<Arch>,
    #[serde(default)]
    pub compiler: Option<Compiler>,
}

/// A matrix file: a list of `[[target]]` tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixFile {
    #[serde(default)]
    pub target: Vec<MatrixTarget>,
}

impl MatrixFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read matrix file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse matrix file: {}", path.display()))
    }

    /// Expand into environments, taking Android settings from `base`.
    pub fn environments(&self, base: &Environment) -> Vec<Environment> {
        self.target
            .iter()
            .map(|t| {
                let arch = t.arch.unwrap_or(t.platform.default_arch());
                let mut env = Environment::new(t.platform, arch);
                if let Some(compiler) = t.compiler {
                    env = env.with_compiler(compiler);
                }
                env.android_home = base.android_home.clone();
                env.ndk_version = base.ndk_version.clone();
                env
            })
            .collect()
    }
}

/// The matrix exercised from a Windows host: every Windows and Android
/// architecture plus the web build.
pub fn default_matrix() -> Vec<MatrixTarget> {
    let target = |platform, arch| MatrixTarget {
        platform,
        arch: Some(arch),
        compiler: None,
    };

    vec![
        target(Platform::Windows, Arch::X86_32),
        target(Platform::Windows, Arch::X86_64),
        target(Platform::Windows, Arch::Arm64),
        target(Platform::Android, Arch::X86_32),
        target(Platform::Android, Arch::X86_64),
        target(Platform::Android, Arch::Arm32),
        target(Platform::Android, Arch::Arm64),
        MatrixTarget {
            platform: Platform::Web,
            arch: None,
            compiler: None,
        },
    ]
}

/// Outcome of a matrix run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatrixReport {
    pub passed: Vec<String>,
    /// Target label and the error that stopped it
    pub failed: Vec<(String, String)>,
}

impl MatrixReport {
    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        writeln!(out, "===== TEST RESULTS =====").unwrap();
        writeln!(out).unwrap();
        writeln!(out, "Passed ({}):", self.passed.len()).unwrap();
        for label in &self.passed {
            writeln!(out, "  - {}", label).unwrap();
        }
        writeln!(out).unwrap();
        writeln!(out, "Failed ({}):", self.failed.len()).unwrap();
        for (label, error) in &self.failed {
            writeln!(out, "  - {}", label).unwrap();
            writeln!(out, "    Error: {}", error).unwrap();
        }
        writeln!(out).unwrap();
        writeln!(out, "========================").unwrap();
        out
    }
}

/// Run every environment in order.
///
/// `opts` is the template for each round; its `clean`/`skip` flags are
/// managed by the driver. With `plan` set, rounds only resolve commands and
/// the build tree is not cleaned.
pub fn run_matrix(envs: &[Environment], opts: &BuildOptions) -> MatrixReport {
    let mut report = MatrixReport::default();

    let pb = if opts.echo {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(envs.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{pos}/{len}] {msg}")
        {
            pb.set_style(style);
        }
        pb
    };

    for env in envs {
        let label = env.to_string();
        pb.set_message(label.clone());
        tracing::info!("=== Running: {} ===", label);

        match run_round(env, opts) {
            Ok(()) => report.passed.push(label),
            Err(e) => {
                tracing::warn!("{} failed", label);
                report.failed.push((label, format!("{:#}", e)));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    report
}

fn run_round(env: &Environment, template: &BuildOptions) -> Result<()> {
    // Plan-only rounds leave the build tree alone.
    if !template.plan {
        let clean = BuildOptions {
            clean: true,
            skip: false,
            plan: false,
            ..template.clone()
        };
        build(env, &clean)?;
    }

    let round = BuildOptions {
        clean: false,
        skip: false,
        plan: template.plan,
        ..template.clone()
    };
    build(env, &round)?;
    Ok(())
}
