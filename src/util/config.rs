//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `~/.coacd-build/config.toml` - user-wide defaults
//! - Project: `coacd-build.toml` at the project root
//!
//! Project config takes precedence over global config, field by field.
//! Command-line values take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::platform::{Arch, Compiler, Platform};

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "coacd-build.toml";

/// Default CoACD checkout, relative to the project root.
pub const DEFAULT_SOURCE_DIR: &str = "thirdparty/CoACD";

/// Build directory name, relative to the CoACD source directory.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// coacd-build configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Paths and build knobs
    pub build: BuildConfig,

    /// Android SDK settings
    pub android: AndroidConfig,

    /// Target used when none is given on the command line
    pub defaults: TargetDefaults,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// CoACD source directory (contains CMakeLists.txt)
    pub source_dir: Option<PathBuf>,

    /// Build directory; must be a direct child of the source directory
    pub build_dir: Option<PathBuf>,

    /// Number of parallel jobs (None = generator default)
    pub jobs: Option<usize>,

    /// Plugin directory that receives third-party licenses after a build
    pub plugin_dir: Option<PathBuf>,
}

/// Android SDK configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// SDK root; `ANDROID_HOME` wins when set
    pub home: Option<PathBuf>,

    /// NDK version under `<home>/ndk/`
    pub ndk_version: Option<String>,
}

/// Default target parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetDefaults {
    pub platform: Option<Platform>,
    pub arch: Option<Arch>,
    pub compiler: Option<Compiler>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.source_dir.is_some() {
            self.build.source_dir = other.build.source_dir;
        }
        if other.build.build_dir.is_some() {
            self.build.build_dir = other.build.build_dir;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.plugin_dir.is_some() {
            self.build.plugin_dir = other.build.plugin_dir;
        }

        if other.android.home.is_some() {
            self.android.home = other.android.home;
        }
        if other.android.ndk_version.is_some() {
            self.android.ndk_version = other.android.ndk_version;
        }

        if other.defaults.platform.is_some() {
            self.defaults.platform = other.defaults.platform;
        }
        if other.defaults.arch.is_some() {
            self.defaults.arch = other.defaults.arch;
        }
        if other.defaults.compiler.is_some() {
            self.defaults.compiler = other.defaults.compiler;
        }
    }

    /// CoACD source directory, resolved against `project_root`.
    pub fn source_dir(&self, project_root: &Path) -> PathBuf {
        let dir = self
            .build
            .source_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR));
        project_root.join(dir)
    }

    /// Build directory inside `source_dir`.
    pub fn build_dir(&self, source_dir: &Path) -> PathBuf {
        let dir = self
            .build
            .build_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR));
        source_dir.join(dir)
    }

    /// `key=value` pairs for the configured defaults, to be placed before
    /// any pairs given on the command line.
    pub fn default_pairs(&self) -> Vec<String> {
        let mut pairs = Vec::new();
        if let Some(platform) = self.defaults.platform {
            pairs.push(format!("platform={}", platform));
        }
        if let Some(arch) = self.defaults.arch {
            pairs.push(format!("arch={}", arch));
        }
        if let Some(compiler) = self.defaults.compiler {
            pairs.push(format!("compiler={}", compiler));
        }
        if let Some(ref home) = self.android.home {
            pairs.push(format!("ANDROID_HOME={}", home.display()));
        }
        if let Some(ref version) = self.android.ndk_version {
            pairs.push(format!("ndk_version={}", version));
        }
        pairs
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (coacd-build.toml)
/// 2. Global config (~/.coacd-build/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}
