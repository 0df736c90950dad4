//! Build error types.
//!
//! Every failure falls into one of three classes (see [`ErrorKind`]) and all
//! of them are fatal: nothing here is retried or downgraded to a warning.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::core::platform::{Arch, Compiler, Platform};

/// Which part of the pipeline produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unsupported parameter combination or missing table entry.
    Configuration,
    /// A child process exited non-zero.
    Process,
    /// An expected artifact directory or license file is absent.
    Discovery,
}

/// Error raised while resolving, running or collecting a build.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("invalid value `{value}` for `{key}` (expected one of: {expected})")]
    #[diagnostic(code(coacd_build::config::invalid_value))]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("unknown build parameter `{key}`")]
    #[diagnostic(
        code(coacd_build::config::unknown_key),
        help("recognized parameters: platform, arch, compiler, ANDROID_HOME, ndk_version")
    )]
    UnknownKey { key: String },

    #[error("missing required build parameter `{key}`")]
    #[diagnostic(code(coacd_build::config::missing_key))]
    MissingKey { key: String },

    #[error("compiler `{compiler}` is not supported for platform `{platform}`")]
    #[diagnostic(code(coacd_build::config::unsupported_compiler))]
    UnsupportedCompiler {
        platform: Platform,
        compiler: Compiler,
        #[help]
        supported: String,
    },

    #[error("architecture `{arch}` has no `{table}` entry for platform `{platform}`")]
    #[diagnostic(code(coacd_build::config::unsupported_arch))]
    UnsupportedArch {
        platform: Platform,
        arch: Arch,
        table: &'static str,
    },

    #[error("ANDROID_HOME is not set; the NDK toolchain file cannot be located")]
    #[diagnostic(
        code(coacd_build::config::missing_android_home),
        help("export ANDROID_HOME or set `[android] home` in coacd-build.toml")
    )]
    MissingAndroidHome,

    #[error("`{command}` failed with exit code {}\n{stderr}", display_code(.code))]
    #[diagnostic(code(coacd_build::process::failed))]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("no artifact directory matching `{pattern}` in {}", root.display())]
    #[diagnostic(
        code(coacd_build::discovery::artifact_not_found),
        help("the configure and build steps must succeed before libraries can be located")
    )]
    ArtifactNotFound { root: PathBuf, pattern: String },

    #[error("invalid artifact directory pattern `{pattern}`")]
    #[diagnostic(code(coacd_build::discovery::invalid_pattern))]
    InvalidArtifactPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("license file for `{dependency}` not found: {}", path.display())]
    #[diagnostic(
        code(coacd_build::discovery::license_missing),
        help("the dependency's source tree does not have the expected layout; rebuild it first")
    )]
    LicenseMissing { dependency: String, path: PathBuf },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<signal>".to_string(),
    }
}

impl BuildError {
    pub(crate) fn invalid_value(key: &str, value: &str) -> Self {
        let expected = match key {
            "platform" => "macos, linux, windows, android, web",
            "arch" => "x86_32, x86_64, arm32, arm64, wasm32",
            "compiler" => "msvc, mingw, clang, gnu",
            "step" => "configure, build",
            "key=value" => "<key>=<value>",
            _ => "",
        };
        BuildError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::InvalidValue { .. }
            | BuildError::UnknownKey { .. }
            | BuildError::MissingKey { .. }
            | BuildError::UnsupportedCompiler { .. }
            | BuildError::UnsupportedArch { .. }
            | BuildError::MissingAndroidHome => ErrorKind::Configuration,
            BuildError::ProcessFailed { .. } => ErrorKind::Process,
            BuildError::ArtifactNotFound { .. }
            | BuildError::InvalidArtifactPattern { .. }
            | BuildError::LicenseMissing { .. } => ErrorKind::Discovery,
        }
    }
}
