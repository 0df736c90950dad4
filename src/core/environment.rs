//! The environment descriptor: everything one build invocation is told about
//! its target.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::errors::BuildError;
use crate::builder::tables::DEFAULT_NDK_VERSION;
use crate::core::platform::{Arch, Compiler, Platform};

/// Target parameters for a single build invocation.
///
/// Built once and never mutated by the resolver. Ancillary fields (the
/// Android SDK root and NDK version) are carried explicitly so that command
/// resolution never has to read process environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub platform: Platform,
    pub arch: Arch,
    pub compiler: Compiler,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android_home: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
}

impl Environment {
    /// Create an environment using the platform's default compiler.
    pub fn new(platform: Platform, arch: Arch) -> Self {
        Environment {
            platform,
            arch,
            compiler: platform.default_compiler(),
            android_home: None,
            ndk_version: None,
        }
    }

    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_android_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.android_home = Some(home.into());
        self
    }

    pub fn with_ndk_version(mut self, version: impl Into<String>) -> Self {
        self.ndk_version = Some(version.into());
        self
    }

    /// Parse the `key=value` form used on the engine build's command line,
    /// e.g. `["platform=android", "arch=arm64"]`.
    ///
    /// `platform` is required; `arch` and `compiler` fall back to the
    /// platform defaults. A later duplicate key overrides an earlier one.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut platform = None;
        let mut arch = None;
        let mut compiler = None;
        let mut android_home = None;
        let mut ndk_version = None;

        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| BuildError::invalid_value("key=value", pair))?;

            match key {
                "platform" => platform = Some(value.parse::<Platform>()?),
                "arch" => arch = Some(value.parse::<Arch>()?),
                "compiler" => compiler = Some(value.parse::<Compiler>()?),
                "ANDROID_HOME" => android_home = Some(PathBuf::from(value)),
                "ndk_version" => ndk_version = Some(value.to_string()),
                _ => {
                    return Err(BuildError::UnknownKey {
                        key: key.to_string(),
                    })
                }
            }
        }

        let platform = platform.ok_or_else(|| BuildError::MissingKey {
            key: "platform".to_string(),
        })?;

        Ok(Environment {
            platform,
            arch: arch.unwrap_or_else(|| platform.default_arch()),
            compiler: compiler.unwrap_or_else(|| platform.default_compiler()),
            android_home,
            ndk_version,
        })
    }

    /// NDK version, falling back to the pinned default.
    pub fn ndk_version(&self) -> &str {
        self.ndk_version.as_deref().unwrap_or(DEFAULT_NDK_VERSION)
    }

    /// Android SDK root, if one was supplied.
    pub fn android_home(&self) -> Option<&Path> {
        self.android_home.as_deref()
    }

    /// Short label for logs and reports.
    pub fn label(&self) -> String {
        format!("{}-{}-{}", self.platform, self.arch, self.compiler)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "platform={} arch={} compiler={}",
            self.platform, self.arch, self.compiler
        )
    }
}
