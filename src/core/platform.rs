//! Symbolic build parameters: platform, architecture, compiler and step.
//!
//! These are closed sets. Every lookup table in [`crate::builder::tables`]
//! matches on them exhaustively, so adding a variant is a compile error until
//! each table says what to do with it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::builder::errors::BuildError;

/// Target platform as named by the engine build (`platform=...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Macos,
    Linux,
    Windows,
    Android,
    Web,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Macos,
        Platform::Linux,
        Platform::Windows,
        Platform::Android,
        Platform::Web,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Macos => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Android => "android",
            Platform::Web => "web",
        }
    }

    /// The table family this platform is configured through.
    pub fn family(&self) -> PlatformFamily {
        match self {
            Platform::Macos | Platform::Linux => PlatformFamily::Unix,
            Platform::Windows => PlatformFamily::Windows,
            Platform::Android => PlatformFamily::Android,
            Platform::Web => PlatformFamily::Web,
        }
    }

    /// Compiler used when the caller does not name one.
    pub fn default_compiler(&self) -> Compiler {
        match self {
            Platform::Windows => Compiler::Msvc,
            Platform::Linux => Compiler::Gnu,
            Platform::Macos | Platform::Android | Platform::Web => Compiler::Clang,
        }
    }

    /// Architecture used when the caller does not name one.
    pub fn default_arch(&self) -> Arch {
        match self {
            Platform::Web => Arch::Wasm32,
            _ => Arch::X86_64,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| BuildError::invalid_value("platform", s))
    }
}

/// Platforms that share one set of configure flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    Unix,
    Android,
    Windows,
    Web,
}

impl PlatformFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformFamily::Unix => "unix",
            PlatformFamily::Android => "android",
            PlatformFamily::Windows => "windows",
            PlatformFamily::Web => "web",
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture (`arch=...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    X86_32,
    X86_64,
    Arm32,
    Arm64,
    Wasm32,
}

impl Arch {
    pub const ALL: [Arch; 5] = [
        Arch::X86_32,
        Arch::X86_64,
        Arch::Arm32,
        Arch::Arm64,
        Arch::Wasm32,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_32 => "x86_32",
            Arch::X86_64 => "x86_64",
            Arch::Arm32 => "arm32",
            Arch::Arm64 => "arm64",
            Arch::Wasm32 => "wasm32",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arch::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| BuildError::invalid_value("arch", s))
    }
}

/// Compiler family (`compiler=...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    Msvc,
    Mingw,
    Clang,
    Gnu,
}

impl Compiler {
    pub const ALL: [Compiler; 4] = [Compiler::Msvc, Compiler::Mingw, Compiler::Clang, Compiler::Gnu];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compiler::Msvc => "msvc",
            Compiler::Mingw => "mingw",
            Compiler::Clang => "clang",
            Compiler::Gnu => "gnu",
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compiler {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Compiler::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| BuildError::invalid_value("compiler", s))
    }
}

/// One invocation of the build generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Generate native build files (`cmake ..`).
    Configure,
    /// Drive the generated build files (`cmake --build .`).
    Build,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Configure => "configure",
            Step::Build => "build",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "configure" => Ok(Step::Configure),
            "build" => Ok(Step::Build),
            _ => Err(BuildError::invalid_value("step", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trip_names() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_platform_family() {
        assert_eq!(Platform::Macos.family(), PlatformFamily::Unix);
        assert_eq!(Platform::Linux.family(), PlatformFamily::Unix);
        assert_eq!(Platform::Windows.family(), PlatformFamily::Windows);
        assert_eq!(Platform::Android.family(), PlatformFamily::Android);
        assert_eq!(Platform::Web.family(), PlatformFamily::Web);
    }

    #[test]
    fn test_unknown_symbols_are_rejected() {
        let err = "beos".parse::<Platform>().unwrap_err();
        assert!(err.to_string().contains("platform"));
        assert!(err.to_string().contains("beos"));

        assert!("riscv64".parse::<Arch>().is_err());
        assert!("icc".parse::<Compiler>().is_err());
        assert!("install".parse::<Step>().is_err());
    }

    #[test]
    fn test_default_compiler() {
        assert_eq!(Platform::Windows.default_compiler(), Compiler::Msvc);
        assert_eq!(Platform::Linux.default_compiler(), Compiler::Gnu);
        assert_eq!(Platform::Android.default_compiler(), Compiler::Clang);
    }

    #[test]
    fn test_serde_names_match_cli_names() {
        let json = serde_json::to_string(&Arch::X86_64).unwrap();
        assert_eq!(json, "\"x86_64\"");
        let arch: Arch = serde_json::from_str("\"arm32\"").unwrap();
        assert_eq!(arch, Arch::Arm32);
    }
}
