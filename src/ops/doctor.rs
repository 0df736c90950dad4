//! Toolchain health checks for a target environment.
//!
//! `coacd-build doctor` verifies that the tools a given target needs are
//! installed before a long build is attempted.
//!
//! ## Checks Performed
//!
//! - CMake (always)
//! - Ninja and the NDK toolchain file (android)
//! - `mingw32-make` (windows + mingw)
//! - `cmd` and `emcmake` (web)
//! - A CoACD checkout with a CMakeLists.txt

use std::path::{Path, PathBuf};

use crate::builder::cmake::is_cmake_project;
use crate::core::environment::Environment;
use crate::core::platform::{Compiler, PlatformFamily};
use crate::util::process::find_executable;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool or file (if applicable)
    pub path: Option<PathBuf>,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: false,
            message: message.into(),
            path: None,
        }
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Environment the checks were run for
    pub environment: String,

    /// Individual check results
    pub checks: Vec<CheckResult>,
}

impl DoctorReport {
    /// Check if every check passed.
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }
}

/// Run all checks relevant to `env`.
pub fn doctor(env: &Environment, source_dir: &Path) -> DoctorReport {
    let mut report = DoctorReport {
        environment: env.to_string(),
        checks: Vec::new(),
    };

    for tool in required_tools(env) {
        report.checks.push(check_tool(tool));
    }

    if env.platform.family() == PlatformFamily::Android {
        report.checks.push(check_ndk(env));
    }

    report.checks.push(if is_cmake_project(source_dir) {
        CheckResult::pass("CoACD sources", "CMakeLists.txt found")
            .with_path(source_dir.to_path_buf())
    } else {
        CheckResult::fail(
            "CoACD sources",
            format!("no CMakeLists.txt in {}", source_dir.display()),
        )
    });

    report
}

/// Executables that must be on PATH to build `env`.
fn required_tools(env: &Environment) -> Vec<&'static str> {
    let mut tools = vec!["cmake"];
    match (env.platform.family(), env.compiler) {
        (PlatformFamily::Android, _) => tools.push("ninja"),
        (PlatformFamily::Windows, Compiler::Mingw) => tools.push("mingw32-make"),
        (PlatformFamily::Web, _) => tools.extend(["cmd", "emcmake", "emmake"]),
        _ => {}
    }
    tools
}

fn check_tool(name: &str) -> CheckResult {
    match find_executable(name) {
        Some(path) => CheckResult::pass(name, "found").with_path(path),
        None => CheckResult::fail(name, format!("`{}` not found in PATH", name)),
    }
}

fn check_ndk(env: &Environment) -> CheckResult {
    let Some(home) = env.android_home() else {
        return CheckResult::fail("Android NDK", "ANDROID_HOME is not set");
    };

    let toolchain = home
        .join(format!("ndk/{}", env.ndk_version()))
        .join("build/cmake/android.toolchain.cmake");

    if toolchain.is_file() {
        CheckResult::pass("Android NDK", format!("NDK {}", env.ndk_version())).with_path(toolchain)
    } else {
        CheckResult::fail(
            "Android NDK",
            format!("toolchain file not found: {}", toolchain.display()),
        )
    }
}

/// Format a doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    writeln!(output, "coacd-build doctor ({})", report.environment).unwrap();
    writeln!(output).unwrap();

    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        writeln!(output, "  {} {}", status, check.name).unwrap();

        if verbose || !check.passed {
            writeln!(output, "      {}", check.message).unwrap();
        }
        if verbose {
            if let Some(path) = &check.path {
                writeln!(output, "      Path: {}", path.display()).unwrap();
            }
        }
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Summary: {} passed, {} failed",
        report.checks.len() - report.failed_count(),
        report.failed_count()
    )
    .unwrap();

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{Arch, Platform};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_required_tools() {
        let android = Environment::new(Platform::Android, Arch::Arm64);
        assert_eq!(required_tools(&android), vec!["cmake", "ninja"]);

        let web = Environment::new(Platform::Web, Arch::Wasm32);
        assert_eq!(required_tools(&web), vec!["cmake", "cmd", "emcmake", "emmake"]);

        let msvc = Environment::new(Platform::Windows, Arch::X86_64);
        assert_eq!(required_tools(&msvc), vec!["cmake"]);
    }

    #[test]
    fn test_check_ndk() {
        let tmp = TempDir::new().unwrap();
        let env = Environment::new(Platform::Android, Arch::Arm64)
            .with_android_home(tmp.path())
            .with_ndk_version("28.1.13356709");

        assert!(!check_ndk(&env).passed);

        let toolchain = tmp
            .path()
            .join("ndk/28.1.13356709/build/cmake/android.toolchain.cmake");
        fs::create_dir_all(toolchain.parent().unwrap()).unwrap();
        fs::write(&toolchain, "").unwrap();

        let check = check_ndk(&env);
        assert!(check.passed);
        assert_eq!(check.path, Some(toolchain));
    }

    #[test]
    fn test_check_ndk_without_home() {
        let env = Environment::new(Platform::Android, Arch::Arm64);
        let check = check_ndk(&env);
        assert!(!check.passed);
        assert!(check.message.contains("ANDROID_HOME"));
    }

    #[test]
    fn test_doctor_reports_missing_sources() {
        let tmp = TempDir::new().unwrap();
        let env = Environment::new(Platform::Linux, Arch::X86_64);
        let report = doctor(&env, tmp.path());

        let sources = report
            .checks
            .iter()
            .find(|c| c.name == "CoACD sources")
            .unwrap();
        assert!(!sources.passed);
        assert!(!report.all_passed());

        let text = format_report(&report, false);
        assert!(text.contains("[!!] CoACD sources"));
        assert!(text.contains("platform=linux arch=x86_64 compiler=gnu"));
    }
}
