//! CLI integration tests for coacd-build.
//!
//! None of these need CMake: they exercise resolution, discovery and
//! license collection against scratch directories.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the coacd-build binary command, isolated from the user's setup.
fn coacd_build(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("coacd-build").unwrap();
    cmd.current_dir(cwd)
        .env("HOME", cwd.join("home"))
        .env_remove("ANDROID_HOME");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Lay out a build directory with every third-party license file.
fn write_license_tree(build_dir: &Path) {
    for file in [
        "_deps/boost-src/LICENSE_1_0.txt",
        "_deps/openvdb-src/LICENSE",
        "_deps/spdlog-src/LICENSE",
        "_deps/tbb-src/LICENSE.txt",
        "_deps/tbb-src/third-party-programs.txt",
    ] {
        let path = build_dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, file).unwrap();
    }
}

// ============================================================================
// coacd-build resolve
// ============================================================================

#[test]
fn test_resolve_windows_configure() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["resolve", "configure", "platform=windows", "arch=x86_64"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cmake .."))
        .stdout(predicate::str::contains("-A x64"))
        .stdout(predicate::str::contains("-DCMAKE_MSVC_RUNTIME_LIBRARY=MultiThreaded"));
}

#[test]
fn test_resolve_build_with_jobs() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["resolve", "build", "platform=linux", "-j", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "cmake --build . --target main --config Release --parallel 4",
        ));
}

#[test]
fn test_resolve_android_uses_env_home() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["resolve", "configure", "platform=android", "arch=arm64"])
        .env("ANDROID_HOME", "/opt/sdk")
        .assert()
        .success()
        .stdout(predicate::str::contains("-G Ninja"))
        .stdout(predicate::str::contains("-DANDROID_ABI=arm64-v8a"))
        .stdout(predicate::str::contains("-DANDROID_PLATFORM=android-21"))
        .stdout(predicate::str::contains("ndk/28.1.13356709"));
}

#[test]
fn test_resolve_android_without_home_fails() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["resolve", "configure", "platform=android", "arch=arm64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ANDROID_HOME is not set"));
}

#[test]
fn test_resolve_web_json() {
    let tmp = temp_dir();

    let output = coacd_build(tmp.path())
        .args(["resolve", "build", "platform=web", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tokens: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(&tokens[..3], ["cmd", "/c", "emmake"]);
    assert!(tokens.contains(&"--build".to_string()));
}

#[test]
fn test_resolve_unsupported_compiler_fails() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["resolve", "configure", "platform=linux", "compiler=msvc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"))
        .stderr(predicate::str::contains("help: supported compilers"));
}

#[test]
fn test_resolve_build_step_rejects_unsupported_arch() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["resolve", "build", "platform=windows", "arch=arm32"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("architecture `arm32`"));
}

#[test]
fn test_resolve_unknown_key_fails() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["resolve", "configure", "platform=linux", "target=debug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown build parameter `target`"));
}

#[test]
fn test_resolve_uses_project_defaults() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("coacd-build.toml"),
        "[defaults]\nplatform = \"windows\"\narch = \"x86_32\"\n",
    )
    .unwrap();

    // Command-line pairs win over the config defaults
    coacd_build(tmp.path())
        .args(["resolve", "configure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-A Win32"));

    coacd_build(tmp.path())
        .args(["resolve", "configure", "arch=arm64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-A ARM64"));
}

// ============================================================================
// coacd-build build
// ============================================================================

#[test]
fn test_build_plan_emits_json() {
    let tmp = temp_dir();

    let output = coacd_build(tmp.path())
        .args(["build", "platform=windows", "compiler=mingw", "--plan"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["environment"]["compiler"], "mingw");
    let configure = plan["configure"].as_array().unwrap();
    assert!(configure.iter().any(|t| t == "MinGW Makefiles"));
}

#[test]
fn test_build_without_sources_fails() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["build", "platform=linux"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no CMakeLists.txt"));
}

#[test]
fn test_build_skip_succeeds_without_sources() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["build", "platform=linux", "--skip"])
        .assert()
        .success();
}

#[test]
fn test_build_clean_removes_build_dir() {
    let tmp = temp_dir();
    let build_dir = tmp.path().join("CoACD/build");
    fs::create_dir_all(build_dir.join("CMakeFiles")).unwrap();

    coacd_build(tmp.path())
        .args(["--source-dir", "CoACD", "build", "platform=linux", "--clean"])
        .assert()
        .success();

    assert!(!build_dir.exists());
}

// ============================================================================
// coacd-build locate
// ============================================================================

#[test]
fn test_locate_finds_tbb_dir() {
    let tmp = temp_dir();
    let build_dir = tmp.path().join("build");
    fs::create_dir_all(build_dir.join("tbb_msvc_cxx11_64_md_release")).unwrap();
    fs::create_dir_all(build_dir.join("tbb_msvc_cxx11_64_mt_release")).unwrap();

    coacd_build(tmp.path())
        .args(["locate", "platform=windows", "arch=x86_64", "--build-dir", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tbb_msvc_cxx11_64_mt_release"));
}

#[test]
fn test_locate_missing_dir_fails() {
    let tmp = temp_dir();
    fs::create_dir_all(tmp.path().join("build")).unwrap();

    coacd_build(tmp.path())
        .args(["locate", "platform=linux", "--build-dir", "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no artifact directory matching"));
}

// ============================================================================
// coacd-build licenses
// ============================================================================

#[test]
fn test_licenses_copies_files() {
    let tmp = temp_dir();
    write_license_tree(&tmp.path().join("CoACD/build"));

    coacd_build(tmp.path())
        .args(["--source-dir", "CoACD", "licenses", "plugin"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Finished 5 license files"));

    let licenses = tmp.path().join("plugin/third-party-licenses");
    assert_eq!(
        fs::read_to_string(licenses.join("boost/LICENSE_1_0.txt")).unwrap(),
        "_deps/boost-src/LICENSE_1_0.txt"
    );
    assert!(licenses.join("tbb/third-party-programs.txt").is_file());
}

#[test]
fn test_licenses_follow_configured_build_dir() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("coacd-build.toml"),
        "[build]\nsource_dir = \"CoACD\"\nbuild_dir = \"build-android\"\n",
    )
    .unwrap();
    write_license_tree(&tmp.path().join("CoACD/build-android"));
    // A stale default tree must not be picked up
    fs::create_dir_all(tmp.path().join("CoACD/build/_deps/boost-src")).unwrap();
    fs::write(
        tmp.path().join("CoACD/build/_deps/boost-src/LICENSE_1_0.txt"),
        "stale",
    )
    .unwrap();

    coacd_build(tmp.path())
        .args(["licenses", "plugin"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(tmp.path().join("plugin/third-party-licenses/boost/LICENSE_1_0.txt"))
            .unwrap(),
        "_deps/boost-src/LICENSE_1_0.txt"
    );
}

#[test]
fn test_licenses_missing_file_writes_nothing() {
    let tmp = temp_dir();
    let build_dir = tmp.path().join("CoACD/build");
    write_license_tree(&build_dir);
    fs::remove_file(build_dir.join("_deps/spdlog-src/LICENSE")).unwrap();

    coacd_build(tmp.path())
        .args(["--source-dir", "CoACD", "licenses", "plugin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("license file for `spdlog` not found"));

    assert!(!tmp.path().join("plugin/third-party-licenses").exists());
}

// ============================================================================
// coacd-build matrix
// ============================================================================

#[test]
fn test_matrix_plan_default() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["matrix", "--plan"])
        .env("ANDROID_HOME", "/opt/sdk")
        .assert()
        .success()
        .stdout(predicate::str::contains("Passed (8):"))
        .stdout(predicate::str::contains("Failed (0):"));
}

#[test]
fn test_matrix_plan_keeps_build_tree() {
    let tmp = temp_dir();
    let build_dir = tmp.path().join("CoACD/build");
    fs::create_dir_all(&build_dir).unwrap();
    fs::write(build_dir.join("CMakeCache.txt"), "").unwrap();

    coacd_build(tmp.path())
        .args(["--source-dir", "CoACD", "matrix", "--plan"])
        .env("ANDROID_HOME", "/opt/sdk")
        .assert()
        .success();

    assert!(build_dir.join("CMakeCache.txt").is_file());
}

#[test]
fn test_matrix_reports_failures() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("matrix.toml"),
        r#"
[[target]]
platform = "linux"

[[target]]
platform = "android"
arch = "arm64"
"#,
    )
    .unwrap();

    coacd_build(tmp.path())
        .args(["matrix", "--plan", "--file", "matrix.toml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Passed (1):"))
        .stdout(predicate::str::contains("Failed (1):"))
        .stderr(predicate::str::contains("1 of 2 targets failed"));
}

// ============================================================================
// coacd-build clean / completions
// ============================================================================

#[test]
fn test_clean_uses_configured_source_dir() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("coacd-build.toml"),
        "[build]\nsource_dir = \"deps/CoACD\"\n",
    )
    .unwrap();
    let build_dir = tmp.path().join("deps/CoACD/build");
    fs::create_dir_all(&build_dir).unwrap();

    coacd_build(tmp.path())
        .arg("clean")
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed"));

    assert!(!build_dir.exists());
}

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();

    coacd_build(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("coacd-build"));
}
