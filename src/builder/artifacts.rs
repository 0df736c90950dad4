//! Locating build outputs.
//!
//! Dependency build directories are named by the dependency's own build
//! (oneTBB, for instance, produces `tbb_<compiler>_<ver>_cxx20_64_mt_release`).
//! We do not control those names; we only pattern-match them.

use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use walkdir::WalkDir;

use crate::builder::errors::BuildError;
use crate::builder::tables::{arch_bits, library_extensions, runtime_tag, BUILD_CONFIG};
use crate::core::environment::Environment;
use crate::core::platform::Arch;
use crate::util::fs::glob_files;

/// Dependencies whose build directories carry the encoded-name convention.
pub const ENCODED_ARTIFACT_PREFIXES: &[&str] = &["tbb"];

/// Dependencies fetched into `_deps/` by the CoACD build.
pub const FETCHED_DEPENDENCIES: &[&str] = &["boost", "openvdb", "spdlog", "tbb"];

/// Directory holding fetched dependency trees, relative to the build root.
pub const DEPS_DIR: &str = "_deps";

/// A built library file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Path to the library file
    pub path: PathBuf,
    /// Library name (file stem)
    pub name: String,
}

/// Build the directory-name pattern
/// `<prefix>_<anything>_cxx<version>_<bits>_[<runtime>_]release`.
///
/// The runtime segment is required when `runtime` is given and forbidden
/// otherwise.
pub fn artifact_dir_pattern(
    prefix: &str,
    arch: Arch,
    runtime: Option<&str>,
) -> Result<Regex, BuildError> {
    let runtime = runtime
        .map(|tag| format!("{}_", regex::escape(tag)))
        .unwrap_or_default();
    let pattern = format!(
        r"^{}_.+_cxx\d+_{}_{}release$",
        regex::escape(prefix),
        arch_bits(arch),
        runtime
    );
    Regex::new(&pattern).map_err(|source| BuildError::InvalidArtifactPattern { pattern, source })
}

/// Find the build directory of the dependency named `prefix` under
/// `build_root`.
///
/// Only the immediate children of `build_root` are considered. If several
/// match, the first one in directory-scan order is returned.
pub fn find_artifact_dir(
    build_root: &Path,
    env: &Environment,
    prefix: &str,
) -> Result<PathBuf, BuildError> {
    let pattern = artifact_dir_pattern(prefix, env.arch, runtime_tag(env.compiler))?;

    let found = WalkDir::new(build_root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .find(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| pattern.is_match(name))
        });

    match found {
        Some(entry) => {
            tracing::debug!("found `{}` artifacts at {}", prefix, entry.path().display());
            Ok(entry.into_path())
        }
        None => Err(BuildError::ArtifactNotFound {
            root: build_root.to_path_buf(),
            pattern: pattern.as_str().to_string(),
        }),
    }
}

/// Directories to search for linkable libraries, in link-search order.
///
/// Every encoded-name dependency must be present; the fixed relative
/// locations are included only if they exist.
pub fn library_search_dirs(build_root: &Path, env: &Environment) -> Result<Vec<PathBuf>> {
    let mut dirs = vec![build_root.join(BUILD_CONFIG), build_root.to_path_buf()];

    for prefix in ENCODED_ARTIFACT_PREFIXES {
        dirs.push(find_artifact_dir(build_root, env, prefix)?);
    }

    for dep in FETCHED_DEPENDENCIES {
        let dep_build = build_root.join(DEPS_DIR).join(format!("{}-build", dep));
        dirs.push(dep_build.join(BUILD_CONFIG));
        dirs.push(dep_build);
    }

    Ok(dirs.into_iter().filter(|d| d.is_dir()).collect())
}

/// Library files in the search directories for `env`, sorted by path.
pub fn find_libraries(build_root: &Path, env: &Environment) -> Result<Vec<Artifact>> {
    let patterns: Vec<String> = library_extensions(env)
        .iter()
        .map(|ext| format!("*.{}", ext))
        .collect();

    let mut artifacts = Vec::new();
    for dir in library_search_dirs(build_root, env)? {
        for path in glob_files(&dir, &patterns)? {
            let name = path
                .file_stem()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            artifacts.push(Artifact { path, name });
        }
    }

    artifacts.sort_by(|a, b| a.path.cmp(&b.path));
    artifacts.dedup();
    Ok(artifacts)
}
