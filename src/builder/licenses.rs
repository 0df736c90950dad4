//! Third-party license collection.
//!
//! The plugin ships the licenses of everything CoACD pulls in. The layout
//! under the build directory is fixed by CoACD's dependency fetch, so the
//! table is hard-coded.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::errors::BuildError;
use crate::util::fs::{copy_file, ensure_dir};

/// Directory created under the destination root.
pub const THIRD_PARTY_DIR_NAME: &str = "third-party-licenses";

/// Dependency name and its license files, relative to the CMake build
/// directory the dependencies were fetched into.
pub const THIRD_PARTY_LICENSES: &[(&str, &[&str])] = &[
    ("boost", &["_deps/boost-src/LICENSE_1_0.txt"]),
    ("openvdb", &["_deps/openvdb-src/LICENSE"]),
    ("spdlog", &["_deps/spdlog-src/LICENSE"]),
    (
        "tbb",
        &[
            "_deps/tbb-src/LICENSE.txt",
            "_deps/tbb-src/third-party-programs.txt",
        ],
    ),
];

struct LicenseCopy {
    src: PathBuf,
    dst: PathBuf,
}

/// Copy every license in [`THIRD_PARTY_LICENSES`] from `build_root` into
/// `destination_root/third-party-licenses/<dependency>/<file name>`.
///
/// All sources are checked before the first copy, so a missing file leaves
/// the destination untouched. Existing files are overwritten. Returns the
/// written paths in table order.
pub fn collect_licenses(build_root: &Path, destination_root: &Path) -> Result<Vec<PathBuf>> {
    let third_party_dir = destination_root.join(THIRD_PARTY_DIR_NAME);

    let mut copies = Vec::new();
    for (dependency, files) in THIRD_PARTY_LICENSES {
        for file in *files {
            let src = build_root.join(file);
            if !src.is_file() {
                return Err(BuildError::LicenseMissing {
                    dependency: dependency.to_string(),
                    path: src,
                }
                .into());
            }
            // Table entries always end in a file name.
            let name = Path::new(file).file_name().unwrap_or_default();
            copies.push(LicenseCopy {
                dst: third_party_dir.join(dependency).join(name),
                src,
            });
        }
    }

    ensure_dir(&third_party_dir)?;
    for copy in &copies {
        copy_file(&copy.src, &copy.dst)?;
        tracing::debug!("copied {} -> {}", copy.src.display(), copy.dst.display());
    }

    tracing::info!(
        "collected {} license file(s) into {}",
        copies.len(),
        third_party_dir.display()
    );

    Ok(copies.into_iter().map(|c| c.dst).collect())
}
