//! CMake build orchestration.
//!
//! Flag tables, command resolution, the CMake driver, and discovery of
//! what a finished build left behind.

pub mod artifacts;
pub mod cmake;
pub mod errors;
pub mod licenses;
pub mod resolver;
pub mod tables;

pub use artifacts::{find_artifact_dir, find_libraries, Artifact};
pub use cmake::CMakeBuilder;
pub use errors::{BuildError, ErrorKind};
pub use licenses::collect_licenses;
pub use resolver::{resolve, resolve_plan, BuildPlan, CommandLine, ResolveOptions};
