//! Core data structures for coacd-build.
//!
//! - Platform, architecture and compiler identifiers
//! - The build environment that ties them together

pub mod environment;
pub mod platform;

pub use environment::Environment;
pub use platform::{Arch, Compiler, Platform, PlatformFamily, Step};
