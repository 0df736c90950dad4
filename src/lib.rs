//! coacd-build - build orchestration for the CoACD native library
//!
//! This crate turns a target description (platform, architecture,
//! compiler) into the CMake command lines that build CoACD, runs them,
//! and collects the libraries and third-party licenses the plugin ships.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use crate::builder::{
    resolve, resolve_plan, BuildError, BuildPlan, CommandLine, ResolveOptions,
};
pub use crate::core::{Arch, Compiler, Environment, Platform, Step};
pub use crate::util::context::GlobalContext;
