//! High-level operations.
//!
//! This module contains the implementation of coacd-build commands.

pub mod coacd_build;
pub mod doctor;
pub mod test_matrix;

pub use coacd_build::{build, BuildOptions, BuildResult};
pub use doctor::{doctor, format_report, DoctorReport};
pub use test_matrix::{default_matrix, run_matrix, MatrixFile, MatrixReport, MatrixTarget};
