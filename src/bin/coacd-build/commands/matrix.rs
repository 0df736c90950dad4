//! `coacd-build matrix` command

use anyhow::{bail, Result};

use super::Session;
use crate::cli::MatrixArgs;
use coacd_build::core::platform::{Arch, Platform};
use coacd_build::ops::coacd_build::BuildOptions;
use coacd_build::ops::test_matrix::{default_matrix, run_matrix, MatrixFile};
use coacd_build::Environment;

pub fn execute(session: &Session, args: MatrixArgs) -> Result<()> {
    let file = match args.file {
        Some(ref path) => MatrixFile::load(&session.ctx.cwd().join(path))?,
        None => MatrixFile {
            target: default_matrix(),
        },
    };

    // Android settings are shared by every round
    let mut base = Environment::new(Platform::Android, Arch::Arm64);
    base.android_home = args
        .android_home
        .clone()
        .or_else(|| session.config.android.home.clone());
    base.ndk_version = session.config.android.ndk_version.clone();

    let envs = file.environments(&base);

    let opts = BuildOptions {
        source_dir: session.source_dir(),
        build_dir: session.build_dir(),
        plan: args.plan,
        jobs: session.jobs(args.jobs),
        echo: session.ctx.is_verbose(),
        ..BuildOptions::default()
    };

    let report = run_matrix(&envs, &opts);
    print!("{}", report.summary());

    if !report.all_passed() {
        bail!("{} of {} targets failed", report.failed.len(), envs.len());
    }

    Ok(())
}
