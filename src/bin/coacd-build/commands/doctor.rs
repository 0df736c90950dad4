//! `coacd-build doctor` command

use anyhow::Result;

use super::Session;
use crate::cli::DoctorArgs;
use coacd_build::ops::doctor::{doctor, format_report};

pub fn execute(session: &Session, args: DoctorArgs) -> Result<()> {
    let env = session.environment(&args.target)?;
    let report = doctor(&env, &session.source_dir());

    print!("{}", format_report(&report, session.ctx.is_verbose()));

    // Exit with error code if any check failed
    if !report.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}
