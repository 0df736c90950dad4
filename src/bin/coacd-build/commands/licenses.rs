//! `coacd-build licenses` command

use anyhow::Result;

use super::Session;
use crate::cli::LicensesArgs;
use coacd_build::builder::licenses::collect_licenses;

pub fn execute(session: &Session, args: LicensesArgs) -> Result<()> {
    let destination = session.ctx.cwd().join(args.destination);
    let copied = collect_licenses(&session.build_dir(), &destination)?;

    for path in &copied {
        eprintln!("      Copied {}", path.display());
    }
    eprintln!("    Finished {} license files", copied.len());

    Ok(())
}
