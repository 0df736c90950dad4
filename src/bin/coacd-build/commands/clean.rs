//! `coacd-build clean` command

use anyhow::Result;

use super::Session;
use coacd_build::util::fs::remove_dir_all_if_exists;

pub fn execute(session: &Session) -> Result<()> {
    let build_dir = session.build_dir();

    remove_dir_all_if_exists(&build_dir)?;
    eprintln!("     Removed {}", build_dir.display());

    Ok(())
}
