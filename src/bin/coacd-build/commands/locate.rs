//! `coacd-build locate` command

use anyhow::Result;

use super::Session;
use crate::cli::LocateArgs;
use coacd_build::builder::artifacts::{find_artifact_dir, find_libraries};

pub fn execute(session: &Session, args: LocateArgs) -> Result<()> {
    let env = session.environment(&args.target)?;
    let build_dir = args
        .build_dir
        .map(|dir| session.ctx.cwd().join(dir))
        .unwrap_or_else(|| session.build_dir());

    if args.libraries {
        for lib in find_libraries(&build_dir, &env)? {
            println!("{}", lib.path.display());
        }
    } else {
        let dir = find_artifact_dir(&build_dir, &env, &args.prefix)?;
        println!("{}", dir.display());
    }

    Ok(())
}
