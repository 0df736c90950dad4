//! `coacd-build resolve` command

use anyhow::Result;

use super::Session;
use crate::cli::ResolveArgs;
use coacd_build::builder::resolver::{resolve, ResolveOptions};

pub fn execute(session: &Session, args: ResolveArgs) -> Result<()> {
    let env = session.environment(&args.target)?;
    let opts = ResolveOptions {
        jobs: session.jobs(args.jobs),
    };

    let command = resolve(args.step, &env, &opts)?;

    if args.json {
        println!("{}", serde_json::to_string(&command)?);
    } else {
        println!("{}", command);
    }

    Ok(())
}
