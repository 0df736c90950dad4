//! `coacd-build build` command

use anyhow::Result;

use super::Session;
use crate::cli::BuildArgs;
use coacd_build::ops::coacd_build::{build, BuildOptions};

pub fn execute(session: &Session, args: BuildArgs) -> Result<()> {
    let env = session.environment(&args.target)?;

    // Licenses: CLI > config; relative paths are taken from the cwd
    let plugin_dir = args
        .licenses
        .map(|dir| session.ctx.cwd().join(dir))
        .or_else(|| {
            session
                .config
                .build
                .plugin_dir
                .as_ref()
                .map(|dir| session.ctx.project_root().join(dir))
        });

    let opts = BuildOptions {
        source_dir: session.source_dir(),
        build_dir: session.build_dir(),
        clean: args.clean,
        skip: args.skip,
        plan: args.plan,
        jobs: session.jobs(args.jobs),
        plugin_dir,
        echo: true,
    };

    let result = build(&env, &opts)?;

    if args.plan {
        if let Some(ref plan) = result.plan {
            println!("{}", serde_json::to_string_pretty(plan)?);
        }
        return Ok(());
    }

    if result.plan.is_some() {
        for lib in &result.libraries {
            eprintln!("    Finished `{}` -> {}", lib.name, lib.path.display());
        }
        for license in &result.licenses {
            eprintln!("      Copied {}", license.display());
        }
    }

    Ok(())
}
