//! coacd-build CLI - cross-platform CMake orchestration for CoACD

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use coacd_build::BuildError;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(help) = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<BuildError>())
            .and_then(|err| err.help())
        {
            eprintln!("help: {}", help);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("coacd_build=debug")
    } else {
        EnvFilter::new("coacd_build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let session = commands::Session::new(cli.source_dir, cli.verbose)?;

    match cli.command {
        Commands::Build(args) => commands::build::execute(&session, args),
        Commands::Resolve(args) => commands::resolve::execute(&session, args),
        Commands::Locate(args) => commands::locate::execute(&session, args),
        Commands::Licenses(args) => commands::licenses::execute(&session, args),
        Commands::Matrix(args) => commands::matrix::execute(&session, args),
        Commands::Doctor(args) => commands::doctor::execute(&session, args),
        Commands::Clean => commands::clean::execute(&session),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
