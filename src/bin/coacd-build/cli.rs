//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use coacd_build::core::platform::Step;

/// coacd-build - build CoACD for every platform the plugin ships on
#[derive(Parser)]
#[command(name = "coacd-build")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// CoACD source directory (overrides `[build] source_dir`)
    #[arg(long, global = true)]
    pub source_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure and build CoACD
    Build(BuildArgs),

    /// Print the command line for one build step
    Resolve(ResolveArgs),

    /// Find build outputs for a target
    Locate(LocateArgs),

    /// Copy third-party licenses into a plugin directory
    Licenses(LicensesArgs),

    /// Build a list of targets one after another
    Matrix(MatrixArgs),

    /// Check that the tools a target needs are installed
    Doctor(DoctorArgs),

    /// Remove the build directory
    Clean,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Target description shared by every command that builds something.
#[derive(Args, Clone)]
pub struct TargetArgs {
    /// Build parameters as key=value (platform, arch, compiler, ANDROID_HOME, ndk_version)
    #[arg(value_name = "KEY=VALUE")]
    pub pairs: Vec<String>,

    /// Android SDK root
    #[arg(long, env = "ANDROID_HOME", hide_env_values = true)]
    pub android_home: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Remove the build directory instead of building
    #[arg(long, conflicts_with_all = ["skip", "plan"])]
    pub clean: bool,

    /// Do nothing; a previous build is reused
    #[arg(long)]
    pub skip: bool,

    /// Emit the resolved commands as JSON (no build)
    #[arg(long)]
    pub plan: bool,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Plugin directory that receives third-party licenses
    #[arg(long, value_name = "DIR")]
    pub licenses: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Step to resolve
    pub step: Step,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Print the tokens as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct LocateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Artifact directory prefix
    #[arg(long, default_value = "tbb")]
    pub prefix: String,

    /// Build directory to search (defaults to the configured one)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// List every static library instead of the artifact directory
    #[arg(long)]
    pub libraries: bool,
}

#[derive(Args)]
pub struct LicensesArgs {
    /// Plugin directory to copy into
    pub destination: PathBuf,
}

#[derive(Args)]
pub struct MatrixArgs {
    /// Matrix file with [[target]] tables (defaults to the built-in matrix)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Resolve every target without running the tools
    #[arg(long)]
    pub plan: bool,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Android SDK root
    #[arg(long, env = "ANDROID_HOME", hide_env_values = true)]
    pub android_home: Option<PathBuf>,
}

#[derive(Args)]
pub struct DoctorArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
