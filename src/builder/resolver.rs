//! Command resolution.
//!
//! Turns an [`Environment`] into the exact configure and build command lines.
//! Nothing here touches the filesystem or the process environment, so the
//! same inputs always yield the same tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builder::errors::BuildError;
use crate::builder::tables::{
    compiler_entry, platform_entry, process_prefix, supported_compilers, BUILD_CONFIG,
    BUILD_TARGET, COMMON_CMAKE_FLAGS,
};
use crate::core::environment::Environment;
use crate::core::platform::Step;

/// An ordered sequence of command-line tokens. The first token is the
/// program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    pub fn new(tokens: Vec<String>) -> Self {
        CommandLine(tokens)
    }

    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }
}

#[cfg(test)]
impl CommandLine {
    pub(crate) fn tokens(&self) -> &[String] {
        &self.0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `token` appears in the command line.
    pub(crate) fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// True if `first` is immediately followed by `second`.
    pub(crate) fn contains_pair(&self, first: &str, second: &str) -> bool {
        self.0.windows(2).any(|w| w[0] == first && w[1] == second)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Knobs that are not part of the target description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Parallel build jobs; `None` lets the native tool decide.
    pub jobs: Option<usize>,
}

/// Both command lines for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub environment: Environment,
    pub configure: CommandLine,
    pub build: CommandLine,
}

/// Resolve the command line for `step`.
///
/// Tokens are concatenated as
/// `[prefix] [tool verb] [common flags] [platform flags] [compiler flags] [step flags]`;
/// the common, platform and compiler groups belong to the configure step
/// only.
pub fn resolve(
    step: Step,
    env: &Environment,
    opts: &ResolveOptions,
) -> Result<CommandLine, BuildError> {
    let family = env.platform.family();

    // Both table entries are evaluated for either step: a target that cannot
    // be configured has no build command either.
    let compiler_fn = compiler_entry(family, env.compiler).ok_or_else(|| {
        let supported = supported_compilers(family)
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        BuildError::UnsupportedCompiler {
            platform: env.platform,
            compiler: env.compiler,
            supported: format!("supported compilers: {}", supported),
        }
    })?;
    let platform_flags = platform_entry(family)(env)?;
    let compiler_flags = compiler_fn(env)?;

    let mut tokens: Vec<String> = process_prefix(family, step)
        .iter()
        .map(|s| s.to_string())
        .collect();

    match step {
        Step::Configure => {
            tokens.extend(["cmake".to_string(), "..".to_string()]);
            tokens.extend(COMMON_CMAKE_FLAGS.iter().map(|s| s.to_string()));
            tokens.extend(platform_flags);
            tokens.extend(compiler_flags);
        }
        Step::Build => {
            tokens.extend(
                ["cmake", "--build", ".", "--target", BUILD_TARGET, "--config", BUILD_CONFIG]
                    .iter()
                    .map(|s| s.to_string()),
            );
            if let Some(jobs) = opts.jobs {
                tokens.push("--parallel".to_string());
                tokens.push(jobs.to_string());
            }
        }
    }

    let command = CommandLine::new(tokens);
    tracing::debug!("resolved {} for {}: {}", step, env.label(), command);
    Ok(command)
}

/// Resolve both steps.
pub fn resolve_plan(env: &Environment, opts: &ResolveOptions) -> Result<BuildPlan, BuildError> {
    Ok(BuildPlan {
        environment: env.clone(),
        configure: resolve(Step::Configure, env, opts)?,
        build: resolve(Step::Build, env, opts)?,
    })
}
