//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{anyhow, Context, Result};

use crate::builder::errors::BuildError;
use crate::builder::resolver::CommandLine;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    echo: bool,
}

/// Output of a streamed process.
#[derive(Debug, Clone)]
pub struct StreamedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl StreamedOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            echo: true,
        }
    }

    /// Create a process builder from a resolved command line.
    pub fn from_command_line(command: &CommandLine) -> Result<Self> {
        let program = command
            .program()
            .ok_or_else(|| anyhow!("cannot execute an empty command line"))?;
        Ok(ProcessBuilder::new(program).args(command.args()))
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Mirror the child's output to our stdout/stderr while it runs.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Run the command, streaming stdout and stderr line by line.
    ///
    /// Each stream is drained by its own thread into its own buffer, so a
    /// chatty child cannot block on a full pipe. Both readers are joined
    /// before this returns.
    pub fn exec_streaming(&self) -> Result<StreamedOutput> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("running `{}`", self.display_command());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout of `{}` was not captured", self.program.display()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("stderr of `{}` was not captured", self.program.display()))?;

        let echo = self.echo;
        let (stdout, stderr) = thread::scope(|s| {
            let out = s.spawn(move || pump(stdout, echo.then(io::stdout)));
            let err = s.spawn(move || pump(stderr, echo.then(io::stderr)));
            (join(out), join(err))
        });

        let status = child
            .wait()
            .with_context(|| format!("failed to wait for `{}`", self.program.display()))?;

        Ok(StreamedOutput {
            status,
            stdout: stdout?,
            stderr: stderr?,
        })
    }

    /// Run the command and require a zero exit status.
    ///
    /// On failure the error carries the child's captured stderr verbatim.
    pub fn exec_streaming_and_check(&self) -> Result<StreamedOutput> {
        let output = self.exec_streaming()?;
        if !output.success() {
            return Err(BuildError::ProcessFailed {
                command: self.display_command(),
                code: output.status.code(),
                stderr: output.stderr,
            }
            .into());
        }
        Ok(output)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Copy `reader` line by line into a buffer, mirroring to `sink` if given.
fn pump<R: Read, W: Write>(reader: R, mut sink: Option<W>) -> io::Result<String> {
    let mut reader = BufReader::new(reader);
    let mut captured = String::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&line);
        if let Some(ref mut sink) = sink {
            sink.write_all(text.as_bytes())?;
            sink.flush()?;
        }
        captured.push_str(&text);
    }

    Ok(captured)
}

fn join(handle: thread::ScopedJoinHandle<'_, io::Result<String>>) -> Result<String> {
    handle
        .join()
        .map_err(|_| anyhow!("output reader thread panicked"))?
        .context("failed to read child output")
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find CMake.
pub fn find_cmake() -> Option<PathBuf> {
    find_executable("cmake")
}
