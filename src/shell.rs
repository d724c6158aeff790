//! Running the external build command.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{BuildError, BuildResult};
use crate::project::BuildContext;

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
  /// Executable to run.
  pub program: String,
  /// Arguments passed to the executable.
  pub args: Vec<String>,
  /// Working directory of the process.
  pub cwd: PathBuf,
}

impl ShellCommand {
  /// Create a command running `program` inside `cwd`.
  pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.as_ref().to_path_buf(),
    }
  }

  /// Append one argument.
  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// The `meteor build` invocation producing the bundle for `context`.
  pub fn meteor_build(context: &BuildContext) -> Self {
    let mut command = Self::new(&context.layout.build_program, &context.project_dir)
      .arg("build")
      .arg(context.output_dir().to_string_lossy())
      .arg("--directory");
    if let Some(url) = context.options.server_url() {
      command = command.arg("--server").arg(url);
    }
    command
  }
}

impl fmt::Display for ShellCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {arg}")?;
    }
    Ok(())
  }
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Standard output, lossily decoded.
  pub stdout: String,
  /// Standard error, lossily decoded.
  pub stderr: String,
}

/// Trait describing how external commands are executed.
pub trait CommandRunner {
  /// Run `command` to completion, failing unless it exits successfully.
  fn run(&self, command: &ShellCommand) -> BuildResult<CommandOutput>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, command: &ShellCommand) -> BuildResult<CommandOutput> {
    log::info!("running `{command}` in {}", command.cwd.display());

    let output = Command::new(&command.program)
      .args(&command.args)
      .current_dir(&command.cwd)
      .output()
      .map_err(|source| BuildError::Spawn {
        command: command.to_string(),
        source,
      })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
      return Err(BuildError::Process {
        command: command.to_string(),
        status: output.status,
        stderr: stderr.trim().to_string(),
      });
    }

    if !stderr.trim().is_empty() {
      log::debug!("`{command}` stderr:\n{}", stderr.trim_end());
    }
    Ok(CommandOutput { stdout, stderr })
  }
}
