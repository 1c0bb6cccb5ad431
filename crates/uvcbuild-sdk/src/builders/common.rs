//! Command execution shared by the builders.
//!
//! External tools are described as [`Invocation`] values and executed through
//! a [`CommandRunner`]. [`SystemRunner`] spawns real processes;
//! [`DryRunRunner`] only prints what would run.

use std::path::PathBuf;
use std::process::Command;

use crate::types::BuildError;

/// One external command: program, arguments and working directory.
///
/// Arguments are passed to the program verbatim, without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Renders the command as a single line, quoting arguments that contain
    /// spaces. Intended for display only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("\"{}\"", part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Executes invocations and reports their exit status.
///
/// Implementations block until the command finishes. A command that starts
/// and exits non-zero is not an error at this level; only failing to start it
/// is.
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<i32, BuildError>;
}

/// Runs commands as child processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<i32, BuildError> {
        log::debug!(
            "running `{}` in {}",
            invocation.command_line(),
            invocation.cwd.display()
        );

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .map_err(|source| BuildError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        // Killed by a signal: no exit code, still a failure.
        let code = status.code().unwrap_or(-1);
        log::debug!("`{}` exited with {}", invocation.program, status);
        Ok(code)
    }
}

/// Prints each invocation instead of running it and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<i32, BuildError> {
        println!(
            "  [dry-run] (cd {}) {}",
            invocation.cwd.display(),
            invocation.command_line()
        );
        Ok(0)
    }
}
