//! External command description and execution.
//!
//! Every tool the packager drives (package manager, cargo, the freshly
//! built binary) is described by a [`ToolCommand`] and run through a
//! [`CommandExecutor`], so tests can observe the exact invocations without
//! spawning processes.

use crate::error::{PackagerError, Result};
use camino::Utf8PathBuf;
use std::fmt;
use std::process::{Command, Output, Stdio};

/// How a command's standard streams are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Stream output straight into the CI log.
    Inherit,
    /// Capture stdout and stderr into the returned [`Output`].
    Capture,
}

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program name or path.
    pub program: String,
    /// Arguments, each passed as a separate token.
    pub args: Vec<String>,
    /// Extra environment bindings.
    pub envs: Vec<(String, String)>,
    /// Working directory, if different from the current one.
    pub current_dir: Option<Utf8PathBuf>,
    /// Stream handling.
    pub stdio: StdioMode,
}

impl ToolCommand {
    /// Create a streaming command with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
            stdio: StdioMode::Inherit,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an environment binding.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Run in `dir`.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Capture output instead of streaming it.
    #[must_use]
    pub fn captured(mut self) -> Self {
        self.stdio = StdioMode::Capture;
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{key}={value} ")?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Run `command` to completion.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while spawning or waiting on the
    /// process. A non-zero exit is not an error at this level.
    fn run(&self, command: &ToolCommand) -> std::io::Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, command: &ToolCommand) -> std::io::Result<Output> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        cmd.envs(command.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }

        match command.stdio {
            StdioMode::Capture => cmd.stdin(Stdio::null()).output(),
            StdioMode::Inherit => {
                let status = cmd.status()?;
                Ok(Output {
                    status,
                    stdout: Vec::new(),
                    stderr: Vec::new(),
                })
            }
        }
    }
}

/// Run `command` and require a successful exit.
///
/// # Errors
///
/// Returns [`PackagerError::CommandSpawn`] if the process cannot start and
/// [`PackagerError::CommandFailed`] if it exits unsuccessfully.
pub fn run_checked(executor: &dyn CommandExecutor, command: &ToolCommand) -> Result<Output> {
    log::debug!("running {command}");
    let output = executor
        .run(command)
        .map_err(|source| PackagerError::CommandSpawn {
            program: command.program.clone(),
            source,
        })?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(PackagerError::CommandFailed {
            command: command.to_string(),
            status: output.status.to_string(),
        })
    }
}
