//! Shared test utilities for the packager crate.

use crate::command::{CommandExecutor, ToolCommand};
use crate::config::{BINARY_NAME, BuildConfig, BuildFlags};
use crate::platform::HostOs;
use crate::target::TargetTriple;
use camino::Utf8PathBuf;
use std::cell::RefCell;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code.unsigned_abs())
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    stdout_output("")
}

/// Creates a successful command `Output` with the given stdout.
#[must_use]
pub fn stdout_output(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Builds a `BuildConfig` for `workspace` without reading a manifest.
///
/// # Panics
///
/// Panics if `target` is not a well-formed triple.
#[must_use]
pub fn test_config(workspace: Utf8PathBuf, os: HostOs, target: &str) -> BuildConfig {
    BuildConfig {
        os,
        target: TargetTriple::try_from(target)
            .unwrap_or_else(|err| panic!("test target must be valid: {err}")),
        flags: BuildFlags::default(),
        output_dir: workspace.join("output"),
        workspace,
        binary: BINARY_NAME,
        version: "0.1.0".to_owned(),
        output_file: None,
        skip_deps: false,
        verbosity: 0,
    }
}

#[derive(Debug)]
enum Scripted {
    Output(Output),
    SpawnError,
}

/// A `CommandExecutor` that records invocations instead of running them.
///
/// Every command succeeds with empty output unless a response has been
/// scripted for a program whose name ends with the given suffix. Matching
/// on the suffix lets tests target the built binary by its file name.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: RefCell<Vec<ToolCommand>>,
    scripted: Vec<(String, Scripted)>,
}

impl RecordingExecutor {
    /// Create an executor where every command succeeds silently.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `output` for programs ending with `program_suffix`.
    #[must_use]
    pub fn with_output(mut self, program_suffix: &str, output: Output) -> Self {
        self.scripted
            .push((program_suffix.to_owned(), Scripted::Output(output)));
        self
    }

    /// Fail to spawn programs ending with `program_suffix`.
    #[must_use]
    pub fn with_spawn_error(mut self, program_suffix: &str) -> Self {
        self.scripted
            .push((program_suffix.to_owned(), Scripted::SpawnError));
        self
    }

    /// All commands run so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.borrow().clone()
    }

    /// The rendered command lines run so far.
    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, command: &ToolCommand) -> std::io::Result<Output> {
        self.calls.borrow_mut().push(command.clone());
        let scripted = self
            .scripted
            .iter()
            .find(|(suffix, _)| command.program.ends_with(suffix.as_str()));
        match scripted {
            Some((_, Scripted::Output(output))) => Ok(output.clone()),
            Some((_, Scripted::SpawnError)) => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", command.program),
            )),
            None => Ok(success_output()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_accepts_two_segment_target() {
        let config = test_config(Utf8PathBuf::from("/w"), HostOs::Linux, "wasm32-wasip1");
        assert_eq!(config.target.as_str(), "wasm32-wasip1");
        assert_eq!(config.output_dir, "/w/output");
    }

    #[test]
    #[should_panic(expected = "test target must be valid")]
    fn test_config_panics_on_malformed_target() {
        let _config = test_config(Utf8PathBuf::from("/w"), HostOs::Linux, "musl");
    }
}
