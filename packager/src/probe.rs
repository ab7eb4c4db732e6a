//! Best-effort `--version` probe of the freshly built binary.
//!
//! Cross-compiled binaries usually cannot run on the build host, so a
//! failed or silent probe is expected. [`probe_version`] returns a typed
//! result and [`report_probe`] turns any failure into a warning; nothing in
//! this module can fail the run.

use crate::command::{CommandExecutor, ToolCommand};
use crate::report::Reporter;
use camino::Utf8Path;
use thiserror::Error;

/// Why the version probe produced no usable output.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The binary could not be started.
    #[error("could not execute {path}: {source}")]
    Spawn {
        /// Path to the binary.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The binary ran but exited unsuccessfully.
    #[error("{path} --version exited with {status}")]
    NonZeroExit {
        /// Path to the binary.
        path: String,
        /// The exit status description.
        status: String,
    },

    /// The binary exited successfully but printed nothing on either stream.
    #[error("{path} --version printed nothing")]
    EmptyOutput {
        /// Path to the binary.
        path: String,
    },
}

/// Run `binary --version` and return its trimmed stdout.
///
/// Some binaries print their version on stderr; that stream is used when
/// stdout is blank.
///
/// # Errors
///
/// Returns a [`ProbeError`] describing why no version string was obtained.
pub fn probe_version(
    executor: &dyn CommandExecutor,
    binary: &Utf8Path,
) -> Result<String, ProbeError> {
    let command = ToolCommand::new(binary.as_str()).arg("--version").captured();
    let output = executor.run(&command).map_err(|source| ProbeError::Spawn {
        path: binary.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(ProbeError::NonZeroExit {
            path: binary.to_string(),
            status: output.status.to_string(),
        });
    }

    [&output.stdout, &output.stderr]
        .into_iter()
        .map(|stream| String::from_utf8_lossy(stream).trim().to_owned())
        .find(|text| !text.is_empty())
        .ok_or_else(|| ProbeError::EmptyOutput {
            path: binary.to_string(),
        })
}

/// Log the probe result; failures become an "incompatible" warning.
pub fn report_probe(result: Result<String, ProbeError>, reporter: &mut Reporter<'_>) {
    match result {
        Ok(version) => reporter.progress(format_args!("Built binary reports: {version}")),
        Err(err) => reporter.warning(format_args!(
            "version check produced no output ({err}); the binary is likely incompatible with this host"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingExecutor, exit_status, failure_output, stdout_output};
    use rstest::rstest;
    use std::process::Output;

    const BINARY: &str = "/work/target/x86_64-unknown-linux-musl/release/crowbook";

    #[test]
    fn returns_trimmed_version() {
        let executor =
            RecordingExecutor::new().with_output("crowbook", stdout_output("crowbook 0.1.0\n"));
        let version = probe_version(&executor, Utf8Path::new(BINARY)).expect("version");
        assert_eq!(version, "crowbook 0.1.0");
        assert_eq!(executor.command_lines(), [format!("{BINARY} --version")]);
    }

    #[test]
    fn falls_back_to_stderr_when_stdout_is_blank() {
        let output = Output {
            status: exit_status(0),
            stdout: b" \n".to_vec(),
            stderr: b"crowbook 0.1.0\n".to_vec(),
        };
        let executor = RecordingExecutor::new().with_output("crowbook", output);
        let version = probe_version(&executor, Utf8Path::new(BINARY)).expect("version");
        assert_eq!(version, "crowbook 0.1.0");
    }

    #[test]
    fn stdout_wins_over_stderr() {
        let output = Output {
            status: exit_status(0),
            stdout: b"crowbook 0.1.0\n".to_vec(),
            stderr: b"warning: deprecated flag\n".to_vec(),
        };
        let executor = RecordingExecutor::new().with_output("crowbook", output);
        let version = probe_version(&executor, Utf8Path::new(BINARY)).expect("version");
        assert_eq!(version, "crowbook 0.1.0");
    }

    #[rstest]
    #[case::blank_stdout(RecordingExecutor::new().with_output("crowbook", stdout_output("  \n")))]
    #[case::non_zero(RecordingExecutor::new().with_output("crowbook", failure_output("exec format error")))]
    #[case::spawn(RecordingExecutor::new().with_spawn_error("crowbook"))]
    fn failures_become_incompatible_warning(#[case] executor: RecordingExecutor) {
        let result = probe_version(&executor, Utf8Path::new(BINARY));
        assert!(result.is_err());

        let mut out = Vec::new();
        report_probe(result, &mut Reporter::new(&mut out, true));
        let log = String::from_utf8(out).expect("utf8");
        assert!(log.starts_with("::warning::"));
        assert!(log.contains("incompatible"));
    }

    #[test]
    fn success_is_progress_only() {
        let mut out = Vec::new();
        report_probe(Ok("crowbook 0.1.0".to_owned()), &mut Reporter::new(&mut out, false));
        let log = String::from_utf8(out).expect("utf8");
        assert!(log.contains("crowbook 0.1.0"));
        assert!(!log.contains("::warning::"));
    }
}
