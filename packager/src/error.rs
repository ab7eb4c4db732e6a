//! Error types for the release packager CLI.
//!
//! This module defines semantic error variants for every step that is
//! allowed to terminate a packaging run. The version probe has its own
//! error type in [`crate::probe`] because its failures never propagate.

use crate::archive::ArchiveError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can terminate a packaging run.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The OS identifier does not belong to a supported runner family.
    #[error("unsupported OS identifier {value:?}; expected one of: {expected}")]
    UnsupportedOs {
        /// The rejected identifier.
        value: String,
        /// Human-readable list of accepted families.
        expected: &'static str,
    },

    /// The target triple is malformed.
    #[error("invalid target triple {value:?}: {reason}")]
    InvalidTarget {
        /// The rejected triple.
        value: String,
        /// Why the triple was rejected.
        reason: &'static str,
    },

    /// The package manifest could not be found.
    #[error("package manifest not found at {path}")]
    ManifestNotFound {
        /// Where the manifest was expected.
        path: Utf8PathBuf,
    },

    /// The package manifest could not be parsed or lacks a version.
    #[error("invalid package manifest at {path}: {reason}")]
    InvalidManifest {
        /// Path to the manifest.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// The workspace path is not valid UTF-8.
    #[error("workspace path is not valid UTF-8: {reason}")]
    NonUtf8Path {
        /// Description of the conversion failure.
        reason: String,
    },

    /// An external command could not be spawned.
    #[error("failed to run {program}: {source}")]
    CommandSpawn {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully.
    #[error("{command} failed with {status}")]
    CommandFailed {
        /// The rendered command line.
        command: String,
        /// The exit status description.
        status: String,
    },

    /// Archive assembly failed.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Appending to the pipeline output channel failed.
    #[error("failed to write output record to {path}")]
    OutputChannel {
        /// The output channel path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_os_lists_expected_families() {
        let err = PackagerError::UnsupportedOs {
            value: "freebsd-14".to_owned(),
            expected: "ubuntu-*, macos-*, windows-*",
        };
        let msg = err.to_string();
        assert!(msg.contains("freebsd-14"));
        assert!(msg.contains("windows-*"));
    }

    #[test]
    fn command_failed_includes_command_line() {
        let err = PackagerError::CommandFailed {
            command: "cargo build --release".to_owned(),
            status: "exit status: 101".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cargo build --release"));
        assert!(msg.contains("101"));
    }

    #[test]
    fn command_spawn_preserves_source() {
        let err = PackagerError::CommandSpawn {
            program: "sudo".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("sudo"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn output_channel_error_includes_path() {
        let err = PackagerError::OutputChannel {
            path: Utf8PathBuf::from("/tmp/github_output"),
            source: std::io::Error::other("read-only filesystem"),
        };
        assert!(err.to_string().contains("/tmp/github_output"));
    }
}
