//! Error types for release archive assembly.
//!
//! Covers I/O failures while staging files, compression failures, and the
//! glob used to find executables.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while staging or compressing the release archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// An I/O operation failed (copying, moving, writing the archive).
    #[error("I/O error during packaging: {0}")]
    Io(#[from] std::io::Error),

    /// Writing or reading a zip archive failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The executable glob pattern is invalid.
    #[error("invalid executable pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// A file that must ship in every archive is missing.
    #[error("required file {path} is missing")]
    MissingFile {
        /// Path where the file was expected.
        path: Utf8PathBuf,
    },

    /// A staged path has no file name component.
    #[error("staged path has no file name: {0}")]
    InvalidStagedPath(Utf8PathBuf),
}
