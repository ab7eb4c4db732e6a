//! Release archive naming and assembly.
//!
//! # Sub-modules
//!
//! - [`error`] - Error type for staging and compression failures.
//! - [`naming`] - Deterministic archive naming (`ArchiveName`).
//! - [`assembly`] - Staging the output directory and writing the archive.

pub mod assembly;
pub mod error;
pub mod naming;

pub use assembly::{ReleaseArchive, assemble_archive, list_archive_members};
pub use error::ArchiveError;
pub use naming::ArchiveName;
