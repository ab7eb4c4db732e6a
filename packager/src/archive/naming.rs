//! Archive naming policy for release bundles.
//!
//! Constructs deterministic names of the form
//! `{binary}-{version}-{target}.{ext}`.

use crate::config::BuildConfig;
use crate::platform::ArchiveFormat;
use crate::target::TargetTriple;
use std::fmt;

/// A fully-qualified release archive name.
///
/// # Examples
///
/// ```
/// use crowbook_packager::archive::ArchiveName;
/// use crowbook_packager::platform::ArchiveFormat;
/// use crowbook_packager::target::TargetTriple;
///
/// let target = TargetTriple::try_from("x86_64-unknown-linux-musl")?;
/// let name = ArchiveName::new("crowbook", "0.1.0", target, ArchiveFormat::TarGz);
/// assert_eq!(name.logical_name(), "crowbook-0.1.0-x86_64-unknown-linux-musl");
/// assert_eq!(
///     name.to_string(),
///     "crowbook-0.1.0-x86_64-unknown-linux-musl.tar.gz"
/// );
/// # Ok::<(), crowbook_packager::error::PackagerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    binary: String,
    version: String,
    target: TargetTriple,
    format: ArchiveFormat,
}

impl ArchiveName {
    /// Create an archive name from its components.
    #[must_use]
    pub fn new(
        binary: impl Into<String>,
        version: impl Into<String>,
        target: TargetTriple,
        format: ArchiveFormat,
    ) -> Self {
        Self {
            binary: binary.into(),
            version: version.into(),
            target,
            format,
        }
    }

    /// Derive the archive name for a build configuration.
    #[must_use]
    pub fn for_config(config: &BuildConfig) -> Self {
        Self::new(
            config.binary,
            config.version.as_str(),
            config.target.clone(),
            config.archive_format(),
        )
    }

    /// `{binary}-{version}-{target}`, also used as the top-level directory
    /// inside Unix archives.
    #[must_use]
    pub fn logical_name(&self) -> String {
        format!("{}-{}-{}", self.binary, self.version, self.target)
    }

    /// Return the archive format.
    #[must_use]
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Return the filename as a string without consuming the value.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.logical_name(), self.format.extension())
    }
}
