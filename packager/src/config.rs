//! Run configuration assembled once at process start.
//!
//! [`Settings`] holds the raw strings supplied by the CLI or the CI
//! environment. [`BuildConfig::new`] validates them into typed values and
//! reads the package version, after which nothing consults the environment
//! again.

use crate::error::Result;
use crate::manifest::read_package_version;
use crate::platform::{ArchiveFormat, HostOs};
use crate::target::TargetTriple;
use camino::Utf8PathBuf;
use std::fmt;

/// Base name of the shipped executable.
pub const BINARY_NAME: &str = "crowbook";

/// Name of the directory, relative to the workspace, receiving the archive.
pub const OUTPUT_DIR_NAME: &str = "output";

/// Files copied next to the executable in every archive.
pub const ACCOMPANYING_FILES: &[&str] = &["README.md", "LICENSE.md"];

/// Raw, unvalidated settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// CI runner label, e.g. `ubuntu-22.04`.
    pub os: String,
    /// Target triple string.
    pub target: String,
    /// Extra cargo flags, whitespace-separated; may be empty.
    pub flags: String,
    /// Workspace root.
    pub workspace: Utf8PathBuf,
    /// File receiving pipeline output records, if any.
    pub output_file: Option<Utf8PathBuf>,
    /// Skip package-manager installs.
    pub skip_deps: bool,
    /// Number of `-v` flags forwarded to cargo.
    pub verbosity: u8,
}

/// Extra build flags split into argument tokens.
///
/// The flag string is split on whitespace, so an empty or blank string
/// produces no tokens at all.
///
/// # Examples
///
/// ```
/// use crowbook_packager::config::BuildFlags;
///
/// assert!(BuildFlags::parse("").is_empty());
/// assert_eq!(
///     BuildFlags::parse("--features  binary").tokens(),
///     ["--features", "binary"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFlags(Vec<String>);

impl BuildFlags {
    /// Split a flag string into tokens.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.split_whitespace().map(str::to_owned).collect())
    }

    /// The individual argument tokens.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Whether no flags were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BuildFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Validated configuration shared by every packaging step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Host OS family.
    pub os: HostOs,
    /// Target triple to build for.
    pub target: TargetTriple,
    /// Extra cargo flags.
    pub flags: BuildFlags,
    /// Workspace root.
    pub workspace: Utf8PathBuf,
    /// Output directory, always `{workspace}/output`.
    pub output_dir: Utf8PathBuf,
    /// Executable base name.
    pub binary: &'static str,
    /// Package version read from the workspace manifest.
    pub version: String,
    /// Output channel file, if any.
    pub output_file: Option<Utf8PathBuf>,
    /// Skip package-manager installs.
    pub skip_deps: bool,
    /// Cargo verbosity.
    pub verbosity: u8,
}

impl BuildConfig {
    /// Validate settings and read the package version.
    ///
    /// # Errors
    ///
    /// Returns an error when the OS label or target is invalid, or when
    /// `{workspace}/Cargo.toml` is missing or has no usable version.
    pub fn new(settings: Settings) -> Result<Self> {
        let os = HostOs::parse(&settings.os)?;
        let target = TargetTriple::try_from(settings.target.as_str())?;
        let version = read_package_version(&settings.workspace.join("Cargo.toml"))?;
        let output_dir = settings.workspace.join(OUTPUT_DIR_NAME);

        Ok(Self {
            os,
            target,
            flags: BuildFlags::parse(&settings.flags),
            workspace: settings.workspace,
            output_dir,
            binary: BINARY_NAME,
            version,
            output_file: settings.output_file,
            skip_deps: settings.skip_deps,
            verbosity: settings.verbosity,
        })
    }

    /// Archive format for this host.
    #[must_use]
    pub fn archive_format(&self) -> ArchiveFormat {
        self.os.archive_format()
    }

    /// Executable suffix for this host.
    #[must_use]
    pub fn executable_suffix(&self) -> &'static str {
        self.os.executable_suffix()
    }

    /// Cargo's release directory for the configured target.
    #[must_use]
    pub fn release_dir(&self) -> Utf8PathBuf {
        self.workspace
            .join("target")
            .join(self.target.as_str())
            .join("release")
    }

    /// Path of the main executable inside [`Self::release_dir`].
    #[must_use]
    pub fn binary_path(&self) -> Utf8PathBuf {
        self.release_dir()
            .join(format!("{}{}", self.binary, self.executable_suffix()))
    }
}
