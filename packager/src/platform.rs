//! Host operating-system families recognised by the packager.
//!
//! CI runners identify themselves with image labels such as `ubuntu-22.04`
//! or `windows-latest`. Only the family prefix matters for packaging, so
//! labels are collapsed into a closed [`HostOs`] enum at construction time.

use crate::error::{PackagerError, Result};
use std::fmt;

const EXPECTED_FAMILIES: &str = "ubuntu-*, linux-*, debian-*, macos-*, windows-*";

/// The operating-system family of the machine running the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOs {
    /// Linux runners (`ubuntu-*`, `linux-*`, `debian-*`).
    Linux,
    /// macOS runners (`macos-*`).
    MacOs,
    /// Windows runners (`windows-*`).
    Windows,
}

/// Archive container produced for a host family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Gzip-compressed tarball wrapping a single top-level directory.
    TarGz,
    /// Deflate zip holding a flat file set.
    Zip,
}

impl ArchiveFormat {
    /// Return the file extension without a leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl HostOs {
    /// Parse a CI runner label into its OS family.
    ///
    /// Matching is case-insensitive and only looks at the label prefix.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::UnsupportedOs`] for unknown families.
    ///
    /// # Examples
    ///
    /// ```
    /// use crowbook_packager::platform::HostOs;
    ///
    /// assert_eq!(HostOs::parse("ubuntu-22.04")?, HostOs::Linux);
    /// assert_eq!(HostOs::parse("windows-latest")?, HostOs::Windows);
    /// assert!(HostOs::parse("solaris-11").is_err());
    /// # Ok::<(), crowbook_packager::error::PackagerError>(())
    /// ```
    pub fn parse(label: &str) -> Result<Self> {
        let lower = label.trim().to_ascii_lowercase();
        let family = lower.split(['-', '_']).next().unwrap_or_default();
        match family {
            "ubuntu" | "linux" | "debian" => Ok(Self::Linux),
            "macos" | "osx" => Ok(Self::MacOs),
            "windows" => Ok(Self::Windows),
            _ => Err(PackagerError::UnsupportedOs {
                value: label.to_owned(),
                expected: EXPECTED_FAMILIES,
            }),
        }
    }

    /// Whether this host produces Unix-style (`tar.gz`) archives.
    #[must_use]
    pub const fn is_unix_family(self) -> bool {
        !matches!(self, Self::Windows)
    }

    /// Archive format shipped from this host.
    #[must_use]
    pub const fn archive_format(self) -> ArchiveFormat {
        if self.is_unix_family() {
            ArchiveFormat::TarGz
        } else {
            ArchiveFormat::Zip
        }
    }

    /// Suffix appended to executable file names.
    #[must_use]
    pub const fn executable_suffix(self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::Linux | Self::MacOs => "",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::ubuntu_pinned("ubuntu-22.04", HostOs::Linux)]
    #[case::ubuntu_latest("ubuntu-latest", HostOs::Linux)]
    #[case::macos("macos-latest", HostOs::MacOs)]
    #[case::macos_arm("macos-14", HostOs::MacOs)]
    #[case::windows("windows-latest", HostOs::Windows)]
    #[case::windows_upper("Windows-2022", HostOs::Windows)]
    fn parses_runner_labels(#[case] label: &str, #[case] expected: HostOs) {
        assert_eq!(HostOs::parse(label).expect("supported label"), expected);
    }

    #[rstest]
    #[case::unknown("freebsd-14")]
    #[case::empty("")]
    #[case::prefix_only_match("ubuntuish")]
    fn rejects_unknown_labels(#[case] label: &str) {
        let err = HostOs::parse(label).expect_err("label must be rejected");
        assert!(matches!(err, PackagerError::UnsupportedOs { .. }));
    }

    #[rstest]
    #[case::linux(HostOs::Linux, ArchiveFormat::TarGz, "")]
    #[case::macos(HostOs::MacOs, ArchiveFormat::TarGz, "")]
    #[case::windows(HostOs::Windows, ArchiveFormat::Zip, ".exe")]
    fn per_family_conventions(
        #[case] os: HostOs,
        #[case] format: ArchiveFormat,
        #[case] suffix: &str,
    ) {
        assert_eq!(os.archive_format(), format);
        assert_eq!(os.executable_suffix(), suffix);
    }

    #[test]
    fn archive_extensions() {
        assert_eq!(ArchiveFormat::TarGz.to_string(), "tar.gz");
        assert_eq!(ArchiveFormat::Zip.to_string(), "zip");
    }
}
