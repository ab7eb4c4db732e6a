//! Target triple validation and cross-compilation requirements.
//!
//! A [`TargetTriple`] is accepted when it is well formed; the packager does
//! not restrict the set of triples because native builds work for any
//! target the host toolchain supports. The two Linux cross targets that need
//! an extra C toolchain are described by [`CrossToolchain`].

use crate::error::{PackagerError, Result};
use std::fmt;

/// A well-formed target triple such as `x86_64-unknown-linux-musl`.
///
/// # Examples
///
/// ```
/// use crowbook_packager::target::TargetTriple;
///
/// let triple = TargetTriple::try_from("x86_64-unknown-linux-musl")?;
/// assert!(triple.is_musl());
/// assert!(triple.cross_toolchain().is_none());
/// # Ok::<(), crowbook_packager::error::PackagerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetTriple(String);

/// A GNU cross toolchain required to link a non-native Linux target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossToolchain {
    /// 64-bit ARM, glibc.
    Aarch64Gnu,
    /// 32-bit `ARMv7`, glibc, hard float.
    Armv7Gnueabihf,
}

impl CrossToolchain {
    /// The distribution package providing the cross compiler.
    #[must_use]
    pub const fn package(self) -> &'static str {
        match self {
            Self::Aarch64Gnu => "gcc-aarch64-linux-gnu",
            Self::Armv7Gnueabihf => "gcc-arm-linux-gnueabihf",
        }
    }

    /// The cargo environment variable selecting the target linker.
    #[must_use]
    pub const fn linker_env(self) -> &'static str {
        match self {
            Self::Aarch64Gnu => "CARGO_TARGET_AARCH64_UNKNOWN_LINUX_GNU_LINKER",
            Self::Armv7Gnueabihf => "CARGO_TARGET_ARMV7_UNKNOWN_LINUX_GNUEABIHF_LINKER",
        }
    }

    /// The linker executable installed by [`Self::package`].
    #[must_use]
    pub const fn linker(self) -> &'static str {
        match self {
            Self::Aarch64Gnu => "aarch64-linux-gnu-gcc",
            Self::Armv7Gnueabihf => "arm-linux-gnueabihf-gcc",
        }
    }
}

impl TargetTriple {
    /// Return the triple as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the triple targets the musl C library.
    #[must_use]
    pub fn is_musl(&self) -> bool {
        self.0
            .rsplit('-')
            .next()
            .is_some_and(|env| env.starts_with("musl"))
    }

    /// The cross toolchain a Linux host needs to link this target, if any.
    #[must_use]
    pub fn cross_toolchain(&self) -> Option<CrossToolchain> {
        match self.0.as_str() {
            "aarch64-unknown-linux-gnu" => Some(CrossToolchain::Aarch64Gnu),
            "armv7-unknown-linux-gnueabihf" => Some(CrossToolchain::Armv7Gnueabihf),
            _ => None,
        }
    }
}

fn validate(value: &str) -> std::result::Result<(), &'static str> {
    if value.is_empty() {
        return Err("triple is empty");
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err("triple contains characters outside [A-Za-z0-9_.-]");
    }
    let segments: Vec<&str> = value.split('-').collect();
    if segments.len() < 2 {
        return Err("triple needs at least two hyphen-separated segments");
    }
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err("triple has an empty segment");
    }
    Ok(())
}

impl TryFrom<&str> for TargetTriple {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        validate(trimmed).map_err(|reason| PackagerError::InvalidTarget {
            value: value.to_owned(),
            reason,
        })?;
        Ok(Self(trimmed.to_owned()))
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("x86_64-unknown-linux-gnu")]
    #[case("x86_64-unknown-linux-musl")]
    #[case("aarch64-apple-darwin")]
    #[case("x86_64-pc-windows-msvc")]
    #[case("armv7-unknown-linux-gnueabihf")]
    #[case("wasm32-wasip1")]
    fn accepts_well_formed_triples(#[case] value: &str) {
        let triple = TargetTriple::try_from(value).expect("well-formed triple");
        assert_eq!(triple.as_str(), value);
    }

    #[rstest]
    #[case::empty("")]
    #[case::single_segment("x86_64")]
    #[case::empty_segment("x86_64--linux-gnu")]
    #[case::whitespace_inside("x86_64 unknown-linux-gnu")]
    #[case::shell_metachar("x86_64-unknown-linux-gnu;rm")]
    fn rejects_malformed_triples(#[case] value: &str) {
        let err = TargetTriple::try_from(value).expect_err("malformed triple");
        assert!(
            matches!(err, PackagerError::InvalidTarget { .. }),
            "expected InvalidTarget, got {err:?}"
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let triple = TargetTriple::try_from(" aarch64-apple-darwin\n").expect("trimmed");
        assert_eq!(triple.to_string(), "aarch64-apple-darwin");
    }

    #[rstest]
    #[case("x86_64-unknown-linux-musl", true)]
    #[case("armv7-unknown-linux-musleabihf", true)]
    #[case("x86_64-unknown-linux-gnu", false)]
    #[case("x86_64-pc-windows-msvc", false)]
    fn detects_musl(#[case] value: &str, #[case] musl: bool) {
        let triple = TargetTriple::try_from(value).expect("valid");
        assert_eq!(triple.is_musl(), musl);
    }

    #[rstest]
    #[case("aarch64-unknown-linux-gnu", Some(CrossToolchain::Aarch64Gnu))]
    #[case("armv7-unknown-linux-gnueabihf", Some(CrossToolchain::Armv7Gnueabihf))]
    #[case("aarch64-unknown-linux-musl", None)]
    #[case("x86_64-unknown-linux-gnu", None)]
    fn maps_cross_toolchains(#[case] value: &str, #[case] expected: Option<CrossToolchain>) {
        let triple = TargetTriple::try_from(value).expect("valid");
        assert_eq!(triple.cross_toolchain(), expected);
    }

    #[test]
    fn cross_toolchain_linker_matches_package() {
        let aarch64 = CrossToolchain::Aarch64Gnu;
        assert_eq!(aarch64.package(), "gcc-aarch64-linux-gnu");
        assert_eq!(aarch64.linker(), "aarch64-linux-gnu-gcc");
        assert!(aarch64.linker_env().ends_with("_LINKER"));
    }
}
