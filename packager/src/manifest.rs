//! Package version lookup from `Cargo.toml`.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<PackageSection>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    version: Option<toml::Value>,
}

/// Read `package.version` from the manifest at `path`.
///
/// Only literal string versions are accepted; a workspace-inherited
/// `version.workspace = true` is reported as invalid because the packager
/// needs the concrete string to name the archive.
///
/// # Errors
///
/// Returns [`PackagerError::ManifestNotFound`] when the file is missing and
/// [`PackagerError::InvalidManifest`] when it cannot be parsed or has no
/// string version.
pub fn read_package_version(path: &Utf8Path) -> Result<String> {
    if !path.is_file() {
        return Err(PackagerError::ManifestNotFound {
            path: path.to_owned(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    parse_package_version(&contents).map_err(|reason| PackagerError::InvalidManifest {
        path: path.to_owned(),
        reason,
    })
}

fn parse_package_version(contents: &str) -> std::result::Result<String, String> {
    let manifest: CargoManifest = toml::from_str(contents).map_err(|e| e.message().to_owned())?;
    let version = manifest
        .package
        .ok_or_else(|| "missing [package] table".to_owned())?
        .version
        .ok_or_else(|| "missing package.version".to_owned())?;
    match version {
        toml::Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_owned()),
        toml::Value::String(_) => Err("package.version is empty".to_owned()),
        _ => Err("package.version is not a literal string".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn parses_literal_version() {
        let contents = "[package]\nname = \"crowbook\"\nversion = \"0.1.0\"\n";
        assert_eq!(parse_package_version(contents).as_deref(), Ok("0.1.0"));
    }

    #[rstest]
    #[case::no_package("[workspace]\nmembers = []\n", "missing [package]")]
    #[case::no_version("[package]\nname = \"crowbook\"\n", "missing package.version")]
    #[case::inherited(
        "[package]\nname = \"crowbook\"\nversion.workspace = true\n",
        "not a literal string"
    )]
    #[case::empty("[package]\nversion = \"  \"\n", "is empty")]
    fn rejects_unusable_manifests(#[case] contents: &str, #[case] fragment: &str) {
        let reason = parse_package_version(contents).expect_err("manifest must be rejected");
        assert!(reason.contains(fragment), "unexpected reason: {reason}");
    }

    #[test]
    fn reports_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("Cargo.toml")).expect("utf8");
        let err = read_package_version(&path).expect_err("missing manifest");
        assert!(matches!(err, PackagerError::ManifestNotFound { .. }));
    }

    #[test]
    fn reports_syntax_errors_with_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("Cargo.toml")).expect("utf8");
        std::fs::write(&path, "[package\nversion = ").expect("write manifest");
        let err = read_package_version(&path).expect_err("broken manifest");
        assert!(matches!(err, PackagerError::InvalidManifest { path: p, .. } if p == path));
    }
}
