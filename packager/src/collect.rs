//! Locating the executables produced by the release build.

use crate::archive::ArchiveError;
use crate::config::BuildConfig;
use crate::report::Reporter;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobMatcher};
use std::fs;

/// Files cargo leaves behind describing dependency info.
const DEP_INFO_EXTENSION: &str = "d";

/// Executables found in the release directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedArtifacts {
    /// Matching files, sorted by name.
    pub executables: Vec<Utf8PathBuf>,
    /// Stale `*.d` files that were removed.
    pub removed_dep_info: usize,
}

/// Glob pattern `{binary}*{suffix}` for the configured host.
#[must_use]
pub fn executable_pattern(config: &BuildConfig) -> String {
    format!("{}*{}", config.binary, config.executable_suffix())
}

/// Remove `*.d` files, then list executables matching the binary glob.
///
/// An empty match is reported as an error annotation but is not fatal:
/// packaging continues and the resulting archive simply lacks the binary.
///
/// # Errors
///
/// Returns an error if the pattern is invalid or the directory cannot be
/// read. A missing release directory counts as an empty listing.
pub fn collect_executables(
    config: &BuildConfig,
    reporter: &mut Reporter<'_>,
) -> Result<CollectedArtifacts, ArchiveError> {
    let release_dir = config.release_dir();
    let pattern = executable_pattern(config);
    let matcher = Glob::new(&pattern)?.compile_matcher();

    let removed_dep_info = remove_dep_info(&release_dir)?;
    let executables = list_matching(&release_dir, &matcher)?;

    reporter.progress(format_args!("Artifacts in {release_dir} matching {pattern}:"));
    if executables.is_empty() {
        reporter.error(format_args!(
            "no executables matching {pattern} in {release_dir}; the archive will not contain the binary"
        ));
    }
    for path in &executables {
        reporter.progress(format_args!("  {path}"));
    }

    Ok(CollectedArtifacts {
        executables,
        removed_dep_info,
    })
}

fn regular_files(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ArchiveError> {
    if !dir.is_dir() {
        log::debug!("release directory {dir} does not exist");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn remove_dep_info(dir: &Utf8Path) -> Result<usize, ArchiveError> {
    let mut removed = 0;
    for path in regular_files(dir)? {
        if path.extension() == Some(DEP_INFO_EXTENSION) {
            log::trace!("removing {path}");
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn list_matching(
    dir: &Utf8Path,
    matcher: &GlobMatcher,
) -> Result<Vec<Utf8PathBuf>, ArchiveError> {
    Ok(regular_files(dir)?
        .into_iter()
        .filter(|path| path.file_name().is_some_and(|name| matcher.is_match(name)))
        .collect())
}
