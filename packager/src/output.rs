//! The pipeline output channel.
//!
//! Later CI steps read the archive location from a `key=value` file
//! (`$GITHUB_OUTPUT`). Records are always appended so outputs written by
//! earlier steps survive.

use crate::archive::ReleaseArchive;
use crate::config::BuildConfig;
use crate::error::{PackagerError, Result};
use crate::platform::HostOs;
use crate::report::Reporter;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};

/// Key under which the archive path is published.
pub const ARCHIVE_KEY: &str = "archive";

/// A single `archive=<path>` output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    archive: Utf8PathBuf,
}

impl OutputRecord {
    /// Create a record for the given archive path.
    #[must_use]
    pub fn new(archive: impl Into<Utf8PathBuf>) -> Self {
        Self {
            archive: archive.into(),
        }
    }

    /// The published archive path.
    #[must_use]
    pub fn archive(&self) -> &Utf8Path {
        &self.archive
    }
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ARCHIVE_KEY}={}", self.archive)
    }
}

/// Whether a record was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The record was appended to the channel.
    Written(OutputRecord),
    /// No archive was found to publish.
    Skipped,
}

/// Append `record` to `output_file`, or to `stdout` when no file is set.
///
/// # Errors
///
/// Returns [`PackagerError::OutputChannel`] if the file cannot be opened or
/// written, or [`PackagerError::Io`] if writing to `stdout` fails.
pub fn append_record(
    record: &OutputRecord,
    output_file: Option<&Utf8Path>,
    stdout: &mut dyn Write,
) -> Result<()> {
    let Some(path) = output_file else {
        writeln!(stdout, "{record}")?;
        return Ok(());
    };

    let channel_error = |source: io::Error| PackagerError::OutputChannel {
        path: path.to_owned(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(channel_error)?;
    writeln!(file, "{record}").map_err(channel_error)
}

/// Publish the archive location for later pipeline steps.
///
/// Unix-family hosts publish the path assembly produced. Windows re-derives
/// it by listing `*.zip` files in the output directory and publishes
/// nothing when that listing is empty.
///
/// # Errors
///
/// Returns an error if the output directory cannot be listed or the record
/// cannot be written.
pub fn record_archive(
    config: &BuildConfig,
    archive: &ReleaseArchive,
    stdout: &mut dyn Write,
    reporter: &mut Reporter<'_>,
) -> Result<RecordOutcome> {
    let path = match config.os {
        HostOs::Windows => {
            let Some(path) = first_zip(&config.output_dir)? else {
                reporter.progress(format_args!(
                    "No zip archive found in {}; skipping output record",
                    config.output_dir
                ));
                return Ok(RecordOutcome::Skipped);
            };
            path
        }
        HostOs::Linux | HostOs::MacOs => archive.path.clone(),
    };

    let record = OutputRecord::new(path);
    append_record(&record, config.output_file.as_deref(), stdout)?;
    log::debug!("published {record}");
    Ok(RecordOutcome::Written(record))
}

fn first_zip(dir: &Utf8Path) -> Result<Option<Utf8PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let mut zips = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let path = entry?.into_path();
        if path.is_file() && path.extension() == Some("zip") {
            zips.push(path);
        }
    }
    zips.sort();
    Ok(zips.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveName;
    use crate::test_utils::test_config;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    struct Channel {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn channel() -> Channel {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
        Channel { _dir: dir, root }
    }

    fn archive_for(config: &BuildConfig) -> ReleaseArchive {
        let name = ArchiveName::for_config(config);
        ReleaseArchive {
            path: config.output_dir.join(name.filename()),
            name,
            sha256: String::new(),
        }
    }

    #[test]
    fn record_renders_key_value() {
        let record = OutputRecord::new("/w/output/crowbook-0.1.0-x.tar.gz");
        assert_eq!(record.to_string(), "archive=/w/output/crowbook-0.1.0-x.tar.gz");
        assert_eq!(record.archive(), "/w/output/crowbook-0.1.0-x.tar.gz");
    }

    #[rstest]
    fn append_preserves_existing_lines(channel: Channel) {
        let file = channel.root.join("github_output");
        fs::write(&file, "previous=value\n").expect("seed");

        let mut stdout = Vec::new();
        append_record(&OutputRecord::new("/a.tar.gz"), Some(&file), &mut stdout).expect("append");
        append_record(&OutputRecord::new("/b.tar.gz"), Some(&file), &mut stdout).expect("append");

        let contents = fs::read_to_string(&file).expect("read");
        assert_eq!(contents, "previous=value\narchive=/a.tar.gz\narchive=/b.tar.gz\n");
        assert!(stdout.is_empty());
    }

    #[rstest]
    fn append_creates_missing_file(channel: Channel) {
        let file = channel.root.join("fresh_output");
        append_record(&OutputRecord::new("/a.zip"), Some(&file), &mut Vec::new()).expect("append");
        assert_eq!(fs::read_to_string(&file).expect("read"), "archive=/a.zip\n");
    }

    #[test]
    fn without_file_record_goes_to_stdout() {
        let mut stdout = Vec::new();
        append_record(&OutputRecord::new("/a.zip"), None, &mut stdout).expect("append");
        assert_eq!(String::from_utf8(stdout).expect("utf8"), "archive=/a.zip\n");
    }

    #[rstest]
    fn unix_publishes_constructed_path(channel: Channel) {
        let config = test_config(channel.root.clone(), HostOs::Linux, "x86_64-unknown-linux-musl");
        let archive = archive_for(&config);
        let mut stdout = Vec::new();
        let mut log = Vec::new();

        let outcome = record_archive(&config, &archive, &mut stdout, &mut Reporter::new(&mut log, false))
            .expect("record");

        assert_eq!(outcome, RecordOutcome::Written(OutputRecord::new(archive.path.clone())));
        assert_eq!(
            String::from_utf8(stdout).expect("utf8"),
            format!("archive={}\n", archive.path)
        );
    }

    #[rstest]
    fn windows_publishes_listed_zip(channel: Channel) {
        let config = test_config(channel.root.clone(), HostOs::Windows, "x86_64-pc-windows-msvc");
        let archive = archive_for(&config);
        fs::create_dir_all(&config.output_dir).expect("mkdir");
        fs::write(&archive.path, b"PK").expect("write zip");
        let mut stdout = Vec::new();
        let mut log = Vec::new();

        let outcome = record_archive(&config, &archive, &mut stdout, &mut Reporter::new(&mut log, false))
            .expect("record");

        assert_eq!(outcome, RecordOutcome::Written(OutputRecord::new(archive.path)));
    }

    #[rstest]
    fn windows_skips_when_no_zip_listed(channel: Channel) {
        let mut config =
            test_config(channel.root.clone(), HostOs::Windows, "x86_64-pc-windows-msvc");
        let file = channel.root.join("github_output");
        config.output_file = Some(file.clone());
        fs::create_dir_all(&config.output_dir).expect("mkdir");
        let archive = archive_for(&config);
        let mut log = Vec::new();

        let outcome =
            record_archive(&config, &archive, &mut Vec::new(), &mut Reporter::new(&mut log, false))
                .expect("record");

        assert_eq!(outcome, RecordOutcome::Skipped);
        assert!(!file.exists());
        assert!(String::from_utf8(log).expect("utf8").contains("skipping"));
    }
}
