//! Staging the output directory and compressing it into a release archive.
//!
//! Unix-family hosts get `{name}.tar.gz` wrapping a single `{name}/`
//! directory; Windows gets a flat `{name}.zip`. Both archives are written
//! with a sorted member order and replace any earlier archive of the same
//! name, so repeated assembly over an unchanged output directory yields the
//! same membership.

use super::error::ArchiveError;
use super::naming::ArchiveName;
use crate::config::{ACCOMPANYING_FILES, BuildConfig};
use crate::platform::ArchiveFormat;
use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// A finished release archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArchive {
    /// Path to the archive file inside the output directory.
    pub path: Utf8PathBuf,
    /// Archive name and format.
    pub name: ArchiveName,
    /// Lowercase hex SHA-256 of the archive bytes.
    pub sha256: String,
}

impl ReleaseArchive {
    /// Archive format.
    #[must_use]
    pub fn format(&self) -> ArchiveFormat {
        self.name.format()
    }

    /// `{binary}-{version}-{target}`.
    #[must_use]
    pub fn logical_name(&self) -> String {
        self.name.logical_name()
    }
}

/// Stage the executables and accompanying files, then compress them.
///
/// # Errors
///
/// Returns [`ArchiveError::MissingFile`] if `README.md` or `LICENSE.md` is
/// absent from the workspace, or an I/O / zip error while writing.
pub fn assemble_archive(
    config: &BuildConfig,
    executables: &[Utf8PathBuf],
) -> Result<ReleaseArchive, ArchiveError> {
    let name = ArchiveName::for_config(config);
    let logical = name.logical_name();
    let output_dir = &config.output_dir;
    let archive_path = output_dir.join(name.filename());

    fs::create_dir_all(output_dir)?;
    clear_previous(output_dir, &logical, &archive_path)?;

    let mut sources: Vec<Utf8PathBuf> = ACCOMPANYING_FILES
        .iter()
        .map(|file| config.workspace.join(file))
        .collect();
    sources.extend(executables.iter().cloned());
    let staged = stage_files(output_dir, &sources)?;

    match name.format() {
        ArchiveFormat::TarGz => {
            let bundle_dir = output_dir.join(&logical);
            move_into(&bundle_dir, &staged)?;
            create_tar_gz(&archive_path, &bundle_dir, &logical)?;
        }
        ArchiveFormat::Zip => create_zip(&archive_path, &staged)?,
    }

    let sha256 = compute_sha256(&archive_path)?;
    Ok(ReleaseArchive {
        path: archive_path,
        name,
        sha256,
    })
}

/// Remove the bundle directory and archive left by an earlier assembly.
fn clear_previous(
    output_dir: &Utf8Path,
    logical: &str,
    archive_path: &Utf8Path,
) -> Result<(), ArchiveError> {
    let bundle_dir = output_dir.join(logical);
    if bundle_dir.is_dir() {
        fs::remove_dir_all(&bundle_dir)?;
    }
    if archive_path.is_file() {
        fs::remove_file(archive_path)?;
    }
    Ok(())
}

/// Copy `sources` into `output_dir`, returning the staged paths sorted by
/// file name.
fn stage_files(
    output_dir: &Utf8Path,
    sources: &[Utf8PathBuf],
) -> Result<Vec<Utf8PathBuf>, ArchiveError> {
    let mut staged = Vec::with_capacity(sources.len());
    for source in sources {
        if !source.is_file() {
            return Err(ArchiveError::MissingFile {
                path: source.clone(),
            });
        }
        let file_name = source
            .file_name()
            .ok_or_else(|| ArchiveError::InvalidStagedPath(source.clone()))?;
        let dest = output_dir.join(file_name);
        log::debug!("copying {source} to {dest}");
        fs::copy(source, &dest)?;
        staged.push(dest);
    }
    staged.sort();
    staged.dedup();
    Ok(staged)
}

fn move_into(bundle_dir: &Utf8Path, staged: &[Utf8PathBuf]) -> Result<(), ArchiveError> {
    fs::create_dir_all(bundle_dir)?;
    for path in staged {
        let file_name = path
            .file_name()
            .ok_or_else(|| ArchiveError::InvalidStagedPath(path.clone()))?;
        fs::rename(path, bundle_dir.join(file_name))?;
    }
    Ok(())
}

/// Write `dir` into a gzip-compressed tarball under the top-level name
/// `dir_name`.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] if a file cannot be read or the archive
/// cannot be written.
pub fn create_tar_gz(
    archive_path: &Utf8Path,
    dir: &Utf8Path,
    dir_name: &str,
) -> Result<(), ArchiveError> {
    let output = File::create(archive_path)?;
    let encoder = GzEncoder::new(output, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    builder.append_dir(dir_name, dir)?;
    let mut files: Vec<Utf8PathBuf> = dir
        .read_dir_utf8()?
        .map(|entry| entry.map(camino::Utf8DirEntry::into_path))
        .collect::<io::Result<_>>()?;
    files.sort();
    for file in files {
        if let Some(file_name) = file.file_name() {
            builder.append_path_with_name(&file, format!("{dir_name}/{file_name}"))?;
        }
    }

    builder.into_inner()?.finish()?;
    Ok(())
}

/// Write `files` into a flat deflate zip.
///
/// # Errors
///
/// Returns [`ArchiveError::Zip`] or [`ArchiveError::Io`] on write failures.
pub fn create_zip(archive_path: &Utf8Path, files: &[Utf8PathBuf]) -> Result<(), ArchiveError> {
    let output = File::create(archive_path)?;
    let mut zip = zip::ZipWriter::new(output);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    for file in files {
        let file_name = file
            .file_name()
            .ok_or_else(|| ArchiveError::InvalidStagedPath(file.clone()))?;
        zip.start_file(file_name, options)?;
        let mut source = File::open(file)?;
        io::copy(&mut source, &mut zip)?;
    }

    zip.finish()?;
    Ok(())
}

/// List the regular-file members of an archive, sorted.
///
/// Directory entries are omitted so the listing reflects shipped files.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or decoded.
pub fn list_archive_members(
    path: &Utf8Path,
    format: ArchiveFormat,
) -> Result<Vec<String>, ArchiveError> {
    let file = File::open(path)?;
    let mut members = match format {
        ArchiveFormat::TarGz => {
            let mut archive = tar::Archive::new(GzDecoder::new(file));
            let mut names = Vec::new();
            for entry in archive.entries()? {
                let entry = entry?;
                if entry.header().entry_type().is_file() {
                    names.push(entry.path()?.to_string_lossy().into_owned());
                }
            }
            names
        }
        ArchiveFormat::Zip => {
            let archive = zip::ZipArchive::new(file)?;
            archive
                .file_names()
                .filter(|name| !name.ends_with('/'))
                .map(str::to_owned)
                .collect()
        }
    };
    members.sort();
    Ok(members)
}

/// Compute the SHA-256 digest of a file as lowercase hex.
///
/// # Errors
///
/// Returns [`ArchiveError::Io`] if the file cannot be read.
pub fn compute_sha256(path: &Utf8Path) -> Result<String, ArchiveError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "assembly_tests.rs"]
mod tests;
