//! CLI argument definitions for the crowbook release packager.
//!
//! Every setting can come from a flag or from the environment variable a
//! CI workflow already exports, so the binary runs unchanged as a workflow
//! step or by hand.

use crate::config::Settings;
use crate::error::{PackagerError, Result};
use camino::Utf8PathBuf;
use clap::Parser;

/// Build and package a crowbook release archive.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "crowbook-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build and package a crowbook release archive.\n\n",
    "Installs any platform build dependencies, runs a release build for the ",
    "requested target, and bundles the executable with README.md and ",
    "LICENSE.md into output/crowbook-<version>-<target>.tar.gz (or .zip on ",
    "Windows). The archive path is appended to the pipeline output file as ",
    "archive=<path>.",
))]
#[command(after_help = concat!(
    "ENVIRONMENT:\n",
    "  RELEASE_OS         Runner label, e.g. ubuntu-22.04, macos-latest, windows-latest\n",
    "  RELEASE_TARGET     Target triple to build\n",
    "  RELEASE_FLAGS      Extra cargo build flags\n",
    "  GITHUB_WORKSPACE   Workspace root [default: current directory]\n",
    "  GITHUB_OUTPUT      File receiving archive=<path>\n\n",
    "EXAMPLES:\n",
    "  Package a static Linux build:\n",
    "    $ crowbook-packager --os ubuntu-22.04 --target x86_64-unknown-linux-musl\n\n",
    "  Preview the commands without running them:\n",
    "    $ crowbook-packager --os windows-latest --target x86_64-pc-windows-msvc --dry-run",
))]
pub struct Cli {
    /// CI runner OS label.
    #[arg(long, env = "RELEASE_OS", value_name = "LABEL")]
    pub os: String,

    /// Target triple to build for.
    #[arg(long, env = "RELEASE_TARGET", value_name = "TRIPLE")]
    pub target: String,

    /// Extra cargo build flags, whitespace-separated.
    #[arg(
        long,
        env = "RELEASE_FLAGS",
        value_name = "FLAGS",
        default_value = "",
        allow_hyphen_values = true
    )]
    pub flags: String,

    /// Workspace root containing Cargo.toml [default: current directory].
    #[arg(long, env = "GITHUB_WORKSPACE", value_name = "DIR")]
    pub workspace: Option<Utf8PathBuf>,

    /// File receiving the archive=<path> record [default: stdout].
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "FILE")]
    pub output_file: Option<Utf8PathBuf>,

    /// Show configuration and planned commands, then exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip installing system packages.
    #[arg(long)]
    pub skip_deps: bool,

    /// Increase cargo output verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (warnings and errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Convert parsed arguments into raw settings.
    ///
    /// A relative or missing workspace is resolved against the current
    /// directory so every derived path is absolute.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::NonUtf8Path`] if the current directory is
    /// not valid UTF-8, or [`PackagerError::Io`] if it cannot be read.
    pub fn into_settings(self) -> Result<Settings> {
        let workspace = match self.workspace {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => current_dir()?.join(dir),
            None => current_dir()?,
        };

        Ok(Settings {
            os: self.os,
            target: self.target,
            flags: self.flags,
            workspace,
            output_file: self.output_file,
            skip_deps: self.skip_deps,
            verbosity: self.verbosity,
        })
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| PackagerError::NonUtf8Path {
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
