//! Lockfile regeneration ahead of the release build.

use crate::command::{CommandExecutor, ToolCommand, run_checked};
use crate::config::BuildConfig;
use crate::error::Result;
use crate::report::Reporter;

/// Outcome of [`ensure_lockfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockfileStatus {
    /// `Cargo.lock` was already present.
    Present,
    /// `Cargo.lock` was missing and has been generated.
    Generated,
}

/// Generate `Cargo.lock` in the workspace if it does not exist.
///
/// # Errors
///
/// Returns an error if `cargo generate-lockfile` cannot run or fails.
pub fn ensure_lockfile(
    config: &BuildConfig,
    executor: &dyn CommandExecutor,
    reporter: &mut Reporter<'_>,
) -> Result<LockfileStatus> {
    if config.workspace.join("Cargo.lock").is_file() {
        return Ok(LockfileStatus::Present);
    }

    reporter.progress("Cargo.lock is missing; generating it");
    let command = ToolCommand::new("cargo")
        .arg("generate-lockfile")
        .current_dir(config.workspace.clone());
    run_checked(executor, &command)?;
    Ok(LockfileStatus::Generated)
}
