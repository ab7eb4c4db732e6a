//! End-to-end release packaging.
//!
//! [`ReleasePackager`] runs the steps in a fixed order: reset the output
//! directory, ensure a lockfile, install packages and build, collect the
//! executables, probe the binary, assemble the archive, and publish its
//! path. Every step except the version probe propagates its failure.

use crate::archive::{ArchiveName, ReleaseArchive, assemble_archive};
use crate::collect::collect_executables;
use crate::command::CommandExecutor;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::lockfile::ensure_lockfile;
use crate::output::record_archive;
use crate::plan::BuildPlan;
use crate::probe::{probe_version, report_probe};
use crate::report::Reporter;
use std::fs;
use std::io::Write;

/// Orchestrates a single packaging run.
pub struct ReleasePackager<'a> {
    config: &'a BuildConfig,
    executor: &'a dyn CommandExecutor,
    plan: BuildPlan,
}

impl<'a> ReleasePackager<'a> {
    /// Create a packager for `config`, running tools through `executor`.
    #[must_use]
    pub fn new(config: &'a BuildConfig, executor: &'a dyn CommandExecutor) -> Self {
        Self {
            config,
            executor,
            plan: BuildPlan::new(config),
        }
    }

    /// Run the full pipeline.
    ///
    /// Progress goes to `reporter`; when no output file is configured the
    /// output record is written to `stdout`.
    ///
    /// # Errors
    ///
    /// Returns the first failure from any step other than the version probe.
    pub fn run(
        &self,
        reporter: &mut Reporter<'_>,
        stdout: &mut dyn Write,
    ) -> Result<ReleaseArchive> {
        let config = self.config;

        reset_output_dir(config)?;
        ensure_lockfile(config, self.executor, reporter)?;
        self.plan.execute(self.executor, reporter)?;

        let collected = collect_executables(config, reporter)?;
        log::debug!(
            "removed {} dependency-info file(s) from {}",
            collected.removed_dep_info,
            config.release_dir()
        );

        report_probe(probe_version(self.executor, &config.binary_path()), reporter);

        let archive = assemble_archive(config, &collected.executables)?;
        reporter.progress(format_args!("Created {}", archive.path));
        reporter.progress(format_args!("SHA-256: {}", archive.sha256));

        record_archive(config, &archive, stdout, reporter)?;
        Ok(archive)
    }

    /// Describe the resolved configuration and plan without running it.
    #[must_use]
    pub fn describe(&self) -> String {
        let config = self.config;
        let output_file = config
            .output_file
            .as_ref()
            .map_or_else(|| "(stdout)".to_owned(), ToString::to_string);
        let mut lines = vec![
            "Dry run - no commands will be executed".to_owned(),
            String::new(),
            format!("Host OS: {}", config.os),
            format!("Target: {}", config.target),
            format!("Version: {}", config.version),
            format!("Workspace: {}", config.workspace),
            format!("Output directory: {}", config.output_dir),
            format!("Output file: {output_file}"),
            format!("Procedure: {}", self.plan.procedure),
            format!("Archive: {}", ArchiveName::for_config(config)),
            String::new(),
            "Commands:".to_owned(),
        ];
        if !config.workspace.join("Cargo.lock").is_file() {
            lines.push("  cargo generate-lockfile".to_owned());
        }
        lines.extend(
            self.plan
                .install
                .iter()
                .chain(std::iter::once(&self.plan.build))
                .map(|command| format!("  {command}")),
        );
        lines.join("\n")
    }
}

fn reset_output_dir(config: &BuildConfig) -> Result<()> {
    if config.output_dir.is_dir() {
        log::debug!("removing stale output directory {}", config.output_dir);
        fs::remove_dir_all(&config.output_dir)?;
    }
    fs::create_dir_all(&config.output_dir)?;
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
