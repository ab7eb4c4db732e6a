//! Crowbook release packager CLI entrypoint.
//!
//! This binary runs as a CI workflow step: it builds crowbook for one target
//! and publishes the resulting archive path for later steps.

use clap::Parser;
use crowbook_packager::cli::Cli;
use crowbook_packager::command::SystemCommandExecutor;
use crowbook_packager::config::BuildConfig;
use crowbook_packager::error::Result;
use crowbook_packager::pipeline::ReleasePackager;
use crowbook_packager::report::{Reporter, write_stderr_line};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let mut stdout = std::io::stdout();
    let run_result = run(cli, &mut stderr, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: Cli, stderr: &mut dyn Write, stdout: &mut dyn Write) -> Result<()> {
    let dry_run = cli.dry_run;
    let quiet = cli.quiet;
    let config = BuildConfig::new(cli.into_settings()?)?;
    let executor = SystemCommandExecutor;
    let packager = ReleasePackager::new(&config, &executor);

    if dry_run {
        write_stderr_line(stderr, packager.describe());
        return Ok(());
    }

    let mut reporter = Reporter::new(stderr, quiet);
    let archive = packager.run(&mut reporter, stdout)?;
    reporter.progress(format_args!("Packaged {}", archive.name));
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format_args!("::error::{err}"));
            1
        }
    }
}
