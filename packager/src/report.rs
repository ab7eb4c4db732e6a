//! Progress and diagnostic output for CI logs.
//!
//! Warnings and errors use GitHub Actions workflow-command annotations so
//! they surface in the job summary, not just the raw log.

use std::fmt::Display;
use std::io::Write;

/// Writes a single line, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Line-oriented reporter over an arbitrary writer.
pub struct Reporter<'a> {
    out: &'a mut dyn Write,
    quiet: bool,
}

impl<'a> Reporter<'a> {
    /// Create a reporter. In quiet mode only warnings and errors are written.
    #[must_use]
    pub fn new(out: &'a mut dyn Write, quiet: bool) -> Self {
        Self { out, quiet }
    }

    /// Report routine progress.
    pub fn progress(&mut self, message: impl Display) {
        if !self.quiet {
            write_stderr_line(self.out, message);
        }
    }

    /// Report a non-fatal problem.
    pub fn warning(&mut self, message: impl Display) {
        log::warn!("{message}");
        write_stderr_line(self.out, format_args!("::warning::{message}"));
    }

    /// Report a problem that does not stop the run but indicates a defect.
    pub fn error(&mut self, message: impl Display) {
        log::error!("{message}");
        write_stderr_line(self.out, format_args!("::error::{message}"));
    }
}
