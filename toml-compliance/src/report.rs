//! Runs checks over named cases and reports the results.
//!
//! Each case prints one ` PASS ` or ` FAIL ` line. Failures are followed by
//! their reasons (indented two spaces) and details (indented four). A summary
//! closes the report. Only [`CheckError::Failed`] is caught per case; a fatal
//! error stops the run and is returned to the caller.

use std::io::Write;

use colored::{ColoredString, Colorize};
use tracing::{info, warn};

use crate::error::{CheckError, ComplianceError};
use crate::failure::Failure;

/// Pass and fail counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    passed: usize,
    failed: usize,
}

impl RunCounters {
    /// Number of cases that passed.
    #[must_use]
    pub const fn passed(&self) -> usize {
        self.passed
    }

    /// Number of cases that failed.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Number of cases that ran.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Process exit code: `1` when anything failed or nothing ran.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.failed > 0 || self.total() == 0 { 1 } else { 0 }
    }

    const fn record(&mut self, has_passed: bool) {
        if has_passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Writes report lines, optionally with ANSI colours.
struct Printer<'w, W> {
    out: &'w mut W,
    is_colored: bool,
}

impl<W: Write> Printer<'_, W> {
    fn paint(&self, text: &str, style: fn(ColoredString) -> ColoredString) -> String {
        if self.is_colored {
            style(text.normal()).to_string()
        } else {
            text.to_owned()
        }
    }

    fn pass(&mut self, name: &str) -> std::io::Result<()> {
        let badge = self.paint(" PASS ", |s| s.black().on_green());
        let label = self.paint(name, |s| s.cyan());
        writeln!(self.out, "{badge} {label}")
    }

    fn fail(&mut self, name: &str, failure: &Failure) -> std::io::Result<()> {
        let badge = self.paint(" FAIL ", |s| s.black().on_red());
        let label = self.paint(name, |s| s.cyan());
        writeln!(self.out, "{badge} {label}")?;

        let reasons = indent(&failure.to_string(), "  ");
        writeln!(self.out, "{}", self.paint(&reasons, |s| s.red()))?;
        if let Some(details) = failure.details() {
            writeln!(self.out, "{}", indent(&details.to_string(), "    "))?;
        }
        Ok(())
    }

    fn summary(&mut self, counters: RunCounters) -> std::io::Result<()> {
        if counters.total() == 0 {
            let message = self.paint("No tests were selected!", |s| s.red());
            return writeln!(self.out, "{message}");
        }
        let passed_text = format!("{} passed", counters.passed());
        let passed = if counters.passed() > 0 {
            self.paint(&passed_text, |s| s.green())
        } else {
            self.paint(&passed_text, |s| s.red())
        };
        writeln!(self.out)?;
        writeln!(self.out, "Summary: {passed}, {} total", counters.total())
    }
}

/// Prefixes every non-blank line of `text` with `prefix`.
#[must_use]
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_owned()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs `check` once per named case, writing the report to `out`.
///
/// # Errors
///
/// Returns the first fatal error raised by a check, or
/// [`ComplianceError::Report`] when `out` cannot be written.
pub fn run_with_reporting<W, C, F, I>(
    out: &mut W,
    is_colored: bool,
    mut check: F,
    cases: I,
) -> Result<RunCounters, ComplianceError>
where
    W: Write,
    F: FnMut(&C) -> Result<(), CheckError>,
    I: IntoIterator<Item = (String, C)>,
{
    let mut printer = Printer { out, is_colored };
    let mut counters = RunCounters::default();

    for (name, case) in cases {
        match check(&case) {
            Ok(()) => {
                printer.pass(&name).map_err(ComplianceError::Report)?;
                counters.record(true);
            }
            Err(CheckError::Failed(failure)) => {
                printer.fail(&name, &failure).map_err(ComplianceError::Report)?;
                counters.record(false);
            }
            Err(CheckError::Fatal(err)) => return Err(err),
        }
    }

    printer.summary(counters).map_err(ComplianceError::Report)?;
    if counters.total() == 0 {
        warn!("no tests were selected");
    }
    info!(
        passed = counters.passed(),
        failed = counters.failed(),
        total = counters.total(),
        "run finished"
    );
    Ok(counters)
}
