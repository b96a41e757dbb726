//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! The report is the only thing written to stdout. Warnings and errors go to
//! stderr, and warnings respect the quiet flag. Debug detail is a logging
//! concern (see [`crate::logging`]), not a verbosity level.

use std::fmt::Display;

use crate::core::config::OutputFormat;
use crate::core::query::RepositoryReport;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
}

impl Verbosity {
    /// Create verbosity from the quiet flag.
    pub fn from_quiet(quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Render a report in the requested format.
///
/// JSON output is pretty-printed and ends with a newline, like the text form.
pub fn render_report(
    report: &RepositoryReport,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(report)?)),
        OutputFormat::Text => Ok(report.to_text()),
    }
}
