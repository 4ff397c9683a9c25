// SPDX-License-Identifier: PMPL-1.0-or-later

//! Page output and console summaries

pub mod formatter;
pub mod output;

use crate::session::SessionSummary;

pub use formatter::SummaryFormatter;
pub use output::OutputFormat;

/// Print a session summary to the console
pub fn print_summary(summary: &SessionSummary) {
    SummaryFormatter::new().print(summary);
}
