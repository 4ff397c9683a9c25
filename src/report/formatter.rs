// SPDX-License-Identifier: PMPL-1.0-or-later

//! Console formatting for sessions and bundled dashboards

use crate::render::DashboardSchema;
use crate::session::{SelectionState, SessionSummary};
use colored::*;

pub struct SummaryFormatter;

impl SummaryFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, summary: &SessionSummary) {
        println!("\n{}", format!("=== {} ===", summary.dashboard.to_uppercase()).bold().cyan());

        let status = if summary.loaded {
            "LOADED".green()
        } else {
            "FAILED".red()
        };
        println!("  Status: {}", status);
        if let Some(source) = &summary.source {
            println!("  Source: {}", source);
        }
        println!("  Language: {}", summary.language.code().bold());

        match &summary.selection {
            SelectionState::Unselected => println!("  Selection: {}", "none".dimmed()),
            SelectionState::Selected(id) => println!(
                "  Selection: {} ({})",
                id.bold(),
                summary.title_annotation
            ),
        }
        println!(
            "  Cards: {} ({} highlighted)",
            summary.cards,
            summary.highlighted.to_string().yellow()
        );
        if !summary.selectables.is_empty() {
            println!("  Selectable: {}", summary.selectables.join(", "));
        }
        if !summary.expanded_layers.is_empty() {
            println!("  Expanded layers: {}", summary.expanded_layers.join(", "));
        }
        if summary.error_fragments > 0 {
            println!("  {}", "Data could not be loaded; error fragment shown".red());
        }
    }

    pub fn print_dashboards(&self, schemas: &[DashboardSchema]) {
        println!("{}", "BUNDLED DASHBOARDS".bold().yellow());
        for schema in schemas {
            let kinds: Vec<&str> = schema.sections.iter().map(|s| s.kind()).collect();
            println!("  {} [{}]", schema.name.bold(), kinds.join(", "));
            for candidate in schema.candidates() {
                println!("    {}", candidate.dimmed());
            }
        }
    }
}

impl Default for SummaryFormatter {
    fn default() -> Self {
        Self::new()
    }
}
