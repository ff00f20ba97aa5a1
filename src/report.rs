//! Terminal rendering of diagnostics.

#![allow(clippy::print_stderr)]

use colored::Colorize;
use tsbind_common::{DiagnosticBag, DiagnosticCode, Severity};

/// Render the bag to stderr, colored by severity, errors first.
pub fn render_diagnostics(bag: &DiagnosticBag) {
    for severity in [Severity::Error, Severity::Warning, Severity::Info] {
        for d in bag.iter().filter(|d| d.severity == severity) {
            let tag = match severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
                Severity::Info => "info".dimmed(),
            };
            let mut line = format!("{} {}: {}", d.code.as_str().dimmed(), tag, d.message);
            if let Some(site) = &d.site {
                line.push_str(&format!(" {}", format!("[{site}]").dimmed()));
            }
            eprintln!("{line}");
        }
    }
}

/// Render the full diagnostic code table for `--list-diagnostics`.
pub fn render_code_table() {
    for code in DiagnosticCode::all() {
        println!(
            "{:<12} {:<8} {}",
            code.as_str(),
            code.severity().to_string(),
            code.description()
        );
    }
}
