//! Text (terminal) reporter with colors and formatting

use crate::models::{Report, Severity};
use anyhow::Result;

/// Severity colors (ANSI escape codes)
fn severity_color(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "\x1b[31m", // Red
        Severity::High => "\x1b[91m",     // Light red
        Severity::Medium => "\x1b[33m",   // Yellow
        Severity::Low => "\x1b[34m",      // Blue
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Severity tag
fn severity_tag(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "[C]",
        Severity::High => "[H]",
        Severity::Medium => "[M]",
        Severity::Low => "[L]",
    }
}

fn score_color(score: u32) -> &'static str {
    if score >= 80 {
        "\x1b[32m"
    } else if score >= 60 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    }
}

/// Render report as formatted terminal output
pub fn render(report: &Report) -> Result<String> {
    let mut out = String::new();

    let score_c = score_color(report.score);
    out.push_str(&format!("\n{BOLD}Clarityscan Report{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {score_c}{BOLD}{}/100{RESET}  Gas: {}  Fingerprint: {DIM}{}{RESET}\n\n",
        report.score, report.gas, report.fingerprint
    ));

    let fs = report.summary();
    out.push_str(&format!("{BOLD}FINDINGS{RESET} ({} total)\n", fs.total));

    let mut summary_parts = Vec::new();
    if fs.critical > 0 {
        summary_parts.push(format!("\x1b[31m{} critical{RESET}", fs.critical));
    }
    if fs.high > 0 {
        summary_parts.push(format!("\x1b[91m{} high{RESET}", fs.high));
    }
    if fs.medium > 0 {
        summary_parts.push(format!("\x1b[33m{} medium{RESET}", fs.medium));
    }
    if fs.low > 0 {
        summary_parts.push(format!("\x1b[34m{} low{RESET}", fs.low));
    }
    if !summary_parts.is_empty() {
        out.push_str(&format!("  {}\n", summary_parts.join(" | ")));
    }
    out.push('\n');

    for finding in &report.findings {
        let sev_c = severity_color(&finding.severity);
        let location = if finding.line > 0 {
            format!("L{}", finding.line)
        } else {
            "-".to_string()
        };
        out.push_str(&format!(
            "  {sev_c}{}{RESET}  {:<20}  {:<4}  {}\n",
            severity_tag(&finding.severity),
            finding.id,
            location,
            finding.message
        ));
    }

    if report.findings.is_empty() {
        out.push_str(&format!("  {DIM}No issues found.{RESET}\n"));
    }

    Ok(out)
}
