//! Console presentation
//!
//! Pure rendering over already-loaded data. `render_*` functions build the
//! text, `print_*` functions write it to stdout.

use crate::cli::OutputFormat;
use crate::config::ConfigStore;
use crate::provider::Provider;
use crate::report::{BehaviorReport, CheckStatus, ReportSection};
use anyhow::{Context, Result};
use colored::{Color, ColoredString, Colorize};
use std::fmt::Write as _;
use std::path::Path;
use tabled::{Table, Tabled};

pub const BANNER: &str = r"
    ___                    __     ____                           __
   /   | ____ ____  ____  / /_   /  _/___  _________  ___  _____/ /_____  _____
  / /| |/ __ `/ _ \/ __ \/ __/   / // __ \/ ___/ __ \/ _ \/ ___/ __/ __ \/ ___/
 / ___ / /_/ /  __/ / / / /_   _/ // / / (__  ) /_/ /  __/ /__/ /_/ /_/ / /
/_/  |_\__, /\___/_/ /_/\__/  /___/_/ /_/____/ .___/\___/\___/\__/\____/_/
      /____/                                /_/
";

pub const TAGLINE: &str =
    "Agent Inspector helps you debug, inspect, and evaluate agent behaviour and risk.";

/// Appended to every known-issue line
pub const REPORT_HINT: &str = "(run with --show-report for the full report)";

pub fn render_banner() -> String {
    format!("{}\n{}", BANNER.cyan(), TAGLINE.magenta())
}

pub fn print_banner() {
    println!("{}", render_banner());
}

/// Colored, fixed-width label for a check status
pub fn status_label(status: CheckStatus) -> ColoredString {
    match status {
        CheckStatus::Ok => "[ OK ]".green().bold(),
        CheckStatus::Warn => "[WARN]".yellow().bold(),
        CheckStatus::Fail => "[FAIL]".red().bold(),
    }
}

/// Heading color for a section, taken from its worst check
pub fn section_color(section: &ReportSection) -> Color {
    match section.worst_status() {
        Some(CheckStatus::Fail) => Color::Red,
        Some(CheckStatus::Warn) => Color::Yellow,
        Some(CheckStatus::Ok) => Color::Green,
        None => Color::BrightCyan,
    }
}

/// Literal contents of every bundled configuration
pub fn render_configs(store: &ConfigStore) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", "Available configurations:\n".green().bold())?;

    for provider in Provider::ALL {
        let contents = store
            .read_raw(provider)
            .with_context(|| format!("Failed to read {} configuration", provider))?;
        writeln!(out, "{}", format!("[{}]", provider).bright_blue().bold())?;
        writeln!(out, "{}", contents.trim_end())?;
        writeln!(out)?;
    }

    Ok(out)
}

pub fn print_configs(store: &ConfigStore) -> Result<()> {
    print!("{}", render_configs(store)?);
    Ok(())
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "Check")]
    check: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

// Status cells carry ANSI colors; tabled's `ansi` feature keeps them out of
// the column width.
fn checks_table(rows: Vec<CheckRow>) -> Table {
    Table::new(rows)
}

/// Human-readable report with one metrics and one checks table per section
pub fn render_report(report: &BehaviorReport) -> Result<String> {
    let mut out = String::new();

    writeln!(out)?;
    writeln!(out, "{}", report.title.bright_cyan().bold().underline())?;
    if !report.source.is_empty() {
        writeln!(out, "{}", format!("Source: {}", report.source).dimmed())?;
    }

    for section in &report.sections {
        writeln!(out)?;
        writeln!(out, "{}", section.title.color(section_color(section)).bold())?;
        if !section.description.is_empty() {
            writeln!(out, "{}", section.description)?;
        }

        if !section.metrics.is_empty() {
            let rows = section.metrics.iter().map(|m| MetricRow {
                metric: m.label.clone(),
                value: m.value.clone(),
            });
            writeln!(out, "{}", Table::new(rows))?;
        }

        if !section.checks.is_empty() {
            let rows = section
                .checks
                .iter()
                .map(|c| CheckRow {
                    check: c.label.clone(),
                    status: status_label(c.status).to_string(),
                    detail: c.detail.clone(),
                })
                .collect();
            writeln!(out, "{}", checks_table(rows))?;
        }
    }

    let (ok, warn, fail) = report.status_counts();
    writeln!(out)?;
    writeln!(
        out,
        "Checks: {} passed, {} warnings, {} failed",
        ok.to_string().green(),
        warn.to_string().yellow(),
        fail.to_string().red()
    )?;

    Ok(out)
}

/// Print the report in the requested format
pub fn print_report(report: &BehaviorReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print!("{}", render_report(report)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(report)?),
    }
    Ok(())
}

/// Warning block shown before launch; empty when there are no issues
pub fn render_known_issues(issues: &[String]) -> String {
    if issues.is_empty() {
        return String::new();
    }

    let mut out = format!("{}\n", "Known issues detected:".red().bold());
    for issue in issues {
        out.push_str(&format!("{}\n", format!("- {} {}", issue, REPORT_HINT).red()));
    }
    out.push('\n');
    out
}

pub fn print_known_issues(issues: &[String]) {
    print!("{}", render_known_issues(issues));
}

pub fn print_loading(provider: Provider) {
    println!(
        "{}",
        format!("Agent Inspector loading the {} perimeter profile...", provider).green()
    );
}

pub fn print_using_config(path: &Path) {
    println!("{}", format!("Using config: {}", path.display()).bright_black());
}

pub fn print_interrupted() {
    println!();
    println!("{}", "Interrupted. Shutting down…".yellow());
}

/// Error line on stderr
pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}
