//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::{ScanReport, StatusLabel};
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "───────────────────────────────────────────────────────";

/// Print the finished report to stdout.
///
/// Rows come out in port order. Global warnings follow the table. With
/// `open_only`, closed and possibly filtered rows are hidden; counts and
/// warnings still cover every port.
pub fn print_report(report: &ScanReport, open_only: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, open_only)
}

fn write_report<W: Write>(out: &mut W, report: &ScanReport, open_only: bool) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {} {}", style("Target:").bold(), report.target())?;
    writeln!(out, "  {} {}", style("IP Address:").bold(), report.ip_address())?;
    writeln!(
        out,
        "  {} {} ports probed in {:.2}s",
        style("Statistics:").bold(),
        report.len(),
        report.duration().as_secs_f64()
    )?;
    writeln!(
        out,
        "               {} open, {} closed, {} possibly filtered",
        style(report.open_count()).green().bold(),
        style(report.closed_count()).red(),
        style(report.filtered_count()).yellow()
    )?;
    writeln!(out)?;

    let rows: Vec<_> = report
        .entries()
        .iter()
        .filter(|e| !open_only || e.label == StatusLabel::Open)
        .collect();

    if rows.is_empty() {
        writeln!(out, "  {}", style("No ports to display.").dim())?;
    } else {
        writeln!(out, "  {}", style(RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:<18}  {:<16}  {:>12}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("SERVICE").bold(),
            style("LATENCY").bold()
        )?;
        writeln!(out, "  {}", style(RULE).dim())?;

        for entry in rows {
            let status_style = match entry.label {
                StatusLabel::Open => Style::new().green().bold(),
                StatusLabel::Closed => Style::new().red(),
                StatusLabel::PossiblyFiltered => Style::new().yellow(),
            };

            writeln!(
                out,
                "  {:>6}  {:<18}  {:<16}  {:>9.2} ms",
                entry.result.port.as_u16(),
                status_style.apply_to(entry.label.to_string()),
                entry.result.service,
                entry.result.latency_ms
            )?;
        }

        writeln!(out, "  {}", style(RULE).dim())?;
    }

    for warning in report.warnings() {
        writeln!(out, "  {} {}", style("Warning:").yellow().bold(), warning)?;
    }
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, ports: &str, count: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portprobe").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{} Target: {}", style("•").dim(), style(target).white().bold());
    println!(
        "{} Probing {} ports ({})...",
        style("•").dim(),
        style(count).white().bold(),
        ports
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}
