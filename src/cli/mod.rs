//! Command-line interface definitions for portprobe.
//!
//! Uses `clap` derive macros for declarative argument parsing.

mod scan;

use crate::config::AppSettings;
use crate::error::ConfigResult;
use crate::types::{Port, PortError, PortSpec};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Probe which TCP ports on a host accept connections.
///
/// Every port is reported as open, closed, or possibly filtered. A closed
/// port counts as possibly filtered when the connect attempt took longer
/// than one second to fail.
#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP port reachability probe", long_about = None)]
pub struct Cli {
    /// Target IP address or hostname
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// First port of the range
    #[arg(value_name = "START_PORT", conflicts_with = "quick")]
    pub start_port: Option<u16>,

    /// Last port of the range
    #[arg(value_name = "END_PORT", requires = "start_port")]
    pub end_port: Option<u16>,

    /// Probe the common-ports list instead of a range
    #[arg(long)]
    pub quick: bool,

    /// Write the report as JSON to FILE
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Write the report as CSV to FILE
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Maximum number of probes in flight at once
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Connection timeout in milliseconds
    #[arg(short = 't', long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Show only open ports in the console table
    #[arg(long)]
    pub open_only: bool,

    /// Show a progress bar and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the header and export confirmations
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "PORTPROBE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load settings from `--config`, or from the default location.
    pub fn settings(&self) -> ConfigResult<AppSettings> {
        match &self.config {
            Some(path) => AppSettings::load_from(path),
            None => AppSettings::load(),
        }
    }

    /// The port set selected on the command line.
    ///
    /// `--quick` uses the settings' quick list. Otherwise the range runs
    /// from `START_PORT` (default 1) to `END_PORT` (default 65535).
    pub fn port_spec(&self, settings: &AppSettings) -> Result<PortSpec, PortError> {
        if self.quick {
            return settings.quick_port_spec();
        }
        PortSpec::from_bounds(
            self.start_port.unwrap_or(Port::MIN),
            self.end_port.unwrap_or(Port::MAX),
        )
    }

    pub fn concurrency(&self, settings: &AppSettings) -> usize {
        self.concurrency.unwrap_or(settings.default_concurrency)
    }

    pub fn timeout(&self, settings: &AppSettings) -> Duration {
        Duration::from_millis(self.timeout.unwrap_or(settings.default_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("portprobe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_range_is_full() {
        let cli = parse(&["127.0.0.1"]);
        let spec = cli.port_spec(&AppSettings::default()).unwrap();
        assert_eq!(spec.count(), 65535);
    }

    #[test]
    fn test_explicit_range() {
        let cli = parse(&["example.com", "20", "25"]);
        let spec = cli.port_spec(&AppSettings::default()).unwrap();
        assert_eq!(spec.to_string(), "20-25");
    }

    #[test]
    fn test_start_only_runs_to_max() {
        let cli = parse(&["example.com", "65530"]);
        assert_eq!(cli.port_spec(&AppSettings::default()).unwrap().count(), 6);
    }

    #[test]
    fn test_quick_conflicts_with_range() {
        let args = ["portprobe", "127.0.0.1", "1", "100", "--quick"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_quick_uses_common_ports() {
        let cli = parse(&["127.0.0.1", "--quick"]);
        let spec = cli.port_spec(&AppSettings::default()).unwrap();
        assert_eq!(spec.count(), PortSpec::common().count());
    }

    #[test]
    fn test_invalid_range_rejected() {
        let cli = parse(&["127.0.0.1", "0", "10"]);
        assert_eq!(
            cli.port_spec(&AppSettings::default()).unwrap_err(),
            PortError::OutOfRange(0)
        );
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = AppSettings::default();
        let cli = parse(&["127.0.0.1", "-c", "10", "-t", "250", "--json", "out.json"]);
        assert_eq!(cli.concurrency(&settings), 10);
        assert_eq!(cli.timeout(&settings), Duration::from_millis(250));
        assert_eq!(cli.json, Some(PathBuf::from("out.json")));

        let cli = parse(&["127.0.0.1"]);
        assert_eq!(cli.concurrency(&settings), 100);
        assert_eq!(cli.timeout(&settings), Duration::from_secs(1));
    }
}
