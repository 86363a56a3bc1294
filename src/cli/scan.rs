//! Scan command implementation.
//!
//! Resolves settings, runs the scan, renders it, then writes any requested
//! export files.

use super::Cli;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::scanner::{scan_with, ScanConfig, ScanReport, TcpProber};
use std::sync::Arc;
use tracing::{debug, warn};

/// Descriptors kept free for stdio, DNS, and export files.
const RESERVED_FDS: u64 = 32;

impl Cli {
    /// Execute the scan.
    pub async fn execute(&self) -> CliResult<()> {
        let settings = self.settings()?;
        let spec = self.port_spec(&settings)?;
        let ports = spec.to_ports();
        let concurrency = self.concurrency(&settings);

        check_fd_limit(concurrency, self.quiet);

        if !self.quiet {
            output::print_scan_header(&self.target, &spec.to_string(), ports.len());
        }

        let mut config = ScanConfig::new()
            .with_concurrency(concurrency)
            .with_timeout(self.timeout(&settings));
        if self.verbose {
            config = config.with_progress();
        }

        let prober = Arc::new(TcpProber::new(Arc::new(settings.service_table())));
        let report = scan_with(prober, &self.target, &ports, &config).await?;

        output::print_report(&report, self.open_only)?;

        self.export(&report)
    }

    /// Write export files. A failed export leaves the printed report intact,
    /// and one format failing does not stop the other from being written.
    fn export(&self, report: &ScanReport) -> CliResult<()> {
        let json = match &self.json {
            Some(path) => output::write_json(report, path)
                .map(|()| self.confirm("JSON", path))
                .map_err(|source| CliError::Export {
                    format: "JSON",
                    source,
                }),
            None => Ok(()),
        };

        let csv = match &self.csv {
            Some(path) => output::write_csv(report, path)
                .map(|()| self.confirm("CSV", path))
                .map_err(|source| CliError::Export {
                    format: "CSV",
                    source,
                }),
            None => Ok(()),
        };

        match (json, csv) {
            (Err(first), Err(second)) => {
                output::print_error(&second.chain());
                Err(first)
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
            _ => Ok(()),
        }
    }

    fn confirm(&self, format: &str, path: &std::path::Path) {
        debug!(format, path = %path.display(), "report exported");
        if !self.quiet {
            output::print_success(&format!("{} report written to {}", format, path.display()));
        }
    }
}

/// Warn when the concurrency cap would not fit in the open-file limit.
fn check_fd_limit(concurrency: usize, quiet: bool) {
    let Some(limit) = open_file_limit() else {
        return;
    };

    if exceeds_fd_limit(concurrency, limit) {
        warn!(concurrency, limit, "concurrency exceeds open file limit");
        if !quiet {
            output::print_warning(&format!(
                "concurrency {} is close to the open file limit ({}); some ports may be reported closed",
                concurrency, limit
            ));
            output::print_info("lower --concurrency or raise the limit with `ulimit -n`");
        }
    }
}

fn exceeds_fd_limit(concurrency: usize, limit: u64) -> bool {
    (concurrency as u64).saturating_add(RESERVED_FDS) > limit
}

#[cfg(unix)]
fn open_file_limit() -> Option<u64> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: getrlimit only writes into the struct it is given.
    let rc = unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut limit) };
    (rc == 0).then_some(limit.rlim_cur as u64)
}

#[cfg(not(unix))]
fn open_file_limit() -> Option<u64> {
    None
}
