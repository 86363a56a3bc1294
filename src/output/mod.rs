//! Output formatting module.
//!
//! Console rendering plus JSON and CSV export of finished reports. Export
//! rows keep the field names and order `port, status, service,
//! response_time` that existing consumers parse.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{read_csv, write_csv};
pub use json_format::{read_json, write_json};
pub use plain::{
    print_error, print_info, print_report, print_scan_header, print_success, print_warning,
};

use crate::scanner::{ReportEntry, ScanReport, StatusLabel};
use serde::{Deserialize, Serialize};

/// One exported report row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub port: u16,
    pub status: StatusLabel,
    pub service: String,
    /// Milliseconds, at full precision.
    pub response_time: f64,
}

impl From<&ReportEntry> for ExportRow {
    fn from(entry: &ReportEntry) -> Self {
        Self {
            port: entry.result.port.as_u16(),
            status: entry.label,
            service: entry.result.service.clone(),
            response_time: entry.result.latency_ms,
        }
    }
}

/// Export rows for every entry of `report`, in report order.
pub fn export_rows(report: &ScanReport) -> Vec<ExportRow> {
    report.entries().iter().map(ExportRow::from).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::scanner::{ProbeResult, ProbeStatus, ScanReport};
    use crate::types::Port;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn result(port: u16, status: ProbeStatus, service: &str, latency_ms: f64) -> ProbeResult {
        ProbeResult {
            port: Port::new(port).unwrap(),
            status,
            service: service.to_string(),
            latency_ms,
        }
    }

    pub fn sample_report() -> ScanReport {
        let results = vec![
            result(22, ProbeStatus::Open, "ssh", 1.234567891),
            result(81, ProbeStatus::Closed, "Unknown", 0.25),
            result(8443, ProbeStatus::Closed, "https-alt", 1000.456789),
        ];
        ScanReport::assemble(
            "example.test",
            IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10)),
            results,
            Duration::from_secs(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_rows() {
        let report = test_support::sample_report();
        let rows = export_rows(&report);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].status, StatusLabel::Open);
        assert_eq!(rows[1].status, StatusLabel::Closed);
        assert_eq!(rows[2].status, StatusLabel::PossiblyFiltered);
        for (row, entry) in rows.iter().zip(report.entries()) {
            assert_eq!(row.response_time, entry.result.latency_ms);
        }
    }
}
