//! The finished, immutable scan report.

use crate::scanner::heuristic::{self, ScanWarning, StatusLabel};
use crate::scanner::traits::ProbeResult;
use std::net::IpAddr;
use std::time::Duration;

/// One classified row of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// The raw probe result.
    pub result: ProbeResult,
    /// Label derived by the filtering heuristic.
    pub label: StatusLabel,
}

/// Results of a completed scan, ordered ascending by port.
///
/// Built only by the coordinator once every probe has reported. There are
/// no mutating accessors.
#[derive(Debug, Clone)]
pub struct ScanReport {
    target: String,
    ip_address: IpAddr,
    entries: Vec<ReportEntry>,
    warnings: Vec<ScanWarning>,
    duration: Duration,
}

impl ScanReport {
    /// Classify sorted results and seal them into a report.
    pub(crate) fn assemble(
        target: impl Into<String>,
        ip_address: IpAddr,
        results: Vec<ProbeResult>,
        duration: Duration,
    ) -> Self {
        debug_assert!(results.windows(2).all(|w| w[0].port < w[1].port));
        let (entries, warnings) = heuristic::classify(results);

        Self {
            target: target.into(),
            ip_address,
            entries,
            warnings,
            duration,
        }
    }

    /// Target as the user typed it.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn ip_address(&self) -> IpAddr {
        self.ip_address
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Wall time from first dispatch to last result.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn count(&self, label: StatusLabel) -> usize {
        self.entries.iter().filter(|e| e.label == label).count()
    }

    pub fn open_count(&self) -> usize {
        self.count(StatusLabel::Open)
    }

    pub fn closed_count(&self) -> usize {
        self.count(StatusLabel::Closed)
    }

    pub fn filtered_count(&self) -> usize {
        self.count(StatusLabel::PossiblyFiltered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::traits::ProbeStatus;
    use crate::types::Port;
    use std::net::Ipv4Addr;

    fn result(port: u16, status: ProbeStatus, service: &str, millis: u64) -> ProbeResult {
        let port = Port::new(port).unwrap();
        ProbeResult::new(port, status, service, Duration::from_millis(millis))
    }

    #[test]
    fn test_counts() {
        let results = vec![
            result(22, ProbeStatus::Open, "ssh", 2),
            result(23, ProbeStatus::Closed, "telnet", 1),
            result(24, ProbeStatus::Closed, "Unknown", 1800),
        ];
        let report = ScanReport::assemble(
            "localhost",
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            results,
            Duration::from_secs(2),
        );

        assert_eq!(report.len(), 3);
        assert_eq!(report.open_count(), 1);
        assert_eq!(report.closed_count(), 1);
        assert_eq!(report.filtered_count(), 1);
        assert!(report.warnings().is_empty());
        assert_eq!(report.target(), "localhost");
    }
}
