//! Latency-based filtering heuristic.
//!
//! A closed port that took longer than [`FILTER_THRESHOLD_MS`] to give up
//! most likely had its SYN dropped by a firewall rather than refused by the
//! host. This is a guess, not a proof: no statistics beyond the fixed
//! threshold are applied.

use crate::scanner::report::ReportEntry;
use crate::scanner::traits::{ProbeResult, ProbeStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed results slower than this many milliseconds are flagged.
pub const FILTER_THRESHOLD_MS: f64 = 1000.0;

/// Label shown for a port after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusLabel {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "closed")]
    Closed,
    #[serde(rename = "possibly filtered")]
    PossiblyFiltered,
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::PossiblyFiltered => write!(f, "possibly filtered"),
        }
    }
}

/// A warning that applies to the scan as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanWarning {
    /// Every closed port answered slowly.
    PossibleFiltering,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PossibleFiltering => write!(
                f,
                "all closed ports responded slowly; a firewall may be filtering this host"
            ),
        }
    }
}

fn is_slow(result: &ProbeResult) -> bool {
    result.latency_ms > FILTER_THRESHOLD_MS
}

/// Label a single result.
pub fn label_for(result: &ProbeResult) -> StatusLabel {
    match result.status {
        ProbeStatus::Open => StatusLabel::Open,
        ProbeStatus::Closed if is_slow(result) => StatusLabel::PossiblyFiltered,
        ProbeStatus::Closed => StatusLabel::Closed,
    }
}

/// Annotate an ordered result set.
///
/// Input order is preserved. The raw status of every result is left as is;
/// labels and warnings are stored next to it.
pub fn classify(results: Vec<ProbeResult>) -> (Vec<ReportEntry>, Vec<ScanWarning>) {
    let mut closed = results.iter().filter(|r| r.status == ProbeStatus::Closed).peekable();

    let mut warnings = Vec::new();
    if closed.peek().is_some() && closed.all(is_slow) {
        warnings.push(ScanWarning::PossibleFiltering);
    }

    let entries = results
        .into_iter()
        .map(|result| {
            let label = label_for(&result);
            ReportEntry { result, label }
        })
        .collect();

    (entries, warnings)
}
