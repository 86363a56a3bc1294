//! Scan coordinator.
//!
//! Fans one probe per port out over tokio tasks, capped by a semaphore,
//! and collects the results from a single channel. The report is only
//! built once every probe has come back.

pub mod heuristic;
pub mod report;
pub mod tcp;
pub mod traits;

pub use heuristic::{classify, ScanWarning, StatusLabel, FILTER_THRESHOLD_MS};
pub use report::{ReportEntry, ScanReport};
pub use tcp::TcpProber;
pub use traits::{ProbeResult, ProbeStatus, Prober};

use crate::error::{ScanError, ScanResult};
use crate::services;
use crate::types::{Port, ProbeTarget, TargetError, TargetSpec};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

/// Configuration for a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum number of probes with an open socket at any instant.
    pub concurrency: usize,
    /// Per-probe connect timeout.
    pub timeout: Duration,
    /// Draw a progress bar on stderr while probes run.
    pub show_progress: bool,
}

impl ScanConfig {
    pub const DEFAULT_CONCURRENCY: usize = 100;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            concurrency: Self::DEFAULT_CONCURRENCY,
            timeout: Self::DEFAULT_TIMEOUT,
            show_progress: false,
        }
    }

    /// Set the concurrency cap.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan `ports` on `host` with plain TCP connects.
pub async fn scan(host: &str, ports: &[Port], config: &ScanConfig) -> ScanResult<ScanReport> {
    scan_with(Arc::new(TcpProber::default()), host, ports, config).await
}

/// Scan `ports` on `host` using the given prober.
///
/// Resolves the host once before dispatching anything; a resolution
/// failure aborts the scan with [`ScanError::NetworkSetup`]. Duplicate
/// ports are probed once. The returned report holds exactly one entry per
/// distinct requested port, sorted ascending.
pub async fn scan_with<P: Prober>(
    prober: Arc<P>,
    host: &str,
    ports: &[Port],
    config: &ScanConfig,
) -> ScanResult<ScanReport> {
    if config.concurrency == 0 {
        return Err(ScanError::InvalidConfig(
            "concurrency must be at least 1".to_string(),
        ));
    }
    if config.concurrency > Semaphore::MAX_PERMITS {
        return Err(ScanError::InvalidConfig(format!(
            "concurrency must be at most {}",
            Semaphore::MAX_PERMITS
        )));
    }

    let setup_error = |e: TargetError| ScanError::NetworkSetup {
        host: host.to_string(),
        reason: e.to_string(),
    };
    let spec = TargetSpec::parse(host).map_err(setup_error)?;
    let ip = spec.resolve().await.map_err(setup_error)?;

    let ports: BTreeSet<Port> = ports.iter().copied().collect();
    debug!(
        %spec,
        %ip,
        ports = ports.len(),
        concurrency = config.concurrency,
        timeout_ms = config.timeout.as_millis() as u64,
        "dispatching probes"
    );

    let started = Instant::now();
    let progress = config.show_progress.then(|| progress_bar(ports.len()));
    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let (tx, mut rx) = mpsc::unbounded_channel();

    for &port in &ports {
        // Waiting here keeps at most `concurrency` tasks alive at once
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };

        let prober = Arc::clone(&prober);
        let tx = tx.clone();
        let progress = progress.clone();
        let target = ProbeTarget::new(host, ip, port);
        let limit = config.timeout;

        tokio::spawn(async move {
            let result = prober.probe(&target, limit).await;
            drop(permit);

            if let Some(ref pb) = progress {
                pb.inc(1);
                if result.is_open() {
                    pb.set_message(format!("open: {}", port));
                }
            }

            let _ = tx.send(result);
        });
    }
    drop(tx);

    // Completion order; nothing reads this until the channel is drained
    let mut results = Vec::with_capacity(ports.len());
    while let Some(result) = rx.recv().await {
        results.push(result);
    }

    if results.len() < ports.len() {
        let seen: HashSet<Port> = results.iter().map(|r| r.port).collect();
        for &port in ports.iter().filter(|p| !seen.contains(p)) {
            warn!(%port, "probe ended without a result, reporting port as closed");
            results.push(ProbeResult::new(
                port,
                ProbeStatus::Closed,
                services::lookup(port.as_u16()),
                Duration::ZERO,
            ));
        }
    }

    results.sort_unstable_by_key(|r| r.port);

    if let Some(pb) = progress {
        pb.finish_with_message("scan complete");
    }

    let report = ScanReport::assemble(host, ip, results, started.elapsed());
    info!(
        %host,
        open = report.open_count(),
        closed = report.closed_count(),
        filtered = report.filtered_count(),
        elapsed_ms = report.duration().as_millis() as u64,
        "scan finished"
    );

    Ok(report)
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    )
    .map(|s| s.progress_chars("=>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::Rng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sleeps a random few milliseconds and records how many probes overlap.
    #[derive(Default)]
    struct JitterProber {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Prober for JitterProber {
        async fn probe(&self, target: &ProbeTarget, _timeout: Duration) -> ProbeResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let jitter = rand::thread_rng().gen_range(0..4u64);
            tokio::time::sleep(Duration::from_millis(jitter)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let status = if target.port.as_u16() % 2 == 0 {
                ProbeStatus::Open
            } else {
                ProbeStatus::Closed
            };
            ProbeResult::new(target.port, status, "Unknown", Duration::from_millis(jitter))
        }
    }

    /// Reports every port as closed after a fixed, fabricated latency.
    struct FixedLatencyProber(Duration);

    #[async_trait]
    impl Prober for FixedLatencyProber {
        async fn probe(&self, target: &ProbeTarget, _timeout: Duration) -> ProbeResult {
            ProbeResult::new(target.port, ProbeStatus::Closed, "Unknown", self.0)
        }
    }

    /// Panics on one chosen port.
    struct PanickyProber(u16);

    #[async_trait]
    impl Prober for PanickyProber {
        async fn probe(&self, target: &ProbeTarget, _timeout: Duration) -> ProbeResult {
            if target.port.as_u16() == self.0 {
                panic!("probe blew up");
            }
            ProbeResult::new(target.port, ProbeStatus::Open, "Unknown", Duration::from_millis(1))
        }
    }

    fn ports(range: std::ops::RangeInclusive<u16>) -> Vec<Port> {
        range.filter_map(Port::new).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_report_complete_and_sorted_under_jitter() {
        let mut requested = ports(1..=300);
        requested.reverse();
        requested.extend(ports(10..=20));

        let prober = Arc::new(JitterProber::default());
        let config = ScanConfig::new().with_concurrency(50);
        let report = scan_with(Arc::clone(&prober), "127.0.0.1", &requested, &config)
            .await
            .unwrap();

        assert_eq!(report.len(), 300);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 300);
        let got: Vec<u16> = report.entries().iter().map(|e| e.result.port.as_u16()).collect();
        assert_eq!(got, (1..=300).collect::<Vec<u16>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bound() {
        let prober = Arc::new(JitterProber::default());
        let config = ScanConfig::new().with_concurrency(10);
        let report = scan_with(Arc::clone(&prober), "127.0.0.1", &ports(1..=1000), &config)
            .await
            .unwrap();

        assert_eq!(report.len(), 1000);
        let max = prober.max_in_flight.load(Ordering::SeqCst);
        assert!(max >= 1 && max <= 10, "max in flight was {}", max);
    }

    #[tokio::test]
    async fn test_unresolvable_host_probes_nothing() {
        let prober = Arc::new(JitterProber::default());
        let config = ScanConfig::new();
        let err = scan_with(Arc::clone(&prober), "no such host!", &ports(1..=5), &config)
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::NetworkSetup { .. }));
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected() {
        let config = ScanConfig::new().with_concurrency(0);
        let prober = Arc::new(JitterProber::default());
        let err = scan_with(prober, "127.0.0.1", &ports(1..=5), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_oversized_concurrency_rejected() {
        let config = ScanConfig::new().with_concurrency(usize::MAX);
        let prober = Arc::new(JitterProber::default());
        let err = scan_with(Arc::clone(&prober), "127.0.0.1", &ports(1..=1), &config)
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::InvalidConfig(_)));
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrency_at_permit_limit_accepted() {
        let config = ScanConfig::new().with_concurrency(Semaphore::MAX_PERMITS);
        let prober = Arc::new(JitterProber::default());
        let report = scan_with(prober, "127.0.0.1", &ports(1..=3), &config)
            .await
            .unwrap();
        assert_eq!(report.len(), 3);
    }

    #[tokio::test]
    async fn test_slow_closed_ports_raise_warning() {
        let prober = Arc::new(FixedLatencyProber(Duration::from_millis(1500)));
        let report = scan_with(prober, "127.0.0.1", &ports(100..=104), &ScanConfig::new())
            .await
            .unwrap();

        assert_eq!(report.warnings(), &[ScanWarning::PossibleFiltering]);
        assert!(report.entries().iter().all(|e| {
            e.label == StatusLabel::PossiblyFiltered && e.result.status == ProbeStatus::Closed
        }));
    }

    #[tokio::test]
    async fn test_lost_probe_still_reported() {
        let prober = Arc::new(PanickyProber(7));
        let report = scan_with(prober, "127.0.0.1", &ports(5..=9), &ScanConfig::new())
            .await
            .unwrap();

        assert_eq!(report.len(), 5);
        let lost = &report.entries()[2];
        assert_eq!(lost.result.port.as_u16(), 7);
        assert_eq!(lost.result.status, ProbeStatus::Closed);
    }

    #[tokio::test]
    async fn test_empty_port_set() {
        let prober = Arc::new(JitterProber::default());
        let report = scan_with(prober, "127.0.0.1", &[], &ScanConfig::new())
            .await
            .unwrap();
        assert!(report.is_empty());
        assert!(report.warnings().is_empty());
    }
}
