//! TCP connect prober.
//!
//! Performs a full TCP connect through the operating system's socket API.
//! No elevated privileges are needed. The stream is dropped as soon as the
//! verdict is known, so no socket outlives its probe.

use crate::scanner::traits::{ProbeResult, ProbeStatus, Prober};
use crate::services::ServiceTable;
use crate::types::ProbeTarget;
use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{timeout, Instant};
use tracing::trace;

/// Why a connect attempt ended the way it did.
///
/// Only [`ConnectOutcome::Connected`] maps to an open port. Every other
/// variant collapses to [`ProbeStatus::Closed`]; callers outside the prober
/// tell them apart by latency alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConnectOutcome {
    Connected,
    Refused,
    TimedOut,
    Unreachable(String),
    Failed(String),
}

impl ConnectOutcome {
    fn from_io(err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::ConnectionRefused {
            return Self::Refused;
        }
        let msg = err.to_string();
        if msg.to_lowercase().contains("unreachable") {
            Self::Unreachable(msg)
        } else {
            Self::Failed(msg)
        }
    }

    pub(crate) fn status(&self) -> ProbeStatus {
        match self {
            Self::Connected => ProbeStatus::Open,
            _ => ProbeStatus::Closed,
        }
    }
}

/// Drive one connect attempt under `limit` and time it.
///
/// The clock starts right before the attempt and stops as soon as it
/// resolves. A successful stream is dropped before this returns.
pub(crate) async fn timed_connect<F>(connect: F, limit: Duration) -> (ConnectOutcome, Duration)
where
    F: Future<Output = io::Result<TcpStream>>,
{
    let start = Instant::now();
    let attempt = timeout(limit, connect).await;
    let elapsed = start.elapsed();

    let outcome = match attempt {
        Ok(Ok(_stream)) => ConnectOutcome::Connected,
        Ok(Err(e)) => ConnectOutcome::from_io(&e),
        Err(_) => ConnectOutcome::TimedOut,
    };

    (outcome, elapsed)
}

/// Prober that uses plain TCP connects.
#[derive(Debug, Clone)]
pub struct TcpProber {
    services: Arc<ServiceTable>,
}

impl TcpProber {
    pub fn new(services: Arc<ServiceTable>) -> Self {
        Self { services }
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(Arc::new(ServiceTable::well_known()))
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, target: &ProbeTarget, limit: Duration) -> ProbeResult {
        let addr = target.socket_addr();
        let (outcome, elapsed) = timed_connect(TcpStream::connect(addr), limit).await;

        trace!(
            dest = %target,
            %addr,
            ?outcome,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "probe finished"
        );

        let service = self.services.lookup(target.port.as_u16());
        ProbeResult::new(target.port, outcome.status(), service, elapsed)
    }
}
