//! Prober trait abstraction and the values it produces.
//!
//! The coordinator only talks to probers through [`Prober`], which lets
//! tests swap in instrumented or jittered implementations.

use crate::types::{Port, ProbeTarget};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Raw network verdict for a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// The connection attempt succeeded.
    Open,
    /// The attempt was refused, failed, or timed out.
    Closed,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Outcome of probing a single port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The port that was probed.
    pub port: Port,
    /// Raw verdict. The filtering heuristic never rewrites this.
    pub status: ProbeStatus,
    /// Expected service on this port.
    pub service: String,
    /// Time from connect start to verdict, in milliseconds.
    pub latency_ms: f64,
}

impl ProbeResult {
    /// Create a new probe result.
    pub fn new(
        port: Port,
        status: ProbeStatus,
        service: impl Into<String>,
        latency: Duration,
    ) -> Self {
        Self {
            port,
            status,
            service: service.into(),
            latency_ms: latency.as_secs_f64() * 1000.0,
        }
    }

    /// Check if the port is open.
    pub fn is_open(&self) -> bool {
        self.status == ProbeStatus::Open
    }
}

/// Trait for single-port probe implementations.
///
/// Implementations must never fail: any transport problem is reported as
/// [`ProbeStatus::Closed`] with the elapsed time, so one bad port cannot
/// abort a batch.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    /// Probe one target, giving up after `timeout`.
    async fn probe(&self, target: &ProbeTarget, timeout: Duration) -> ProbeResult;
}
