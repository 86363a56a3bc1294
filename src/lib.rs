//! # portprobe - A Concurrent TCP Port Reachability Probe
//!
//! portprobe connects to every requested port on one host, a bounded
//! number at a time, and reports each port as open or closed along with how
//! long the verdict took. Closed ports that took longer than a second to give
//! up are flagged as possibly filtered.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portprobe::scanner::{scan, ScanConfig};
//! use portprobe::types::PortSpec;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ports = PortSpec::common().to_ports();
//!     let config = ScanConfig::new()
//!         .with_concurrency(50)
//!         .with_timeout(Duration::from_millis(500));
//!
//!     let report = scan("192.168.1.1", &ports, &config).await.unwrap();
//!     for entry in report.entries() {
//!         println!("{} {} {}", entry.result.port, entry.label, entry.result.service);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports, port sets and probe targets
//! - [`scanner`] - The scan coordinator, the TCP prober and the filtering heuristic
//! - [`services`] - Port to service name lookup
//! - [`config`] - Settings file handling
//! - [`output`] - Console rendering and JSON/CSV export
//! - [`cli`] - Command-line front end
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ExportError, ScanError};
pub use scanner::{scan, scan_with, ProbeResult, ProbeStatus, Prober, ScanConfig, ScanReport};
pub use types::{Port, PortSpec, ProbeTarget, TargetSpec};
