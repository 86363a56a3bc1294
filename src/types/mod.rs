//! Core type definitions using newtype patterns for type safety.

mod port;
mod target;

pub use port::{Port, PortError, PortRange, PortSpec, COMMON_PORTS};
pub use target::{ProbeTarget, TargetError, TargetSpec};
