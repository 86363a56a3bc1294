//! Target types: host specifications and per-port probe targets.
//!
//! A target is either an IP literal or a hostname. Hostnames are resolved
//! once, before any probe is dispatched.

use super::Port;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// One `(host, port)` pair handed to a prober. Built once per port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeTarget {
    /// The host as the user typed it.
    pub host: String,
    /// The address the host resolved to.
    pub ip: IpAddr,
    /// Port to connect to.
    pub port: Port,
}

impl ProbeTarget {
    pub fn new(host: impl Into<String>, ip: IpAddr, port: Port) -> Self {
        Self {
            host: host.into(),
            ip,
            port,
        }
    }

    /// Socket address for the connect call.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port.as_u16())
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Error type for target parsing and resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target format: {0}")]
    InvalidFormat(String),
    #[error("failed to resolve hostname '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
}

/// A target specification: an IP literal or a hostname to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A single IP address.
    Single(IpAddr),
    /// A hostname to be resolved.
    Hostname(String),
}

impl TargetSpec {
    /// Parse a target specification from a string.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let s = s.trim();

        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self::Single(ip));
        }

        if is_valid_hostname(s) {
            return Ok(Self::Hostname(s.to_string()));
        }

        Err(TargetError::InvalidFormat(s.to_string()))
    }

    /// Resolve to a single address, preferring IPv4 when a name has both.
    pub async fn resolve(&self) -> Result<IpAddr, TargetError> {
        match self {
            Self::Single(ip) => Ok(*ip),

            Self::Hostname(hostname) => {
                let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|_| {
                    TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
                });

                let response = resolver.lookup_ip(hostname.as_str()).await.map_err(|e| {
                    TargetError::DnsResolutionFailed(hostname.clone(), e.to_string())
                })?;

                let ips: Vec<IpAddr> = response.iter().collect();
                ips.iter()
                    .find(|ip| ip.is_ipv4())
                    .or_else(|| ips.first())
                    .copied()
                    .ok_or_else(|| TargetError::NoAddressesFound(hostname.clone()))
            }
        }
    }
}

impl FromStr for TargetSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(ip) => write!(f, "{}", ip),
            Self::Hostname(hostname) => write!(f, "{}", hostname),
        }
    }
}

/// Check if a string looks like a DNS name worth handing to the resolver.
///
/// One trailing dot (a fully qualified name) is accepted, and so are
/// underscores, which show up in aliases and service records.
fn is_valid_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    // Labels are 1-63 characters, no leading or trailing hyphen
    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.chars().next().is_some_and(is_word)
            && label.chars().last().is_some_and(is_word)
            && label.chars().all(|c| is_word(c) || c == '-')
    })
}
