//! Service name lookup for well-known ports.
//!
//! The mapping is plain data: a static table that callers can extend or
//! replace through [`ServiceTable::with_overrides`].

use std::collections::HashMap;
use std::sync::LazyLock;

/// Label returned for ports with no known service.
pub const UNKNOWN_SERVICE: &str = "Unknown";

/// Well-known TCP services.
pub const WELL_KNOWN_SERVICES: &[(u16, &str)] = &[
    (20, "ftp-data"),
    (21, "ftp"),
    (22, "ssh"),
    (23, "telnet"),
    (25, "smtp"),
    (53, "domain"),
    (69, "tftp"),
    (80, "http"),
    (88, "kerberos"),
    (110, "pop3"),
    (111, "sunrpc"),
    (119, "nntp"),
    (123, "ntp"),
    (135, "msrpc"),
    (139, "netbios-ssn"),
    (143, "imap"),
    (161, "snmp"),
    (179, "bgp"),
    (389, "ldap"),
    (443, "https"),
    (445, "microsoft-ds"),
    (465, "smtps"),
    (514, "shell"),
    (587, "submission"),
    (631, "ipp"),
    (636, "ldaps"),
    (873, "rsync"),
    (993, "imaps"),
    (995, "pop3s"),
    (1080, "socks"),
    (1194, "openvpn"),
    (1433, "ms-sql-s"),
    (1521, "oracle"),
    (1723, "pptp"),
    (1883, "mqtt"),
    (2049, "nfs"),
    (2375, "docker"),
    (3128, "squid"),
    (3306, "mysql"),
    (3389, "ms-wbt-server"),
    (5060, "sip"),
    (5432, "postgresql"),
    (5672, "amqp"),
    (5900, "vnc"),
    (6379, "redis"),
    (6443, "kubernetes-api"),
    (8000, "http-alt"),
    (8080, "http-proxy"),
    (8443, "https-alt"),
    (9092, "kafka"),
    (9200, "elasticsearch"),
    (11211, "memcached"),
    (27017, "mongodb"),
];

static DEFAULT_TABLE: LazyLock<ServiceTable> = LazyLock::new(ServiceTable::well_known);

/// A port to service-name mapping.
#[derive(Debug, Clone, Default)]
pub struct ServiceTable {
    names: HashMap<u16, String>,
}

impl ServiceTable {
    /// A table holding only [`WELL_KNOWN_SERVICES`].
    pub fn well_known() -> Self {
        Self::from_pairs(WELL_KNOWN_SERVICES.iter().copied())
    }

    /// Build a table from arbitrary `(port, name)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u16, S)>,
        S: Into<String>,
    {
        Self {
            names: pairs.into_iter().map(|(p, s)| (p, s.into())).collect(),
        }
    }

    /// Layer user-supplied names over this table. Overrides win.
    pub fn with_overrides(mut self, overrides: &HashMap<u16, String>) -> Self {
        self.names.extend(overrides.iter().map(|(p, s)| (*p, s.clone())));
        self
    }

    /// Service label for `port`, or [`UNKNOWN_SERVICE`].
    pub fn lookup(&self, port: u16) -> &str {
        self.names
            .get(&port)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SERVICE)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Look up a port in the built-in table.
pub fn lookup(port: u16) -> &'static str {
    DEFAULT_TABLE.lookup(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_ports() {
        assert_eq!(lookup(22), "ssh");
        assert_eq!(lookup(80), "http");
        assert_eq!(lookup(443), "https");
        assert_eq!(lookup(3306), "mysql");
    }

    #[test]
    fn test_unknown_port() {
        assert_eq!(lookup(12345), "Unknown");
        assert_eq!(ServiceTable::default().lookup(22), UNKNOWN_SERVICE);
    }

    #[test]
    fn test_table_size() {
        assert!(ServiceTable::well_known().len() >= 14);
    }

    #[test]
    fn test_overrides() {
        let overrides = HashMap::from([(8080, "jenkins".to_string()), (4000, "dev".to_string())]);
        let table = ServiceTable::well_known().with_overrides(&overrides);
        assert_eq!(table.lookup(8080), "jenkins");
        assert_eq!(table.lookup(4000), "dev");
        assert_eq!(table.lookup(22), "ssh");
    }
}
