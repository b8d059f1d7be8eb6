//! Core data types for instance firewall rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One port range as currently known to the control plane.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PortState {
    pub from_port: i32,
    pub to_port: i32,
    pub protocol: Protocol,
    /// Whether the range is currently reachable at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PortStatus>,
    pub cidrs4: Vec<String>,
    pub cidrs6: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cidr_list_aliases: Vec<String>,
}

impl PortState {
    pub fn cidrs(&self, family: AddressFamily) -> &[String] {
        match family {
            AddressFamily::Ipv4 => &self.cidrs4,
            AddressFamily::Ipv6 => &self.cidrs6,
        }
    }

    /// `22`, or `8000-8080` for a real range.
    pub fn port_range(&self) -> String {
        format_range(self.from_port, self.to_port)
    }
}

/// One port range as it should be after the update.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PortRule {
    pub from_port: i32,
    pub to_port: i32,
    pub protocol: Protocol,
    pub cidrs4: Vec<String>,
    pub cidrs6: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cidr_list_aliases: Vec<String>,
}

impl PortRule {
    pub fn port_range(&self) -> String {
        format_range(self.from_port, self.to_port)
    }
}

fn format_range(from: i32, to: i32) -> String {
    if from == to {
        from.to_string()
    } else {
        format!("{from}-{to}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    All,
    Icmp,
    Icmpv6,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
            Protocol::All => write!(f, "all"),
            Protocol::Icmp => write!(f, "icmp"),
            Protocol::Icmpv6 => write!(f, "icmpv6"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_range_single_port() {
        let rule = PortRule {
            from_port: 22,
            to_port: 22,
            protocol: Protocol::Tcp,
            cidrs4: vec![],
            cidrs6: vec![],
            cidr_list_aliases: vec![],
        };
        assert_eq!(rule.port_range(), "22");
    }

    #[test]
    fn test_port_range_span() {
        let state = PortState {
            from_port: 8000,
            to_port: 8080,
            protocol: Protocol::Udp,
            state: None,
            cidrs4: vec!["0.0.0.0/0".to_string()],
            cidrs6: vec![],
            cidr_list_aliases: vec![],
        };
        assert_eq!(state.port_range(), "8000-8080");
        assert_eq!(state.cidrs(AddressFamily::Ipv4), ["0.0.0.0/0"]);
        assert!(state.cidrs(AddressFamily::Ipv6).is_empty());
    }

    #[test]
    fn test_protocol_wire_names() {
        let protocol: Protocol = serde_json::from_str("\"icmpv6\"").unwrap();
        assert_eq!(protocol, Protocol::Icmpv6);
        assert_eq!(serde_json::to_string(&Protocol::All).unwrap(), "\"all\"");
        assert_eq!(Protocol::Tcp.to_string(), "tcp");
    }
}
