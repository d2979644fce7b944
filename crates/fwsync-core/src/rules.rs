//! Wire model for the firewall's inbound rule list
//!
//! Mirrors the Linode `/networking/firewalls/{id}/rules` payloads. Rules
//! this tool did not create are fetched and PUT back untouched, so the
//! model must round-trip losslessly: fields we do not interpret are kept
//! in a flattened passthrough map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transport protocol of an inbound rule
///
/// The synchronizer only ever creates TCP/UDP/ICMP rules, but `ALL` can
/// appear in rule sets created elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    All,
}

impl Protocol {
    /// Protocols the synchronizer manages, in rule-creation order
    pub const MANAGED: [Protocol; 3] = [Protocol::Tcp, Protocol::Udp, Protocol::Icmp];

    /// Wire name of the protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
            Protocol::All => "ALL",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source addresses an inbound rule accepts traffic from
///
/// The `ipv6` list is omitted from the wire format when absent; the
/// synchronizer never populates it (IPv4-only tool).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleAddresses {
    /// IPv4 CIDRs
    #[serde(default)]
    pub ipv4: Vec<String>,

    /// IPv6 CIDRs, omitted when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Vec<String>>,
}

/// One inbound firewall rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallRule {
    /// Rule label; the synchronizer's rules are `{label}-{PROTOCOL}`
    pub label: String,

    /// Rule action; always "ACCEPT" for rules this tool creates
    pub action: String,

    /// Transport protocol
    pub protocol: Protocol,

    /// Accepted source addresses
    pub addresses: RuleAddresses,

    /// Optional port range, omitted when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,

    /// Fields this tool does not model (id, description, ...).
    /// Must survive the GET → PUT round-trip untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FirewallRule {
    /// Build an ACCEPT rule for a single IPv4 CIDR
    pub fn accept(
        label: impl Into<String>,
        protocol: Protocol,
        ipv4_cidr: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            action: "ACCEPT".to_string(),
            protocol,
            addresses: RuleAddresses {
                ipv4: vec![ipv4_cidr.into()],
                ipv6: None,
            },
            ports: None,
            extra: Map::new(),
        }
    }

    /// The label the synchronizer uses for one protocol of a rule group
    pub fn scoped_label(label: &str, protocol: Protocol) -> String {
        format!("{label}-{protocol}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accept_rule_serializes_without_ipv6_or_ports() {
        let rule = FirewallRule::accept("home-TCP", Protocol::Tcp, "203.0.113.7/32");
        let value = serde_json::to_value(&rule).unwrap();

        assert_eq!(
            value,
            json!({
                "label": "home-TCP",
                "action": "ACCEPT",
                "protocol": "TCP",
                "addresses": { "ipv4": ["203.0.113.7/32"] },
            })
        );
    }

    #[test]
    fn unmodeled_fields_survive_round_trip() {
        let wire = json!({
            "label": "ssh-anywhere",
            "action": "ACCEPT",
            "protocol": "TCP",
            "ports": "22",
            "addresses": { "ipv4": ["0.0.0.0/0"], "ipv6": ["::/0"] },
            "id": 12345,
            "description": "created in the console",
        });

        let rule: FirewallRule = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(rule.extra.get("id"), Some(&json!(12345)));

        let back = serde_json::to_value(&rule).unwrap();
        assert_eq!(back, wire);
    }

    #[test]
    fn scoped_label_suffixes_protocol_name() {
        assert_eq!(
            FirewallRule::scoped_label("home", Protocol::Icmp),
            "home-ICMP"
        );
    }

    #[test]
    fn protocol_parses_uppercase_wire_names() {
        let all: Protocol = serde_json::from_value(json!("ALL")).unwrap();
        assert_eq!(all, Protocol::All);
        assert!(serde_json::from_value::<Protocol>(json!("tcp")).is_err());
    }
}
