// ── Desired state ──
//
// What NetBox should look like, derived from the BECS element tree.
// Keyed by FQDN at the device level and by interface name below that;
// the BECS oid rides along on every entity as the cross-system key.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How the device is managed, derived from its hardware model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMethod {
    Ssh,
    Telnet,
}

impl ConnectionMethod {
    /// ASR5xxx chassis only speak telnet; everything else gets ssh.
    pub fn from_model(model: &str) -> Self {
        if model.starts_with("ASR5") {
            Self::Telnet
        } else {
            Self::Ssh
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Telnet => "telnet",
        }
    }
}

/// An IPv4 address desired on an interface, CIDR notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredAddress {
    /// Oid of the resource object holding the address.
    pub oid: i64,
    /// `address/prefixlen`, e.g. `10.0.0.1/32`.
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredInterface {
    pub oid: i64,
    pub name: String,
    /// Free-form role string from BECS, informational only.
    pub role: Option<String>,
    pub enabled: bool,
    pub prefix4: Vec<DesiredAddress>,
    /// Present in the source but not reconciled yet.
    pub prefix6: Vec<DesiredAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesiredDevice {
    pub oid: i64,
    /// Fully-qualified, lowercased device name.
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub role: Option<String>,
    pub platform: Option<String>,
    pub enabled: bool,
    pub connection_method: ConnectionMethod,
    pub alarm_destination: Option<String>,
    pub alarm_timeperiod: Option<String>,
    /// Upstream device FQDNs, topology order preserved.
    pub parents: Vec<String>,
    /// Keyed by interface name.
    pub interfaces: IndexMap<String, DesiredInterface>,
}

impl DesiredDevice {
    /// View of the interfaces keyed by BECS oid.
    pub fn interfaces_by_oid(&self) -> IndexMap<i64, &DesiredInterface> {
        self.interfaces.values().map(|i| (i.oid, i)).collect()
    }

    pub fn interface_by_oid(&self, oid: i64) -> Option<&DesiredInterface> {
        self.interfaces.values().find(|i| i.oid == oid)
    }
}
