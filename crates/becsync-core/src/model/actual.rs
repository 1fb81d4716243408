// ── Actual state ──
//
// The locally mirrored view of NetBox, shaped for comparison against
// the desired state and persisted between runs as a snapshot. NetBox
// numeric ids are kept so mutations can address the right objects; the
// becs_oid fields carry the cross-system identity where one has been
// established.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualAddress {
    /// NetBox ip-address id.
    pub id: i64,
    /// CIDR notation, as NetBox stores it.
    pub address: String,
    pub becs_oid: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualInterface {
    /// NetBox interface id.
    pub id: i64,
    /// Cross-system key, parsed from the interface label.
    pub becs_oid: Option<i64>,
    pub name: String,
    /// NetBox interface type value, e.g. `1000base-t` or `virtual`.
    pub type_value: Option<String>,
    pub enabled: bool,
    /// The single managed IPv4 address, if any.
    pub prefix4: Option<ActualAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActualDevice {
    /// NetBox device id.
    pub id: i64,
    pub name: String,
    pub becs_oid: Option<i64>,
    pub model: String,
    pub enabled: bool,
    pub parents: Vec<String>,
    pub alarm_destination: Option<String>,
    pub alarm_timeperiod: Option<String>,
    pub alarm_interfaces: Option<bool>,
    pub backup_oxidized: Option<bool>,
    pub connection_method: Option<String>,
    pub monitor_grafana: Option<bool>,
    pub monitor_icinga: Option<bool>,
    pub monitor_librenms: Option<bool>,
    pub primary_ip4: Option<ActualAddress>,
    /// Keyed by interface name.
    pub interfaces: IndexMap<String, ActualInterface>,
}

impl ActualDevice {
    /// Interfaces that carry a cross-system key, keyed by that oid.
    pub fn interfaces_by_oid(&self) -> IndexMap<i64, &ActualInterface> {
        self.interfaces
            .values()
            .filter_map(|i| i.becs_oid.map(|oid| (oid, i)))
            .collect()
    }

    pub fn interface_by_oid(&self, oid: i64) -> Option<&ActualInterface> {
        self.interfaces.values().find(|i| i.becs_oid == Some(oid))
    }
}
