// NetBox REST API types
//
// Read models cover only the fields the sync engine needs; NetBox
// returns far more, and unknown fields are ignored. Write models use
// `skip_serializing_if` so a PATCH only touches the fields that
// actually changed.

use serde::{Deserialize, Serialize};

// ── Envelope ─────────────────────────────────────────────────────────

/// Standard NetBox list envelope with cursor pagination.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<T>,
}

// ── Shared fragments ─────────────────────────────────────────────────

/// Minimal reference to a related object (site, role, platform, tag...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NbRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// NetBox "choice" fields serialize as `{value, label}`; only the value
/// matters here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeValue {
    pub value: String,
}

/// Reference to an IP address, as embedded in `primary_ip4`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NbIpRef {
    pub id: i64,
    pub address: String,
}

// ── Device ───────────────────────────────────────────────────────────

/// Custom fields on devices and device-types.
///
/// The same field set appears on both: on a device they are the live
/// values, on a device-type they are the template defaults. All
/// optional, and all skipped on write when unset so a partial update
/// never clobbers unrelated fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceCustomFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub becs_oid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_timeperiod: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_interfaces: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_oxidized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_grafana: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_icinga: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_librenms: Option<bool>,
}

impl DeviceCustomFields {
    /// True when no field is set (nothing to send).
    pub fn is_empty(&self) -> bool {
        self.becs_oid.is_none()
            && self.parents.is_none()
            && self.alarm_destination.is_none()
            && self.alarm_timeperiod.is_none()
            && self.alarm_interfaces.is_none()
            && self.backup_oxidized.is_none()
            && self.connection_method.is_none()
            && self.monitor_grafana.is_none()
            && self.monitor_icinga.is_none()
            && self.monitor_librenms.is_none()
    }
}

/// Device as returned by `dcim/devices/`.
#[derive(Debug, Clone, Deserialize)]
pub struct NbDevice {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub device_type: Option<NbDeviceTypeRef>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub primary_ip4: Option<NbIpRef>,
    #[serde(default)]
    pub custom_fields: DeviceCustomFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NbDeviceTypeRef {
    pub id: i64,
    #[serde(default)]
    pub model: String,
}

/// Payload for `POST dcim/devices/`.
#[derive(Debug, Serialize)]
pub struct DeviceCreate {
    pub name: String,
    pub device_type: i64,
    pub role: i64,
    pub site: i64,
    pub platform: i64,
    pub enabled: bool,
    pub tags: Vec<i64>,
    pub custom_fields: DeviceCustomFields,
}

/// Partial payload for `PATCH dcim/devices/{id}/`.
///
/// `primary_ip4` is doubly optional: `None` means leave untouched,
/// `Some(None)` serializes as JSON `null` and clears the pointer.
#[derive(Debug, Default, Serialize)]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_ip4: Option<Option<i64>>,
    #[serde(skip_serializing_if = "DeviceCustomFields::is_empty")]
    pub custom_fields: DeviceCustomFields,
}

impl DeviceUpdate {
    /// True when the update carries no change at all.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.device_type.is_none()
            && self.primary_ip4.is_none()
            && self.custom_fields.is_empty()
    }
}

// ── Interface ────────────────────────────────────────────────────────

/// Interface as returned by `dcim/interfaces/`.
#[derive(Debug, Clone, Deserialize)]
pub struct NbInterface {
    pub id: i64,
    pub device: NbRef,
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_: Option<TypeValue>,
    #[serde(default)]
    pub enabled: bool,
    /// Carries the BECS cross-reference as `becs_oid=N`.
    #[serde(default)]
    pub label: String,
}

/// Payload for `POST dcim/interfaces/`.
#[derive(Debug, Serialize)]
pub struct InterfaceCreate {
    pub device: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub enabled: bool,
    pub label: String,
    pub tags: Vec<i64>,
}

/// Partial payload for `PATCH dcim/interfaces/{id}/`.
#[derive(Debug, Default, Serialize)]
pub struct InterfaceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl InterfaceUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.type_.is_none() && self.enabled.is_none() && self.label.is_none()
    }
}

// ── IP address ───────────────────────────────────────────────────────

/// Custom fields on ip-addresses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressCustomFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub becs_oid: Option<i64>,
}

/// IP address as returned by `ipam/ip-addresses/`.
#[derive(Debug, Clone, Deserialize)]
pub struct NbIpAddress {
    pub id: i64,
    pub address: String,
    #[serde(default)]
    pub assigned_object_id: Option<i64>,
    #[serde(default)]
    pub custom_fields: AddressCustomFields,
}

/// Payload for `POST ipam/ip-addresses/`.
#[derive(Debug, Serialize)]
pub struct IpAddressCreate {
    pub assigned_object_type: String,
    pub assigned_object_id: i64,
    pub address: String,
    pub status: String,
    pub custom_fields: AddressCustomFields,
}

impl IpAddressCreate {
    /// Address assigned to an interface, active, cross-referenced to BECS.
    pub fn on_interface(interface_id: i64, address: &str, becs_oid: i64) -> Self {
        Self {
            assigned_object_type: "dcim.interface".into(),
            assigned_object_id: interface_id,
            address: address.into(),
            status: "active".into(),
            custom_fields: AddressCustomFields {
                becs_oid: Some(becs_oid),
            },
        }
    }
}

// ── Device type ──────────────────────────────────────────────────────

/// Device type (hardware model) with template custom fields.
#[derive(Debug, Clone, Deserialize)]
pub struct NbDeviceType {
    pub id: i64,
    pub model: String,
    #[serde(default)]
    pub custom_fields: DeviceCustomFields,
}

/// Interface template attached to a device type. Supplies the hardware
/// type for interfaces BECS knows only by name.
#[derive(Debug, Clone, Deserialize)]
pub struct NbInterfaceTemplate {
    pub id: i64,
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_: Option<TypeValue>,
}
