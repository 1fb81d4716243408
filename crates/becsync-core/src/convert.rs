// ── NetBox wire types -> mirror model ──
//
// Flattens the three NetBox result sets (devices, interfaces, addresses)
// into the nested [`ActualDevice`] shape the reconciler compares
// against. The cross-system key travels differently per entity: devices
// and addresses carry a `becs_oid` custom field, interfaces encode it in
// their label as `becs_oid=N`.

use indexmap::IndexMap;

use becsync_api::netbox::{NbDevice, NbInterface, NbIpAddress};

use crate::model::{ActualAddress, ActualDevice, ActualInterface};
use crate::naming;

/// Parse a `becs_oid=N` interface label. Anything else is no key.
pub fn parse_becs_label(label: &str) -> Option<i64> {
    label.strip_prefix("becs_oid=")?.parse().ok()
}

/// Render the interface label for oid `N`.
pub fn format_becs_label(oid: i64) -> String {
    format!("becs_oid={oid}")
}

/// Join one device with its interfaces and their addresses.
pub fn assemble_device(
    device: &NbDevice,
    interfaces: &[NbInterface],
    addresses: &[NbIpAddress],
) -> ActualDevice {
    let mut assembled: IndexMap<String, ActualInterface> = IndexMap::new();
    for iface in interfaces.iter().filter(|i| i.device.id == device.id) {
        let prefix4 = addresses
            .iter()
            .find(|a| a.assigned_object_id == Some(iface.id))
            .map(|a| ActualAddress {
                id: a.id,
                address: a.address.clone(),
                becs_oid: a.custom_fields.becs_oid,
            });
        assembled.insert(
            iface.name.clone(),
            ActualInterface {
                id: iface.id,
                becs_oid: parse_becs_label(&iface.label),
                name: iface.name.clone(),
                type_value: iface.type_.as_ref().map(|t| t.value.clone()),
                enabled: iface.enabled,
                prefix4,
            },
        );
    }

    let cf = &device.custom_fields;
    ActualDevice {
        id: device.id,
        name: device.name.clone(),
        becs_oid: cf.becs_oid,
        model: device
            .device_type
            .as_ref()
            .map(|t| t.model.clone())
            .unwrap_or_default(),
        enabled: device.enabled,
        // Stored verbatim; no domain qualification so compares stay
        // stable against what was written.
        parents: cf
            .parents
            .as_deref()
            .map(|p| naming::commastr_to_list(p, ""))
            .unwrap_or_default(),
        alarm_destination: cf.alarm_destination.clone(),
        alarm_timeperiod: cf.alarm_timeperiod.clone(),
        alarm_interfaces: cf.alarm_interfaces,
        backup_oxidized: cf.backup_oxidized,
        connection_method: cf.connection_method.clone(),
        monitor_grafana: cf.monitor_grafana,
        monitor_icinga: cf.monitor_icinga,
        monitor_librenms: cf.monitor_librenms,
        primary_ip4: device.primary_ip4.as_ref().map(|ip| ActualAddress {
            id: ip.id,
            address: ip.address.clone(),
            becs_oid: None,
        }),
        interfaces: assembled,
    }
}

/// Assemble the full device mirror, keyed by device name.
pub fn assemble_devices(
    devices: &[NbDevice],
    interfaces: &[NbInterface],
    addresses: &[NbIpAddress],
) -> IndexMap<String, ActualDevice> {
    devices
        .iter()
        .map(|d| (d.name.clone(), assemble_device(d, interfaces, addresses)))
        .collect()
}
