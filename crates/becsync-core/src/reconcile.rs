// ── Reconciler ──
//
// Drives NetBox toward the desired state in six phases per run:
//
//   1. device set        delete stale, create missing, adopt by name
//   2. device settings   one combined PATCH per device
//   3. interface set     delete stale, adopt by name, create missing
//   4. interface updates collision-safe renames (and template types)
//   5. address removal   stale addresses out, primary pointer cleared
//   6. address creation  missing addresses in, loopback drives primary
//
// Planning is pure and separately testable; the async methods execute a
// plan against NetBox and refresh the mirror after mutating. Rejected
// mutations are accumulated per device and the run continues; transport
// and cache-consistency faults abort the run.

use std::collections::{HashMap, HashSet};
use std::mem;

use indexmap::IndexMap;
use tracing::{info, warn};

use becsync_api::netbox::{
    DeviceCreate, DeviceCustomFields, DeviceUpdate, InterfaceCreate, InterfaceUpdate,
    IpAddressCreate,
};
use becsync_api::NetboxClient;

use crate::config::SyncConfig;
use crate::convert::{self, format_becs_label};
use crate::desired::DesiredDevices;
use crate::error::CoreError;
use crate::mirror::NetboxMirror;
use crate::model::{ActualDevice, DesiredDevice};
use crate::naming;

// ── Run outcome ──────────────────────────────────────────────────────

/// One rejected mutation, attributed to a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncError {
    pub name: String,
    pub message: String,
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// What a run did: how many mutations were issued and which ones the
/// target declined.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub errors: Vec<SyncError>,
    pub mutations: u64,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

// ── Device-type template ─────────────────────────────────────────────

/// Per-model defaults fetched from NetBox once per run: the custom-field
/// template values and the named interface templates with their types.
#[derive(Debug, Clone)]
pub struct DeviceTypeTemplate {
    pub id: i64,
    pub custom_fields: DeviceCustomFields,
    /// Interface name -> template type value.
    pub interfaces: IndexMap<String, Option<String>>,
}

// ── Planning (pure) ──────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeviceSetPlan {
    /// `(name, netbox id)` of devices to delete.
    pub delete: Vec<(String, i64)>,
    /// Oids of desired devices to create.
    pub create: Vec<i64>,
    /// `(name, oid)` of existing devices to adopt via the cross-reference.
    pub set_oid: Vec<(String, i64)>,
}

impl DeviceSetPlan {
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.create.is_empty() && self.set_oid.is_empty()
    }
}

/// Phase 1 plan: compare the mirrored device set against the desired
/// one. Cross-referenced devices match by oid; unclaimed ones match by
/// name and get adopted rather than recreated.
pub fn plan_device_sets(
    actual: &IndexMap<String, ActualDevice>,
    desired: &DesiredDevices,
) -> DeviceSetPlan {
    let desired_by_oid = desired.by_oid();
    let claimed: HashSet<i64> = actual.values().filter_map(|d| d.becs_oid).collect();

    let mut plan = DeviceSetPlan::default();
    for (name, device) in actual {
        match device.becs_oid {
            Some(oid) if !desired_by_oid.contains_key(&oid) => {
                plan.delete.push((name.clone(), device.id));
            }
            None => match desired.get(name) {
                Some(want) => {
                    if !claimed.contains(&want.oid) {
                        plan.set_oid.push((name.clone(), want.oid));
                    }
                }
                // Unlinked and not wanted under this name.
                None => plan.delete.push((name.clone(), device.id)),
            },
            _ => {}
        }
    }
    for (name, want) in desired.iter() {
        if !claimed.contains(&want.oid) && !actual.contains_key(name) {
            plan.create.push(want.oid);
        }
    }
    plan
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

/// Phase 2 plan: one combined device PATCH.
///
/// `enabled`, `parents` and the hardware model always follow the
/// desired state. The remaining custom fields are backfilled only when
/// empty in NetBox, from the desired state first and the device-type
/// defaults second, so operator overrides survive.
pub fn build_device_update(
    actual: &ActualDevice,
    desired: &DesiredDevice,
    template: Option<&DeviceTypeTemplate>,
) -> DeviceUpdate {
    let mut update = DeviceUpdate::default();
    if actual.enabled != desired.enabled {
        update.enabled = Some(desired.enabled);
    }
    if actual.parents != desired.parents {
        update.custom_fields.parents = Some(naming::list_to_commastr(&desired.parents));
    }
    if !desired.model.is_empty() && actual.model != desired.model {
        if let Some(template) = template {
            update.device_type = Some(template.id);
        }
    }

    let cf = &mut update.custom_fields;
    if is_blank(actual.alarm_destination.as_deref()) {
        cf.alarm_destination = desired.alarm_destination.clone();
    }
    if is_blank(actual.alarm_timeperiod.as_deref()) {
        cf.alarm_timeperiod = desired.alarm_timeperiod.clone();
    }
    if is_blank(actual.connection_method.as_deref()) {
        cf.connection_method = Some(desired.connection_method.as_str().to_owned());
    }
    if let Some(template) = template {
        let defaults = &template.custom_fields;
        // The template only fills what the source left unresolved.
        if is_blank(actual.alarm_destination.as_deref()) && cf.alarm_destination.is_none() {
            cf.alarm_destination = defaults.alarm_destination.clone();
        }
        if is_blank(actual.alarm_timeperiod.as_deref()) && cf.alarm_timeperiod.is_none() {
            cf.alarm_timeperiod = defaults.alarm_timeperiod.clone();
        }
        if is_blank(actual.connection_method.as_deref()) && cf.connection_method.is_none() {
            cf.connection_method = defaults.connection_method.clone();
        }
        if actual.alarm_interfaces.is_none() {
            cf.alarm_interfaces = defaults.alarm_interfaces;
        }
        if actual.backup_oxidized.is_none() {
            cf.backup_oxidized = defaults.backup_oxidized;
        }
        if actual.monitor_grafana.is_none() {
            cf.monitor_grafana = defaults.monitor_grafana;
        }
        if actual.monitor_icinga.is_none() {
            cf.monitor_icinga = defaults.monitor_icinga;
        }
        if actual.monitor_librenms.is_none() {
            cf.monitor_librenms = defaults.monitor_librenms;
        }
    }
    update
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct InterfaceSetPlan {
    /// `(id, name)` of interfaces to delete.
    pub delete: Vec<(i64, String)>,
    /// `(id, oid)` of same-named interfaces to adopt via the label.
    pub adopt: Vec<(i64, i64)>,
    /// Oids of desired interfaces to create.
    pub create: Vec<i64>,
}

impl InterfaceSetPlan {
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.adopt.is_empty() && self.create.is_empty()
    }
}

/// Phase 3 plan, same matching rules as the device set: oid first,
/// unclaimed name second.
pub fn plan_interface_sets(actual: &ActualDevice, desired: &DesiredDevice) -> InterfaceSetPlan {
    let desired_by_oid = desired.interfaces_by_oid();
    let claimed: HashSet<i64> = actual
        .interfaces
        .values()
        .filter_map(|i| i.becs_oid)
        .collect();

    let mut plan = InterfaceSetPlan::default();
    for iface in actual.interfaces.values() {
        match iface.becs_oid {
            Some(oid) if !desired_by_oid.contains_key(&oid) => {
                plan.delete.push((iface.id, iface.name.clone()));
            }
            None => {
                if let Some(want) = desired.interfaces.get(&iface.name) {
                    if !claimed.contains(&want.oid) {
                        plan.adopt.push((iface.id, want.oid));
                    }
                }
            }
            _ => {}
        }
    }
    for want in desired.interfaces.values() {
        if !claimed.contains(&want.oid) && !actual.interfaces.contains_key(&want.name) {
            plan.create.push(want.oid);
        }
    }
    plan
}

/// Hardware type for a new interface: the device-type template entry
/// wins; otherwise anything named like an ethernet port is copper,
/// the rest is virtual.
pub fn infer_interface_type(template: Option<&DeviceTypeTemplate>, name: &str) -> String {
    if let Some(value) = template
        .and_then(|t| t.interfaces.get(name))
        .and_then(Option::as_deref)
    {
        return value.to_owned();
    }
    if name.to_lowercase().contains("ethernet") {
        "1000base-t".to_owned()
    } else {
        "virtual".to_owned()
    }
}

/// One pending interface PATCH, keyed by the interface's current name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdate {
    pub id: i64,
    pub name: Option<String>,
    pub type_: Option<String>,
}

/// Phase 4 plan: renames and type corrections for cross-referenced
/// interfaces. The type is corrected only when the device-type template
/// explicitly names the interface; heuristic types, like the enabled
/// flag, are set once at creation and never churned.
pub fn plan_interface_updates(
    actual: &ActualDevice,
    desired: &DesiredDevice,
    template: Option<&DeviceTypeTemplate>,
) -> IndexMap<String, PendingUpdate> {
    let mut pending = IndexMap::new();
    for iface in actual.interfaces.values() {
        let Some(oid) = iface.becs_oid else { continue };
        let Some(want) = desired.interface_by_oid(oid) else {
            continue;
        };
        let mut update = PendingUpdate {
            id: iface.id,
            name: None,
            type_: None,
        };
        if iface.name != want.name {
            update.name = Some(want.name.clone());
        }
        if let Some(expected) = template
            .and_then(|t| t.interfaces.get(&want.name))
            .and_then(Option::as_deref)
        {
            if iface.type_value.as_deref() != Some(expected) {
                update.type_ = Some(expected.to_owned());
            }
        }
        if update.name.is_some() || update.type_.is_some() {
            pending.insert(iface.name.clone(), update);
        }
    }
    pending
}

/// First pending update whose rename target is not itself occupied by
/// another pending interface. For a chain `{a->b, b->c}` this yields
/// `b` first, freeing the name `a` needs. Returns `None` on a cycle.
pub fn next_applicable(pending: &IndexMap<String, PendingUpdate>) -> Option<String> {
    pending
        .iter()
        .find(|(_, update)| {
            update
                .name
                .as_deref()
                .is_none_or(|target| !pending.contains_key(target))
        })
        .map(|(name, _)| name.clone())
}

fn in_scope(only: Option<&str>, name: &str) -> bool {
    only.is_none_or(|o| o == name)
}

// ── Execution ────────────────────────────────────────────────────────

pub struct Reconciler<'a> {
    netbox: &'a NetboxClient,
    mirror: &'a mut NetboxMirror,
    config: &'a SyncConfig,
    device_types: HashMap<String, Option<DeviceTypeTemplate>>,
    slug_ids: HashMap<String, i64>,
    errors: Vec<SyncError>,
    mutations: u64,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        netbox: &'a NetboxClient,
        mirror: &'a mut NetboxMirror,
        config: &'a SyncConfig,
    ) -> Self {
        Self {
            netbox,
            mirror,
            config,
            device_types: HashMap::new(),
            slug_ids: HashMap::new(),
            errors: Vec::new(),
            mutations: 0,
        }
    }

    /// Run all phases. `only` restricts the run to one device by its
    /// fully-qualified name; the mirror must already be populated.
    pub async fn run(
        &mut self,
        desired: &DesiredDevices,
        only: Option<&str>,
    ) -> Result<SyncReport, CoreError> {
        info!(
            desired = desired.len(),
            actual = self.mirror.devices().len(),
            "reconciliation started"
        );
        self.sync_device_set(desired, only).await?;

        // Each later phase completes for the whole fleet before the
        // next starts. A device missing from the mirror (its creation
        // failed and was already recorded) is skipped by the phase.
        let targets: Vec<&DesiredDevice> = desired
            .iter()
            .filter(|(name, _)| in_scope(only, name))
            .map(|(_, want)| want)
            .collect();
        for want in &targets {
            if let Err(err) = self.sync_settings(want).await {
                self.record(&want.name, err)?;
            }
        }
        for want in &targets {
            if let Err(err) = self.sync_interface_set(want).await {
                self.record(&want.name, err)?;
            }
        }
        for want in &targets {
            if let Err(err) = self.sync_interface_updates(want).await {
                self.record(&want.name, err)?;
            }
        }
        for want in &targets {
            if let Err(err) = self.sync_addresses(want).await {
                self.record(&want.name, err)?;
            }
        }

        let report = SyncReport {
            errors: mem::take(&mut self.errors),
            mutations: self.mutations,
        };
        self.mutations = 0;
        info!(
            mutations = report.mutations,
            errors = report.errors.len(),
            "reconciliation finished"
        );
        Ok(report)
    }

    // ── Phase 1: device set ──────────────────────────────────────────

    async fn sync_device_set(
        &mut self,
        desired: &DesiredDevices,
        only: Option<&str>,
    ) -> Result<(), CoreError> {
        let plan = plan_device_sets(self.mirror.devices(), desired);
        let by_oid = desired.by_oid();

        for (name, id) in plan.delete {
            if !in_scope(only, &name) {
                continue;
            }
            info!(device = %name, "deleting device");
            match self.netbox.delete_device(id).await.map_err(CoreError::from) {
                Ok(()) => {
                    self.mutations += 1;
                    self.refresh_device(&name).await?;
                }
                Err(err) => self.record(&name, err)?,
            }
        }

        for oid in plan.create {
            let Some(want) = by_oid.get(&oid).copied() else { continue };
            if !in_scope(only, &want.name) {
                continue;
            }
            if let Err(err) = self.create_device(want).await {
                let name = want.name.clone();
                self.record(&name, err)?;
            }
        }

        for (name, oid) in plan.set_oid {
            if !in_scope(only, &name) {
                continue;
            }
            let Some(id) = self.mirror.device(&name).map(|d| d.id) else {
                continue;
            };
            info!(device = %name, oid, "adopting device");
            let update = DeviceUpdate {
                custom_fields: DeviceCustomFields {
                    becs_oid: Some(oid),
                    ..DeviceCustomFields::default()
                },
                ..DeviceUpdate::default()
            };
            match self
                .netbox
                .update_device(id, &update)
                .await
                .map_err(CoreError::from)
            {
                Ok(_) => {
                    self.mutations += 1;
                    self.refresh_device(&name).await?;
                }
                Err(err) => self.record(&name, err)?,
            }
        }
        Ok(())
    }

    async fn create_device(&mut self, want: &DesiredDevice) -> Result<(), CoreError> {
        let template = self.device_type(&want.model).await?.ok_or_else(|| {
            CoreError::Rejected {
                message: format!("unknown device type: {} {}", self.config.manufacturer, want.model),
            }
        })?;
        let site_slug = self.config.site.clone();
        let role_slug = self.config.device_role.clone();
        let platform_slug = want
            .platform
            .clone()
            .unwrap_or_else(|| self.config.platform.clone());
        let tag_slug = self.config.device_tag.clone();

        let create = DeviceCreate {
            name: want.name.clone(),
            device_type: template.id,
            role: self.slug_id("dcim/device-roles", &role_slug).await?,
            site: self.slug_id("dcim/sites", &site_slug).await?,
            platform: self.slug_id("dcim/platforms", &platform_slug).await?,
            enabled: want.enabled,
            tags: vec![self.slug_id("extras/tags", &tag_slug).await?],
            custom_fields: DeviceCustomFields {
                becs_oid: Some(want.oid),
                ..DeviceCustomFields::default()
            },
        };
        info!(device = %want.name, oid = want.oid, "creating device");
        self.netbox
            .create_device(&create)
            .await
            .map_err(CoreError::from)?;
        self.mutations += 1;
        self.refresh_device(&want.name).await
    }

    // ── Phase 2: device settings ─────────────────────────────────────

    async fn sync_settings(&mut self, want: &DesiredDevice) -> Result<(), CoreError> {
        let Some(actual) = self.mirror.device_by_oid(want.oid).cloned() else {
            return Ok(());
        };
        let template = self.device_type(&want.model).await?;
        let update = build_device_update(&actual, want, template.as_ref());
        if update.is_empty() {
            return Ok(());
        }
        info!(device = %actual.name, "updating device settings");
        self.netbox
            .update_device(actual.id, &update)
            .await
            .map_err(CoreError::from)?;
        self.mutations += 1;
        self.refresh_device(&actual.name).await
    }

    // ── Phase 3: interface set ───────────────────────────────────────

    async fn sync_interface_set(&mut self, want: &DesiredDevice) -> Result<(), CoreError> {
        let Some(actual) = self.mirror.device_by_oid(want.oid).cloned() else {
            return Ok(());
        };
        let template = self.device_type(&want.model).await?;
        let plan = plan_interface_sets(&actual, want);
        if plan.is_empty() {
            return Ok(());
        }

        for (id, name) in &plan.delete {
            info!(device = %actual.name, interface = %name, "deleting interface");
            self.netbox
                .delete_interface(*id)
                .await
                .map_err(CoreError::from)?;
            self.mutations += 1;
        }
        for (id, oid) in &plan.adopt {
            info!(device = %actual.name, oid, "adopting interface");
            let update = InterfaceUpdate {
                label: Some(format_becs_label(*oid)),
                ..InterfaceUpdate::default()
            };
            self.netbox
                .update_interface(*id, &update)
                .await
                .map_err(CoreError::from)?;
            self.mutations += 1;
        }
        for oid in &plan.create {
            let Some(iface) = want.interface_by_oid(*oid) else { continue };
            info!(device = %actual.name, interface = %iface.name, "creating interface");
            let create = InterfaceCreate {
                device: actual.id,
                name: iface.name.clone(),
                type_: infer_interface_type(template.as_ref(), &iface.name),
                enabled: iface.enabled,
                label: format_becs_label(*oid),
                tags: Vec::new(),
            };
            self.netbox
                .create_interface(&create)
                .await
                .map_err(CoreError::from)?;
            self.mutations += 1;
        }
        self.refresh_device(&actual.name).await
    }

    // ── Phase 4: interface renames ───────────────────────────────────

    async fn sync_interface_updates(&mut self, want: &DesiredDevice) -> Result<(), CoreError> {
        let Some(actual) = self.mirror.device_by_oid(want.oid).cloned() else {
            return Ok(());
        };
        let template = self.device_type(&want.model).await?;
        let mut pending = plan_interface_updates(&actual, want, template.as_ref());
        if pending.is_empty() {
            return Ok(());
        }

        while !pending.is_empty() {
            let Some(key) = next_applicable(&pending) else {
                warn!(device = %actual.name, "interface rename cycle, giving up");
                self.errors.push(SyncError {
                    name: actual.name.clone(),
                    message: "interface rename cycle".into(),
                });
                break;
            };
            let Some(update) = pending.shift_remove(&key) else { break };
            info!(device = %actual.name, interface = %key, "updating interface");
            let body = InterfaceUpdate {
                name: update.name,
                type_: update.type_,
                enabled: None,
                label: None,
            };
            self.netbox
                .update_interface(update.id, &body)
                .await
                .map_err(CoreError::from)?;
            self.mutations += 1;
        }
        self.refresh_device(&actual.name).await
    }

    // ── Phases 5 and 6: addresses ────────────────────────────────────

    async fn sync_addresses(&mut self, want: &DesiredDevice) -> Result<(), CoreError> {
        // Phase 5: remove addresses that are stale or no longer desired.
        let Some(actual) = self.mirror.device_by_oid(want.oid).cloned() else {
            return Ok(());
        };
        let mut mutated = false;
        for iface in actual.interfaces.values() {
            let Some(oid) = iface.becs_oid else { continue };
            let Some(want_iface) = want.interface_by_oid(oid) else {
                continue;
            };
            let Some(addr) = &iface.prefix4 else { continue };
            let keep = want_iface
                .prefix4
                .first()
                .is_some_and(|w| Some(w.oid) == addr.becs_oid && w.address == addr.address);
            if keep {
                continue;
            }
            // The primary pointer must be released before its target goes.
            if iface.name == self.config.loopback_interface {
                if let Some(primary) = &actual.primary_ip4 {
                    if primary.id == addr.id {
                        info!(device = %actual.name, "clearing primary address");
                        let update = DeviceUpdate {
                            primary_ip4: Some(None),
                            ..DeviceUpdate::default()
                        };
                        self.netbox
                            .update_device(actual.id, &update)
                            .await
                            .map_err(CoreError::from)?;
                        self.mutations += 1;
                    }
                }
            }
            info!(device = %actual.name, interface = %iface.name, address = %addr.address, "deleting address");
            self.netbox
                .delete_ip_address(addr.id)
                .await
                .map_err(CoreError::from)?;
            self.mutations += 1;
            mutated = true;
        }
        if mutated {
            self.refresh_device(&actual.name).await?;
        }

        // Phase 6: create what is missing; the loopback address is the
        // device's primary IPv4.
        let Some(actual) = self.mirror.device_by_oid(want.oid).cloned() else {
            return Ok(());
        };
        let mut mutated = false;
        for want_iface in want.interfaces.values() {
            let Some(want_addr) = want_iface.prefix4.first() else {
                continue;
            };
            let Some(iface) = actual.interface_by_oid(want_iface.oid) else {
                continue;
            };
            let address_id = match &iface.prefix4 {
                Some(existing) => existing.id,
                None => {
                    info!(device = %actual.name, interface = %iface.name, address = %want_addr.address, "creating address");
                    let create =
                        IpAddressCreate::on_interface(iface.id, &want_addr.address, want_addr.oid);
                    let created = self
                        .netbox
                        .create_ip_address(&create)
                        .await
                        .map_err(CoreError::from)?;
                    self.mutations += 1;
                    mutated = true;
                    created.id
                }
            };
            if want_iface.name == self.config.loopback_interface {
                let primary_ok = actual
                    .primary_ip4
                    .as_ref()
                    .is_some_and(|p| p.id == address_id);
                if !primary_ok {
                    info!(device = %actual.name, "setting primary address");
                    let update = DeviceUpdate {
                        primary_ip4: Some(Some(address_id)),
                        ..DeviceUpdate::default()
                    };
                    self.netbox
                        .update_device(actual.id, &update)
                        .await
                        .map_err(CoreError::from)?;
                    self.mutations += 1;
                    mutated = true;
                }
            }
        }
        if mutated {
            self.refresh_device(&actual.name).await?;
        }
        Ok(())
    }

    // ── Shared helpers ───────────────────────────────────────────────

    /// Re-fetch one device and fold it back into the mirror; a device
    /// gone from NetBox is dropped from the mirror.
    async fn refresh_device(&mut self, name: &str) -> Result<(), CoreError> {
        match self
            .netbox
            .get_device(name)
            .await
            .map_err(CoreError::from)?
        {
            Some(device) => {
                let interfaces = self
                    .netbox
                    .list_interfaces(Some(device.id))
                    .await
                    .map_err(CoreError::from)?;
                let addresses = self
                    .netbox
                    .list_ip_addresses(Some(device.id))
                    .await
                    .map_err(CoreError::from)?;
                self.mirror
                    .update_device(convert::assemble_device(&device, &interfaces, &addresses))
            }
            None => self.mirror.delete_device(name),
        }
    }

    /// Device-type template by model, one fetch per run. Unknown models
    /// cache as `None`.
    async fn device_type(&mut self, model: &str) -> Result<Option<DeviceTypeTemplate>, CoreError> {
        if let Some(cached) = self.device_types.get(model) {
            return Ok(cached.clone());
        }
        let manufacturer = self.config.manufacturer_slug();
        let fetched = self
            .netbox
            .get_device_type(&manufacturer, model)
            .await
            .map_err(CoreError::from)?;
        let template = match fetched {
            Some(device_type) => {
                let templates = self
                    .netbox
                    .list_interface_templates(device_type.id)
                    .await
                    .map_err(CoreError::from)?;
                Some(DeviceTypeTemplate {
                    id: device_type.id,
                    custom_fields: device_type.custom_fields,
                    interfaces: templates
                        .into_iter()
                        .map(|t| (t.name, t.type_.map(|v| v.value)))
                        .collect(),
                })
            }
            None => None,
        };
        self.device_types.insert(model.to_owned(), template.clone());
        Ok(template)
    }

    /// Slug -> id lookup, cached per run. An unknown slug is a
    /// configuration problem and surfaces as `NotFound`.
    async fn slug_id(&mut self, endpoint: &str, slug: &str) -> Result<i64, CoreError> {
        let key = format!("{endpoint}:{slug}");
        if let Some(id) = self.slug_ids.get(&key) {
            return Ok(*id);
        }
        let found = self
            .netbox
            .get_by_slug(endpoint, slug)
            .await
            .map_err(CoreError::from)?
            .ok_or_else(|| CoreError::not_found(endpoint, slug))?;
        self.slug_ids.insert(key, found.id);
        Ok(found.id)
    }

    /// Accumulate a non-fatal error against `name`; propagate fatal ones.
    fn record(&mut self, name: &str, err: CoreError) -> Result<(), CoreError> {
        if err.is_fatal() {
            return Err(err);
        }
        warn!(device = name, error = %err, "sync step failed");
        self.errors.push(SyncError {
            name: name.to_owned(),
            message: err.to_string(),
        });
        Ok(())
    }
}
