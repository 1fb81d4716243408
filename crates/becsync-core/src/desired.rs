// ── Desired-state builder ──
//
// Turns the BECS element tree into the set of devices NetBox should
// hold. The full object set is fetched in one tree-find call and cached
// on disk; between refreshes the cache is authoritative.

use indexmap::IndexMap;
use secrecy::SecretString;
use tracing::{debug, info};

use becsync_api::becs::{BecsObject, ROOT_OID};
use becsync_api::BecsClient;

use crate::config::SyncConfig;
use crate::error::CoreError;
use crate::model::{ConnectionMethod, DesiredDevice, DesiredInterface};
use crate::naming;
use crate::snapshot;
use crate::tree::SourceTree;

/// Element type managed by this sync.
const MANAGED_ELEMENTTYPE: &str = "ibos";

/// The desired device set, keyed by FQDN.
#[derive(Debug, Default)]
pub struct DesiredDevices {
    pub by_name: IndexMap<String, DesiredDevice>,
}

impl DesiredDevices {
    pub fn get(&self, name: &str) -> Option<&DesiredDevice> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DesiredDevice)> {
        self.by_name.iter()
    }

    /// View keyed by BECS oid.
    pub fn by_oid(&self) -> IndexMap<i64, &DesiredDevice> {
        self.by_name.values().map(|d| (d.oid, d)).collect()
    }
}

/// Source-side facade: owns the session, the tree index and the on-disk
/// cache of the raw object set.
pub struct Becs {
    tree: SourceTree,
    config: SyncConfig,
}

impl Becs {
    pub fn new(client: BecsClient, config: SyncConfig) -> Self {
        Self {
            tree: SourceTree::new(client),
            config,
        }
    }

    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        self.tree
            .client_mut()
            .login(username, password)
            .await
            .map_err(|e| CoreError::Connector {
                message: e.to_string(),
            })
    }

    pub async fn logout(&mut self) -> Result<(), CoreError> {
        self.tree
            .client_mut()
            .logout()
            .await
            .map_err(|e| CoreError::Connector {
                message: e.to_string(),
            })
    }

    /// Single-object lookup, straight through to the API.
    pub async fn object(&mut self, oid: i64) -> Result<Option<BecsObject>, CoreError> {
        Ok(self.tree.fetch(oid).await?.cloned())
    }

    /// Build the desired device set.
    ///
    /// With `refresh` (or when no cache exists) the full object tree is
    /// fetched and snapshotted first; otherwise the snapshot is used.
    pub async fn get_devices(&mut self, refresh: bool) -> Result<DesiredDevices, CoreError> {
        let cache = self.config.source_cache_path();
        if refresh || !snapshot::exists(&cache) {
            info!("refreshing BECS object tree");
            let objects = self
                .tree
                .client()
                .object_tree_find(ROOT_OID)
                .await
                .map_err(CoreError::from)?;
            snapshot::save(&cache, &objects)?;
            self.tree.load(objects);
        } else {
            let objects: Vec<BecsObject> = snapshot::load(&cache)?;
            self.tree.load(objects);
        }

        let mut candidates: Vec<BecsObject> = self
            .tree
            .iter()
            .filter(|o| {
                o.class == "element-attach"
                    && o.elementtype.as_deref() == Some(MANAGED_ELEMENTTYPE)
            })
            .cloned()
            .collect();
        // The index is a hash map; keep run order stable.
        candidates.sort_by_key(|o| o.oid);
        debug!(elements = candidates.len(), "managed elements selected");

        let mut devices = DesiredDevices::default();
        for element in candidates {
            let parents = self.tree.search_parent(element.oid).await?;
            let alarm_destination = self
                .tree
                .search_opaque(element.oid, "alarm_destination")
                .await?;
            let alarm_timeperiod = self
                .tree
                .search_opaque(element.oid, "alarm_timeperiod")
                .await?;
            let interfaces = self.tree.interfaces(element.oid).await?;

            let device = build_device(
                &element,
                parents.as_deref(),
                alarm_destination,
                alarm_timeperiod,
                interfaces,
                &self.config,
            );
            devices.by_name.insert(device.name.clone(), device);
        }
        info!(devices = devices.len(), "desired device set built");
        Ok(devices)
    }
}

/// Shape one BECS element into a desired device.
pub fn build_device(
    element: &BecsObject,
    parents: Option<&str>,
    alarm_destination: Option<String>,
    alarm_timeperiod: Option<String>,
    interfaces: IndexMap<String, DesiredInterface>,
    config: &SyncConfig,
) -> DesiredDevice {
    let name = naming::fqdn(&element.name.to_lowercase(), &config.default_domain);
    let model = element.first_parameter("model").unwrap_or_default().to_owned();
    DesiredDevice {
        oid: element.oid,
        connection_method: ConnectionMethod::from_model(&model),
        name,
        manufacturer: config.manufacturer.clone(),
        model,
        role: element.role.clone(),
        platform: element.elementtype.clone(),
        enabled: true,
        alarm_destination,
        alarm_timeperiod,
        parents: parents
            .map(|p| naming::commastr_to_list(p, &config.default_domain))
            .unwrap_or_default(),
        interfaces,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use becsync_api::becs::NamedValues;
    use becsync_api::TransportConfig;
    use url::Url;

    fn element(oid: i64, name: &str, parentoid: i64) -> BecsObject {
        BecsObject {
            oid,
            class: "element-attach".into(),
            name: name.into(),
            parentoid,
            elementtype: Some("ibos".into()),
            role: Some("access".into()),
            flags: None,
            opaque: Vec::new(),
            parameters: vec![NamedValues {
                name: "model".into(),
                values: vec!["ASR8048".into()],
            }],
            resource: None,
        }
    }

    #[test]
    fn build_device_qualifies_and_lowercases() {
        let config = SyncConfig::with_cache_dir("/tmp/unused");
        let device = build_device(
            &element(50, "SW1", ROOT_OID),
            Some("dist1, dist2.example.net"),
            Some("noc@example.com".into()),
            None,
            IndexMap::new(),
            &config,
        );
        assert_eq!(device.name, "sw1.example.com");
        assert_eq!(device.model, "ASR8048");
        assert_eq!(device.connection_method, ConnectionMethod::Ssh);
        assert_eq!(device.parents, vec!["dist1.example.com", "dist2.example.net"]);
        assert_eq!(device.alarm_destination.as_deref(), Some("noc@example.com"));
        assert!(device.enabled);
        assert_eq!(device.platform.as_deref(), Some("ibos"));
    }

    #[tokio::test]
    async fn get_devices_reads_the_snapshot_without_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig::with_cache_dir(dir.path());

        let objects = vec![element(50, "sw1", ROOT_OID), element(51, "sw2", ROOT_OID)];
        snapshot::save(&config.source_cache_path(), &objects).unwrap();

        // No login; the snapshot must satisfy the whole call.
        let client = BecsClient::new(
            Url::parse("http://becs.invalid").unwrap(),
            &TransportConfig::default(),
        )
        .unwrap();
        let mut becs = Becs::new(client, config);

        let devices = becs.get_devices(false).await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices.get("sw1.example.com").unwrap().oid, 50);
        assert_eq!(devices.by_oid()[&51].name, "sw2.example.com");
    }
}
