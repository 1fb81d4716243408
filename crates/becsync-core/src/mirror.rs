// ── NetBox device mirror ──
//
// Local, snapshot-backed copy of the NetBox device set this sync owns.
// The reconciler reads and mutates the mirror; every mutation is
// persisted immediately so an interrupted run resumes from a faithful
// picture. A full replacement below the safety floor is refused -- a
// near-empty device list from NetBox means a bad partial fetch, and
// acting on it would delete the whole inventory.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, info};

use becsync_api::NetboxClient;

use crate::convert;
use crate::error::CoreError;
use crate::model::ActualDevice;
use crate::snapshot;

/// Never accept a full mirror replacement smaller than this.
const MIN_DEVICES: usize = 2;

pub struct NetboxMirror {
    path: PathBuf,
    devices: IndexMap<String, ActualDevice>,
    loaded: bool,
}

impl NetboxMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            devices: IndexMap::new(),
            loaded: false,
        }
    }

    /// The mirrored device set, keyed by name.
    ///
    /// With `refresh` (or when no snapshot exists) the three NetBox
    /// result sets are re-fetched and joined; otherwise the snapshot is
    /// loaded once and served from memory after that.
    pub async fn get_devices(
        &mut self,
        client: &NetboxClient,
        tag: Option<&str>,
        refresh: bool,
    ) -> Result<&IndexMap<String, ActualDevice>, CoreError> {
        if self.loaded && !refresh {
            return Ok(&self.devices);
        }

        if refresh || !snapshot::exists(&self.path) {
            info!("refreshing NetBox device mirror");
            let devices = client.list_devices(tag).await.map_err(CoreError::from)?;
            let interfaces = client.list_interfaces(None).await.map_err(CoreError::from)?;
            let addresses = client
                .list_ip_addresses(None)
                .await
                .map_err(CoreError::from)?;
            let assembled = convert::assemble_devices(&devices, &interfaces, &addresses);
            self.set_devices(assembled)?;
        } else {
            let devices: IndexMap<String, ActualDevice> = snapshot::load(&self.path)?;
            Self::check_floor(devices.len())?;
            self.devices = devices;
            self.loaded = true;
        }
        debug!(devices = self.devices.len(), "device mirror ready");
        Ok(&self.devices)
    }

    /// Replace the whole mirror. Refused below the safety floor.
    pub fn set_devices(
        &mut self,
        devices: IndexMap<String, ActualDevice>,
    ) -> Result<(), CoreError> {
        Self::check_floor(devices.len())?;
        self.devices = devices;
        self.loaded = true;
        self.persist()
    }

    pub fn device(&self, name: &str) -> Option<&ActualDevice> {
        self.devices.get(name)
    }

    pub fn device_by_oid(&self, oid: i64) -> Option<&ActualDevice> {
        self.devices.values().find(|d| d.becs_oid == Some(oid))
    }

    pub fn devices(&self) -> &IndexMap<String, ActualDevice> {
        &self.devices
    }

    /// View keyed by BECS oid; devices without a cross-reference are
    /// not represented.
    pub fn by_oid(&self) -> IndexMap<i64, &ActualDevice> {
        self.devices
            .values()
            .filter_map(|d| d.becs_oid.map(|oid| (oid, d)))
            .collect()
    }

    /// Upsert one device. Single-device updates bypass the floor check;
    /// the floor guards only against wholesale replacement.
    pub fn update_device(&mut self, device: ActualDevice) -> Result<(), CoreError> {
        self.devices.insert(device.name.clone(), device);
        self.persist()
    }

    /// Drop one device from the mirror. A no-op if absent.
    pub fn delete_device(&mut self, name: &str) -> Result<(), CoreError> {
        if self.devices.shift_remove(name).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn check_floor(count: usize) -> Result<(), CoreError> {
        if count < MIN_DEVICES {
            return Err(CoreError::CacheConsistency { count });
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), CoreError> {
        snapshot::save(&self.path, &self.devices)
    }
}
