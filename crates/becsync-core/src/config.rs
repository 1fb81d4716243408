// ── Sync configuration ──
//
// One explicit value passed into each component's constructor. The
// original tool read an ambient global config; here everything the
// engine needs is named up front.

use std::path::PathBuf;

/// Configuration consumed by the desired-state builder, the mirror and
/// the reconciler. Slug fields must match what exists in NetBox.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Appended to device and parent names that carry no domain.
    pub default_domain: String,
    /// Marker tag (slug) identifying devices owned by this sync.
    pub device_tag: String,
    /// Interface whose address becomes the device's primary IPv4.
    pub loopback_interface: String,
    /// Manufacturer name; its lowercased form is used as the NetBox slug.
    pub manufacturer: String,
    /// Site slug for created devices.
    pub site: String,
    /// Device-role slug for created devices.
    pub device_role: String,
    /// Platform slug used when a BECS element carries no elementtype.
    pub platform: String,
    /// Directory holding the two snapshot blobs.
    pub cache_dir: PathBuf,
}

impl SyncConfig {
    /// Sensible defaults for the given cache directory; field values
    /// mirror the original deployment.
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            default_domain: "example.com".into(),
            device_tag: "becs".into(),
            loopback_interface: "loopback0".into(),
            manufacturer: "Waystream".into(),
            site: "default".into(),
            device_role: "access-nod".into(),
            platform: "ibos".into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// NetBox manufacturer slug.
    pub fn manufacturer_slug(&self) -> String {
        self.manufacturer.to_lowercase()
    }

    /// Path of the raw BECS object-set snapshot.
    pub fn source_cache_path(&self) -> PathBuf {
        self.cache_dir.join("becs-cache.json.gz")
    }

    /// Path of the NetBox device-mirror snapshot.
    pub fn target_cache_path(&self) -> PathBuf {
        self.cache_dir.join("netbox-cache.json.gz")
    }
}
