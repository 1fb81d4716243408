// NetBox device endpoints
//
// CRUD against dcim/devices. List fetches are complete (pagination
// followed); single-device fetches filter by exact name.

use tracing::debug;

use crate::error::Error;
use crate::netbox::client::NetboxClient;
use crate::netbox::models::{DeviceCreate, DeviceUpdate, NbDevice};

impl NetboxClient {
    /// List all devices, optionally restricted to a marker tag.
    ///
    /// `GET /api/dcim/devices/?tag={tag}`
    pub async fn list_devices(&self, tag: Option<&str>) -> Result<Vec<NbDevice>, Error> {
        let mut url = self.api_url("dcim/devices")?;
        if let Some(tag) = tag {
            url.query_pairs_mut().append_pair("tag", tag);
        }
        debug!(?tag, "listing devices");
        self.get_paged(url).await
    }

    /// Get a single device by exact name. Returns `None` if absent.
    ///
    /// `GET /api/dcim/devices/?name={name}`
    pub async fn get_device(&self, name: &str) -> Result<Option<NbDevice>, Error> {
        let mut url = self.api_url("dcim/devices")?;
        url.query_pairs_mut().append_pair("name", name);
        let devices: Vec<NbDevice> = self.get_paged(url).await?;
        Ok(devices.into_iter().next())
    }

    /// Create a device.
    ///
    /// `POST /api/dcim/devices/`
    pub async fn create_device(&self, device: &DeviceCreate) -> Result<NbDevice, Error> {
        let url = self.api_url("dcim/devices")?;
        debug!(name = %device.name, "creating device");
        self.post(url, device).await
    }

    /// Apply a partial update to a device.
    ///
    /// `PATCH /api/dcim/devices/{id}/`
    pub async fn update_device(&self, id: i64, update: &DeviceUpdate) -> Result<NbDevice, Error> {
        let url = self.api_url(&format!("dcim/devices/{id}"))?;
        debug!(id, "updating device");
        self.patch(url, update).await
    }

    /// Delete a device.
    ///
    /// `DELETE /api/dcim/devices/{id}/`
    pub async fn delete_device(&self, id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("dcim/devices/{id}"))?;
        debug!(id, "deleting device");
        self.delete(url).await
    }
}
