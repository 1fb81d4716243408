// NetBox interface endpoints

use tracing::debug;

use crate::error::Error;
use crate::netbox::client::NetboxClient;
use crate::netbox::models::{InterfaceCreate, InterfaceUpdate, NbInterface};

impl NetboxClient {
    /// List interfaces, optionally scoped to one device.
    ///
    /// `GET /api/dcim/interfaces/?device_id={id}`
    pub async fn list_interfaces(&self, device_id: Option<i64>) -> Result<Vec<NbInterface>, Error> {
        let mut url = self.api_url("dcim/interfaces")?;
        if let Some(id) = device_id {
            url.query_pairs_mut()
                .append_pair("device_id", &id.to_string());
        }
        debug!(?device_id, "listing interfaces");
        self.get_paged(url).await
    }

    /// Create an interface.
    ///
    /// `POST /api/dcim/interfaces/`
    pub async fn create_interface(
        &self,
        interface: &InterfaceCreate,
    ) -> Result<NbInterface, Error> {
        let url = self.api_url("dcim/interfaces")?;
        debug!(device = interface.device, name = %interface.name, "creating interface");
        self.post(url, interface).await
    }

    /// Apply a partial update to an interface.
    ///
    /// `PATCH /api/dcim/interfaces/{id}/`
    pub async fn update_interface(
        &self,
        id: i64,
        update: &InterfaceUpdate,
    ) -> Result<NbInterface, Error> {
        let url = self.api_url(&format!("dcim/interfaces/{id}"))?;
        debug!(id, "updating interface");
        self.patch(url, update).await
    }

    /// Delete an interface.
    ///
    /// `DELETE /api/dcim/interfaces/{id}/`
    pub async fn delete_interface(&self, id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("dcim/interfaces/{id}"))?;
        debug!(id, "deleting interface");
        self.delete(url).await
    }
}
