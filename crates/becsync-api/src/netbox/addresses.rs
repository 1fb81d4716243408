// NetBox ip-address endpoints
//
// Addresses are created and deleted, never edited in place -- a value
// change is modelled upstream as delete + create.

use tracing::debug;

use crate::error::Error;
use crate::netbox::client::NetboxClient;
use crate::netbox::models::{IpAddressCreate, NbIpAddress};

impl NetboxClient {
    /// List ip-addresses, optionally scoped to one device.
    ///
    /// `GET /api/ipam/ip-addresses/?device_id={id}`
    pub async fn list_ip_addresses(
        &self,
        device_id: Option<i64>,
    ) -> Result<Vec<NbIpAddress>, Error> {
        let mut url = self.api_url("ipam/ip-addresses")?;
        if let Some(id) = device_id {
            url.query_pairs_mut()
                .append_pair("device_id", &id.to_string());
        }
        debug!(?device_id, "listing ip-addresses");
        self.get_paged(url).await
    }

    /// Create an ip-address on an interface.
    ///
    /// `POST /api/ipam/ip-addresses/`
    pub async fn create_ip_address(&self, address: &IpAddressCreate) -> Result<NbIpAddress, Error> {
        let url = self.api_url("ipam/ip-addresses")?;
        debug!(address = %address.address, interface = address.assigned_object_id, "creating ip-address");
        self.post(url, address).await
    }

    /// Delete an ip-address.
    ///
    /// `DELETE /api/ipam/ip-addresses/{id}/`
    pub async fn delete_ip_address(&self, id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("ipam/ip-addresses/{id}"))?;
        debug!(id, "deleting ip-address");
        self.delete(url).await
    }
}
