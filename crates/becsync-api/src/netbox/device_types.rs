// NetBox device-type endpoints
//
// Device types (hardware models) carry the template custom-field
// defaults and the named interface templates the reconciler uses to
// pick hardware types for new interfaces.

use tracing::debug;

use crate::error::Error;
use crate::netbox::client::NetboxClient;
use crate::netbox::models::{NbDeviceType, NbInterfaceTemplate};

impl NetboxClient {
    /// Get a device type by manufacturer slug and model name.
    ///
    /// `GET /api/dcim/device-types/?manufacturer={slug}&model={model}`
    pub async fn get_device_type(
        &self,
        manufacturer: &str,
        model: &str,
    ) -> Result<Option<NbDeviceType>, Error> {
        let mut url = self.api_url("dcim/device-types")?;
        url.query_pairs_mut()
            .append_pair("manufacturer", manufacturer)
            .append_pair("model", model);
        debug!(manufacturer, model, "fetching device type");
        let types: Vec<NbDeviceType> = self.get_paged(url).await?;
        Ok(types.into_iter().next())
    }

    /// List the interface templates of a device type.
    ///
    /// `GET /api/dcim/interface-templates/?devicetype_id={id}`
    pub async fn list_interface_templates(
        &self,
        device_type_id: i64,
    ) -> Result<Vec<NbInterfaceTemplate>, Error> {
        let mut url = self.api_url("dcim/interface-templates")?;
        url.query_pairs_mut()
            .append_pair("devicetype_id", &device_type_id.to_string());
        debug!(device_type_id, "listing interface templates");
        self.get_paged(url).await
    }
}
