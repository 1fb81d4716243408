// NetBox slug lookups
//
// Device creation needs numeric ids for site, role, platform and tags.
// These are all `{id, name, slug}` objects behind slug-filterable list
// endpoints; one generic method covers them. Callers cache the results
// per run -- the ids never change mid-sync.

use tracing::debug;

use crate::error::Error;
use crate::netbox::client::NetboxClient;
use crate::netbox::models::NbRef;

impl NetboxClient {
    /// Look up an object by slug on any slug-filterable endpoint
    /// (`dcim/sites`, `dcim/device-roles`, `dcim/platforms`,
    /// `extras/tags`, ...). Returns `None` when the slug is unknown.
    pub async fn get_by_slug(&self, endpoint: &str, slug: &str) -> Result<Option<NbRef>, Error> {
        let mut url = self.api_url(endpoint)?;
        url.query_pairs_mut().append_pair("slug", slug);
        debug!(endpoint, slug, "slug lookup");
        let refs: Vec<NbRef> = self.get_paged(url).await?;
        Ok(refs.into_iter().next())
    }
}
