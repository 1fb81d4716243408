// NetBox REST HTTP client
//
// Wraps `reqwest::Client` with token auth, URL construction, cursor
// pagination, and error mapping. Endpoint groups live in sibling files
// as inherent methods.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::netbox::models::Page;
use crate::transport::TransportConfig;

/// Raw HTTP client for the NetBox REST API.
///
/// Every request carries `Authorization: Token ...` via default
/// headers. List endpoints are paginated; `get_paged` follows the
/// `next` cursor until exhausted so callers always see complete sets.
pub struct NetboxClient {
    http: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct NbErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

impl NetboxClient {
    /// Create a new client with the given API token.
    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Token {}",
            token.expose_secret()
        ))
        .map_err(|_| Error::Authentication {
            message: "API token contains invalid header characters".into(),
        })?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url })
    }

    /// The NetBox base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}/`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}/"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a single page.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// GET a paginated list, following `next` cursors to the end.
    pub(crate) async fn get_paged<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        let mut out = Vec::new();
        let mut next = Some(url);
        while let Some(url) = next {
            let page: Page<T> = self.get(url).await?;
            out.extend(page.results);
            next = match page.next.as_deref() {
                Some(n) => Some(Url::parse(n)?),
                None => None,
            };
        }
        Ok(out)
    }

    /// POST a JSON body, returning the created object.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// PATCH a JSON body, returning the updated object.
    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("PATCH {url}");
        let resp = self
            .http
            .patch(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// DELETE; NetBox answers 204 with an empty body.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::error_from(status, resp.text().await.unwrap_or_default()))
    }

    async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Self::error_from(status, body));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    fn error_from(status: reqwest::StatusCode, body: String) -> Error {
        let message = serde_json::from_str::<NbErrorBody>(&body)
            .ok()
            .and_then(|e| e.detail)
            .unwrap_or(body);
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::Authentication { message };
        }
        Error::Api {
            message,
            status: status.as_u16(),
        }
    }
}
