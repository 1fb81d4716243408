// BECS ExtAPI HTTP client
//
// Wraps `reqwest::Client` with session handling and envelope
// unwrapping. Every call after `login` carries the session id in the
// `X-BECS-Session` header; the envelope is stripped before the caller
// sees the payload.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::becs::models::BecsObject;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the BECS ExtAPI.
///
/// Single-object lookups go through `object_find`; the full-tree
/// refresh uses `object_tree_find`, which returns every object below a
/// given oid in one response.
pub struct BecsClient {
    http: reqwest::Client,
    base_url: Url,
    session: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    sessionid: String,
}

#[derive(Debug, Deserialize)]
struct ObjectsResponse {
    #[serde(default)]
    objects: Vec<BecsObject>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl BecsClient {
    /// Create a new client. No network traffic until `login`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            session: None,
        })
    }

    /// The BECS base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Open a session. Must be called before any object call.
    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("session/login")?;
        debug!(%url, username, "BECS login");

        let resp = self
            .http
            .post(url)
            .json(&json!({
                "username": username,
                "password": password.expose_secret(),
            }))
            .send()
            .await
            .map_err(Error::Transport)?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "BECS rejected the credentials".into(),
            });
        }
        let login: LoginResponse = Self::parse_body(resp).await?;
        self.session = Some(login.sessionid);
        Ok(())
    }

    /// Close the session. Errors are reported but the session id is
    /// dropped regardless.
    pub async fn logout(&mut self) -> Result<(), Error> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let url = self.api_url("session/logout")?;
        debug!(%url, "BECS logout");
        self.http
            .post(url)
            .header("X-BECS-Session", session)
            .json(&json!({}))
            .send()
            .await
            .map_err(Error::Transport)?;
        Ok(())
    }

    /// Fetch a single object by oid. Returns `None` for unknown oids.
    pub async fn object_find(&self, oid: i64) -> Result<Option<BecsObject>, Error> {
        debug!(oid, "BECS object_find");
        let resp: ObjectsResponse = self
            .post("object/find", &json!({ "oid": oid }))
            .await?;
        Ok(resp.objects.into_iter().next())
    }

    /// Fetch every object at or below `oid` in one call.
    ///
    /// Used for the full-tree refresh; the response can be large and the
    /// caller is expected to index and persist it.
    pub async fn object_tree_find(&self, oid: i64) -> Result<Vec<BecsObject>, Error> {
        debug!(oid, "BECS object_tree_find");
        let resp: ObjectsResponse = self
            .post("object/tree-find", &json!({ "oid": oid }))
            .await?;
        Ok(resp.objects)
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let session = self.session.as_deref().ok_or(Error::NotLoggedIn)?;
        let url = self.api_url(path)?;

        let resp = self
            .http
            .post(url)
            .header("X-BECS-Session", session)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_body(resp).await
    }

    async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| body.clone());
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(Error::Authentication { message });
            }
            return Err(Error::Api {
                message,
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
