//! Shared configuration for the BECS/NetBox sync CLI.
//!
//! TOML file + environment loading, credential resolution (env first,
//! plaintext fallback), and translation into the core crate's
//! `SyncConfig` and the api crate's `TransportConfig`.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use becsync_api::{TlsMode, TransportConfig};
use becsync_core::SyncConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured; set it in the config file or the {env} environment variable")]
    NoCredentials { what: String, env: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub becs: BecsSection,

    #[serde(default)]
    pub netbox: NetboxSection,

    #[serde(default)]
    pub sync: SyncSection,
}

/// `[becs]` — source connection.
#[derive(Debug, Deserialize, Serialize)]
pub struct BecsSection {
    /// ExtAPI base URL.
    pub url: String,

    pub username: Option<String>,

    /// Plaintext password (prefer the `BECSYNC_BECS__PASSWORD` env var).
    pub password: Option<String>,
}

impl Default for BecsSection {
    fn default() -> Self {
        Self {
            url: "http://localhost:4490".into(),
            username: None,
            password: None,
        }
    }
}

/// `[netbox]` — target connection.
#[derive(Debug, Deserialize, Serialize)]
pub struct NetboxSection {
    /// NetBox base URL.
    pub url: String,

    /// Plaintext API token (prefer the `BECSYNC_NETBOX__TOKEN` env var).
    pub token: Option<String>,
}

impl Default for NetboxSection {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".into(),
            token: None,
        }
    }
}

/// `[sync]` — reconciliation behavior.
#[derive(Debug, Deserialize, Serialize)]
pub struct SyncSection {
    #[serde(default = "default_domain")]
    pub default_domain: String,

    /// Marker tag (slug) on devices owned by this sync.
    #[serde(default = "default_device_tag")]
    pub device_tag: String,

    /// Interface whose address becomes the device primary IPv4.
    #[serde(default = "default_loopback")]
    pub loopback_interface: String,

    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,

    /// Site slug for created devices.
    #[serde(default = "default_site")]
    pub site: String,

    /// Device-role slug for created devices.
    #[serde(default = "default_device_role")]
    pub device_role: String,

    /// Platform slug fallback for elements without one.
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Snapshot directory; platform cache dir when unset.
    pub cache_dir: Option<PathBuf>,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Skip TLS verification.
    #[serde(default)]
    pub insecure: bool,

    /// Custom CA certificate path.
    pub ca_cert: Option<PathBuf>,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            default_domain: default_domain(),
            device_tag: default_device_tag(),
            loopback_interface: default_loopback(),
            manufacturer: default_manufacturer(),
            site: default_site(),
            device_role: default_device_role(),
            platform: default_platform(),
            cache_dir: None,
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_domain() -> String {
    "example.com".into()
}
fn default_device_tag() -> String {
    "becs".into()
}
fn default_loopback() -> String {
    "loopback0".into()
}
fn default_manufacturer() -> String {
    "Waystream".into()
}
fn default_site() -> String {
    "default".into()
}
fn default_device_role() -> String {
    "access-nod".into()
}
fn default_platform() -> String {
    "ibos".into()
}
fn default_timeout() -> u64 {
    30
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "becsync", "becsync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default snapshot directory when `[sync].cache_dir` is unset.
pub fn cache_dir() -> PathBuf {
    ProjectDirs::from("com", "becsync", "becsync")
        .map_or_else(dirs_fallback, |dirs| dirs.cache_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("becsync");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load configuration from defaults, the given (or canonical) TOML file
/// and `BECSYNC_`-prefixed environment variables. Sections are split
/// with a double underscore: `BECSYNC_NETBOX__TOKEN`, `BECSYNC_SYNC__DEFAULT_DOMAIN`.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config, ConfigError> {
    let default_path = config_path();
    let path = path.unwrap_or(&default_path);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BECSYNC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

impl Config {
    pub fn becs_username(&self) -> Result<String, ConfigError> {
        self.becs
            .username
            .clone()
            .ok_or_else(|| ConfigError::NoCredentials {
                what: "BECS username".into(),
                env: "BECSYNC_BECS__USERNAME".into(),
            })
    }

    pub fn becs_password(&self) -> Result<SecretString, ConfigError> {
        self.becs
            .password
            .clone()
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::NoCredentials {
                what: "BECS password".into(),
                env: "BECSYNC_BECS__PASSWORD".into(),
            })
    }

    pub fn netbox_token(&self) -> Result<SecretString, ConfigError> {
        self.netbox
            .token
            .clone()
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::NoCredentials {
                what: "NetBox token".into(),
                env: "BECSYNC_NETBOX__TOKEN".into(),
            })
    }

    pub fn becs_url(&self) -> Result<url::Url, ConfigError> {
        self.becs.url.parse().map_err(|_| ConfigError::Validation {
            field: "becs.url".into(),
            reason: format!("invalid URL: {}", self.becs.url),
        })
    }

    pub fn netbox_url(&self) -> Result<url::Url, ConfigError> {
        self.netbox
            .url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "netbox.url".into(),
                reason: format!("invalid URL: {}", self.netbox.url),
            })
    }

    /// Transport settings shared by both clients.
    pub fn transport_config(&self) -> TransportConfig {
        let tls = if self.sync.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ca) = &self.sync.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else {
            TlsMode::System
        };
        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.sync.timeout),
        }
    }

    /// Engine settings for the core crate.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            default_domain: self.sync.default_domain.clone(),
            device_tag: self.sync.device_tag.clone(),
            loopback_interface: self.sync.loopback_interface.clone(),
            manufacturer: self.sync.manufacturer.clone(),
            site: self.sync.site.clone(),
            device_role: self.sync.device_role.clone(),
            platform: self.sync.platform.clone(),
            cache_dir: self.sync.cache_dir.clone().unwrap_or_else(cache_dir),
        }
    }
}
