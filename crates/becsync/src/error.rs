//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use becsync_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PARTIAL: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Connection failed: {message}")]
    #[diagnostic(
        code(becsync::connection_failed),
        help(
            "Check that BECS and NetBox are reachable from this host.\n\
             URLs come from the [becs] and [netbox] config sections."
        )
    )]
    ConnectionFailed { message: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(becsync::auth_failed),
        help(
            "Verify the BECS credentials and the NetBox API token.\n\
             They can also be set via BECSYNC_BECS__PASSWORD and BECSYNC_NETBOX__TOKEN."
        )
    )]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(becsync::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Sync outcomes ────────────────────────────────────────────────
    #[error("NetBox rejected a mutation: {message}")]
    #[diagnostic(code(becsync::rejected))]
    Rejected { message: String },

    #[error("Sync finished with {failed} rejected mutation(s)")]
    #[diagnostic(
        code(becsync::partial),
        help("The rejected mutations are listed above; re-run after fixing them in NetBox.")
    )]
    SyncIncomplete { failed: usize },

    #[error("Device mirror refresh returned only {count} device(s)")]
    #[diagnostic(
        code(becsync::cache_too_small),
        help(
            "A near-empty device list usually means a bad filter or partial fetch.\n\
             Check the [sync].device_tag setting, then re-run with --refresh-target."
        )
    )]
    CacheTooSmall { count: usize },

    #[error("Snapshot error: {message}")]
    #[diagnostic(
        code(becsync::snapshot),
        help("Delete the snapshot files and re-run with --refresh-source --refresh-target.")
    )]
    Snapshot { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(becsync::config))]
    Config(#[from] becsync_config::ConfigError),

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("Internal error: {message}")]
    #[diagnostic(code(becsync::internal))]
    Internal { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(becsync::json))]
    Json(#[from] serde_json::Error),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                resource_type: entity_type,
                identifier,
            },
            CoreError::Rejected { message } => Self::Rejected { message },
            CoreError::Connector { message } => {
                if message.contains("uthentication") || message.contains("session") {
                    Self::AuthFailed { message }
                } else {
                    Self::ConnectionFailed { message }
                }
            }
            CoreError::CacheConsistency { count } => Self::CacheTooSmall { count },
            CoreError::Snapshot { message } => Self::Snapshot { message },
            CoreError::Config { message } => Self::Internal { message },
            CoreError::Internal(message) => Self::Internal { message },
        }
    }
}

impl From<becsync_api::Error> for CliError {
    fn from(err: becsync_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::SyncIncomplete { .. } | Self::Rejected { .. } => exit_code::PARTIAL,
            Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}
