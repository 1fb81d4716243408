use thiserror::Error;

/// Top-level error type for the `becsync-api` crate.
///
/// Covers every failure mode across both API surfaces: BECS session
/// handling, HTTP transport, and structured API errors from either
/// system. `becsync-core` maps these into its own taxonomy — callers
/// above the core never see raw transport errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Session login failed or the session id was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A call was made that requires a session before `login` succeeded.
    #[error("Not logged in -- call login() first")]
    NotLoggedIn,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error response from BECS or NetBox.
    #[error("API error (HTTP {status}): {message}")]
    Api { message: String, status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` for errors caused by the remote rejecting a
    /// mutation (4xx other than auth), as opposed to transport faults.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }
}
