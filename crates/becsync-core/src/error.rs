// ── Core error types ──
//
// The taxonomy the reconciler runs on. NotFound is a normal "nothing to
// do" value. Rejected means the target declined one mutation; it is
// accumulated into the run's error list and the run continues. Connector
// and CacheConsistency are fatal and abort the run immediately.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Non-fatal ────────────────────────────────────────────────────
    /// Lookup miss. Treated as "nothing to do" by most callers.
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    /// The target system declined a create/update/delete. Accumulated
    /// into the run's error list; the run continues.
    #[error("Mutation rejected: {message}")]
    Rejected { message: String },

    // ── Fatal ────────────────────────────────────────────────────────
    /// RPC/transport failure talking to BECS or NetBox.
    #[error("Connector fault: {message}")]
    Connector { message: String },

    /// A cache update would shrink the device mirror below the safety
    /// floor of two devices -- almost certainly a bad partial fetch.
    #[error("Refusing to persist device cache with only {count} device(s)")]
    CacheConsistency { count: usize },

    /// On-disk snapshot could not be read or written.
    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// True for errors that abort the whole run rather than being
    /// accumulated into the per-device error list.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Connector { .. }
                | Self::CacheConsistency { .. }
                | Self::Snapshot { .. }
                | Self::Config { .. }
                | Self::Internal(_)
        )
    }

    pub fn not_found(entity_type: &str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<becsync_api::Error> for CoreError {
    fn from(err: becsync_api::Error) -> Self {
        if err.is_not_found() {
            return CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: err.to_string(),
            };
        }
        match err {
            becsync_api::Error::Api { message, status } => {
                // The server answered; it just said no. Non-fatal.
                CoreError::Rejected {
                    message: format!("HTTP {status}: {message}"),
                }
            }
            other => CoreError::Connector {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_rejection_is_non_fatal() {
        let err = CoreError::from(becsync_api::Error::Api {
            message: "duplicate".into(),
            status: 400,
        });
        assert!(matches!(err, CoreError::Rejected { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn api_404_maps_to_not_found() {
        let err = CoreError::from(becsync_api::Error::Api {
            message: "no such device".into(),
            status: 404,
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn auth_failure_is_fatal() {
        let err = CoreError::from(becsync_api::Error::Authentication {
            message: "session expired".into(),
        });
        assert!(err.is_fatal());
    }
}
