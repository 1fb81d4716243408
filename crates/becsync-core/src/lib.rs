// becsync-core: Reconciliation engine between a BECS element tree and a
// NetBox inventory. The BECS side is authoritative; NetBox converges.

pub mod config;
pub mod convert;
pub mod desired;
pub mod error;
pub mod mirror;
pub mod model;
pub mod naming;
pub mod reconcile;
pub mod snapshot;
pub mod tree;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SyncConfig;
pub use desired::{Becs, DesiredDevices};
pub use error::CoreError;
pub use mirror::NetboxMirror;
pub use reconcile::{Reconciler, SyncError, SyncReport};
pub use tree::SourceTree;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ActualAddress, ActualDevice, ActualInterface, ConnectionMethod, DesiredAddress,
    DesiredDevice, DesiredInterface,
};
