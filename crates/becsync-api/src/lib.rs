// becsync-api: Async Rust clients for the BECS ExtAPI and the NetBox REST API

pub mod becs;
pub mod error;
pub mod netbox;
pub mod transport;

pub use becs::BecsClient;
pub use error::Error;
pub use netbox::NetboxClient;
pub use transport::{TlsMode, TransportConfig};
