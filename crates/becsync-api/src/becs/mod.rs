// BECS ExtAPI client
//
// BECS is the element-management system holding the authoritative
// parent/child object tree. The ExtAPI is session-based: log in once,
// then carry the session id on every call.

pub mod client;
pub mod models;

pub use client::BecsClient;
pub use models::{BecsObject, InetResource, NamedValues, ROOT_OID};
