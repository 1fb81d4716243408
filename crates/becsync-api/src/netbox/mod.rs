// NetBox REST API client
//
// Endpoint groups are implemented as inherent methods on `NetboxClient`
// via separate files (devices, interfaces, addresses, device_types,
// lookups) to keep `client.rs` focused on transport mechanics.

pub mod addresses;
pub mod client;
pub mod device_types;
pub mod devices;
pub mod interfaces;
pub mod lookups;
pub mod models;

pub use client::NetboxClient;
pub use models::{
    AddressCustomFields, DeviceCreate, DeviceCustomFields, DeviceUpdate, InterfaceCreate,
    InterfaceUpdate, IpAddressCreate, NbDevice, NbDeviceType, NbDeviceTypeRef, NbInterface,
    NbInterfaceTemplate, NbIpAddress, NbIpRef, NbRef, Page, TypeValue,
};
