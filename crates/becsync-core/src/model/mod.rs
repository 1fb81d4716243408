//! Domain model for the sync: the desired state derived from BECS and
//! the actual state mirrored from NetBox.

pub mod actual;
pub mod desired;

pub use actual::{ActualAddress, ActualDevice, ActualInterface};
pub use desired::{ConnectionMethod, DesiredAddress, DesiredDevice, DesiredInterface};
