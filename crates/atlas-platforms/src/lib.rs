//! Chain adapters and the platform registry.
//!
//! Each adapter wraps one explorer API client and a normalizer into the
//! generic transaction model, declaring its query surface through a
//! [`atlas_types::Capabilities`] record. The registry builds the active
//! adapter set once at startup from the coin list and the configuration.

pub mod client;
pub mod implementations;
pub mod registry;

pub use registry::{
	registrations, AdapterSettings, PlatformEntry, PlatformRegistry, Registration, RegistryError,
};
