//! Port contracts for agent registration and capability discovery.
//!
//! Ports define infrastructure-agnostic interfaces used by registry services.

pub mod store;

pub use store::{RegistryStore, RegistryStoreError, RegistryStoreResult};
