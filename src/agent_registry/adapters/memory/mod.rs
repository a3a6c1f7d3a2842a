//! In-memory adapters for the agent registry.

mod registry_store;

pub use registry_store::InMemoryRegistryStore;
