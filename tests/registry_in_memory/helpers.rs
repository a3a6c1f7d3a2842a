//! Shared helpers for in-memory registry integration tests.

use std::sync::Arc;

use mcp_registry::agent_registry::{
    adapters::memory::InMemoryRegistryStore,
    domain::{AgentFields, NewCapability},
    services::{CreateAgentMode, CreateAgentRequest, RegistryService},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;

/// Service type used by in-memory integration tests.
pub type TestService = RegistryService<InMemoryRegistryStore, DefaultClock>;

/// A service together with the store it writes to.
pub struct Registry {
    /// The registry service under test.
    pub service: TestService,
    /// The backing store, for inspection.
    pub store: InMemoryRegistryStore,
}

/// Builds a registry over a fresh store using the given mode.
pub fn registry_with(mode: CreateAgentMode) -> Registry {
    let store = InMemoryRegistryStore::new();
    let service = RegistryService::new(Arc::new(store.clone()), Arc::new(DefaultClock))
        .with_create_agent_mode(mode);
    Registry { service, store }
}

/// Provides a registry using the default atomic mode.
#[fixture]
pub fn registry() -> Registry {
    registry_with(CreateAgentMode::Atomic)
}

/// Builds a create request for `name`/`version` providing `capabilities`.
pub fn agent_request(name: &str, version: &str, capabilities: &[&str]) -> CreateAgentRequest {
    let fields = AgentFields::new(
        name,
        version,
        format!("{name} integration agent"),
        "registry-tests",
        format!("http://{name}.internal:8080"),
        json!({"openapi": "3.1.0", "paths": {"/invoke": {"post": {}}}}),
        "staging",
    )
    .with_tags(vec!["integration".to_owned()]);
    CreateAgentRequest::new(fields)
        .with_capabilities(capabilities.iter().map(|name| NewCapability::new(*name)))
}
