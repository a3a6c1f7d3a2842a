//! Shared world state for agent registry BDD scenarios.

use std::sync::Arc;

use mcp_registry::agent_registry::{
    adapters::memory::InMemoryRegistryStore,
    domain::{Agent, AgentFields, NewCapability},
    services::{CreateAgentRequest, RegistryService, RegistryServiceError},
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;

/// Service type used by the BDD world.
pub type TestRegistryService = RegistryService<InMemoryRegistryStore, DefaultClock>;

/// Scenario world for agent registry behaviour tests.
pub struct RegistryWorld {
    /// The registry service under test.
    pub service: TestRegistryService,
    /// Store handle used to flip soft-delete flags.
    pub store: InMemoryRegistryStore,
    /// Last successfully registered agent.
    pub last_registered: Option<Agent>,
    /// Result of the last registration attempt.
    pub last_create_result: Option<Result<Agent, RegistryServiceError>>,
}

impl RegistryWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryRegistryStore::new();
        let service = RegistryService::new(Arc::new(store.clone()), Arc::new(DefaultClock));
        Self {
            service,
            store,
            last_registered: None,
            last_create_result: None,
        }
    }
}

impl Default for RegistryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RegistryWorld {
    RegistryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Splits a comma-separated step argument into trimmed, non-empty names.
pub fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Builds a [`CreateAgentRequest`] from a name, version, and capability list.
pub fn build_request(name: &str, version: &str, capabilities: &str) -> CreateAgentRequest {
    let fields = AgentFields::new(
        name,
        version,
        "scenario agent",
        "scenarios",
        format!("http://{name}.local"),
        json!({"openapi": "3.1.0"}),
        "test",
    );
    CreateAgentRequest::new(fields)
        .with_capabilities(split_names(capabilities).into_iter().map(NewCapability::new))
}
