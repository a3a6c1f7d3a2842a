//! Store port for agents, capabilities, and their association.

use crate::agent_registry::domain::{
    Agent, AgentId, Capability, CapabilityId, DeletedAgentVisibility, NewAgent, NewCapability,
    Page,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for registry store operations.
pub type RegistryStoreResult<T> = Result<T, RegistryStoreError>;

/// Durable persistence contract for the agent registry.
///
/// Every mutating operation is durable when it returns. Lookup misses are
/// reported as `None` or an empty list, never as an error.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Ensures the agent, capability, and association tables exist.
    ///
    /// Calling this repeatedly is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryStoreError::Persistence`] when the schema cannot be
    /// applied.
    async fn initialize(&self) -> RegistryStoreResult<()>;

    /// Inserts a new agent with no linked capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryStoreError::DuplicateAgent`] when the name and
    /// version pair already exists, including on a soft-deleted agent.
    async fn insert_agent(&self, agent: &NewAgent) -> RegistryStoreResult<Agent>;

    /// Inserts a new capability.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryStoreError::DuplicateCapability`] when the name
    /// already exists.
    async fn insert_capability(
        &self,
        capability: &NewCapability,
    ) -> RegistryStoreResult<Capability>;

    /// Finds a capability by exact name.
    async fn find_capability_by_name(&self, name: &str) -> RegistryStoreResult<Option<Capability>>;

    /// Finds a capability by identifier.
    async fn find_capability_by_id(
        &self,
        id: CapabilityId,
    ) -> RegistryStoreResult<Option<Capability>>;

    /// Finds an agent, with its capabilities, by identifier.
    async fn find_agent_by_id(&self, id: AgentId) -> RegistryStoreResult<Option<Agent>>;

    /// Returns a page of agents ordered by identifier.
    async fn list_agents(
        &self,
        page: Page,
        visibility: DeletedAgentVisibility,
    ) -> RegistryStoreResult<Vec<Agent>>;

    /// Returns a page of capabilities ordered by identifier.
    async fn list_capabilities(&self, page: Page) -> RegistryStoreResult<Vec<Capability>>;

    /// Links an agent to a capability.
    ///
    /// Linking the same pair twice stores two association rows.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryStoreError::UnknownLinkTarget`] when either side of
    /// the link does not exist.
    async fn link_agent_capability(
        &self,
        agent_id: AgentId,
        capability_id: CapabilityId,
    ) -> RegistryStoreResult<()>;

    /// Returns every agent linked to the capability with the given name.
    ///
    /// Each agent appears once, ordered by identifier. Unknown names yield
    /// an empty list.
    async fn find_agents_by_capability_name(
        &self,
        name: &str,
        visibility: DeletedAgentVisibility,
    ) -> RegistryStoreResult<Vec<Agent>>;

    /// Gets or creates each capability, inserts the agent, and links them,
    /// all as one unit.
    ///
    /// Either every row is written or none is. Concurrent creation of the
    /// same new capabilities, named in any order, does not fail. Repeated
    /// capability names are linked once, and the returned agent lists its
    /// capabilities ordered by id as reads do.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryStoreError::DuplicateAgent`] when the name and
    /// version pair already exists. No capability is created in that case.
    async fn create_agent_atomically(
        &self,
        agent: &NewAgent,
        capabilities: &[NewCapability],
    ) -> RegistryStoreResult<Agent>;
}

/// Errors returned by registry store implementations.
#[derive(Debug, Clone, Error)]
pub enum RegistryStoreError {
    /// An agent with the same name and version already exists.
    #[error("duplicate agent: {name} {version}")]
    DuplicateAgent {
        /// Conflicting agent name.
        name: String,
        /// Conflicting agent version.
        version: String,
    },

    /// A capability with the same name already exists.
    #[error("duplicate capability name: {0}")]
    DuplicateCapability(String),

    /// A link referenced an agent or capability that does not exist.
    #[error("unknown link target: agent {agent_id}, capability {capability_id}")]
    UnknownLinkTarget {
        /// Referenced agent.
        agent_id: AgentId,
        /// Referenced capability.
        capability_id: CapabilityId,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// The backing store failed or could not be reached.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RegistryStoreError {
    /// Builds a duplicate agent error for the given name and version.
    pub fn duplicate_agent(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::DuplicateAgent {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns whether the error is a uniqueness violation.
    #[must_use]
    pub const fn is_uniqueness_violation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateAgent { .. } | Self::DuplicateCapability(_)
        )
    }
}
