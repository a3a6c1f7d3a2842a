//! Service layer for agent registration and capability discovery.
//!
//! Provides [`RegistryService`] which composes store calls into the create,
//! list, and search workflows consumed by an external request layer.

use super::CreateAgentMode;
use crate::agent_registry::{
    domain::{
        Agent, AgentFields, AgentId, Capability, DeletedAgentVisibility, NewAgent, NewCapability,
        Page, RegistryDomainError, dedup_capabilities,
    },
    ports::{RegistryStore, RegistryStoreError},
};
use crate::config::RegistryConfig;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for registering an agent with its capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAgentRequest {
    agent: AgentFields,
    capabilities: Vec<NewCapability>,
}

impl CreateAgentRequest {
    /// Creates a request with no capabilities.
    #[must_use]
    pub const fn new(agent: AgentFields) -> Self {
        Self {
            agent,
            capabilities: Vec::new(),
        }
    }

    /// Appends one capability input.
    #[must_use]
    pub fn with_capability(mut self, capability: NewCapability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Appends capability inputs in order.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = NewCapability>) -> Self {
        self.capabilities.extend(capabilities);
        self
    }

    /// Returns the agent fields.
    #[must_use]
    pub const fn agent(&self) -> &AgentFields {
        &self.agent
    }

    /// Returns the capability inputs in the order given.
    #[must_use]
    pub fn capabilities(&self) -> &[NewCapability] {
        &self.capabilities
    }
}

/// Service-level errors for registry operations.
#[derive(Debug, Error)]
pub enum RegistryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] RegistryDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] RegistryStoreError),
}

impl RegistryServiceError {
    /// Returns whether the error is a uniqueness violation.
    #[must_use]
    pub const fn is_uniqueness_violation(&self) -> bool {
        match self {
            Self::Store(err) => err.is_uniqueness_violation(),
            Self::Domain(_) => false,
        }
    }
}

/// Result type for registry service operations.
pub type RegistryServiceResult<T> = Result<T, RegistryServiceError>;

/// Agent registration and discovery orchestration service.
#[derive(Clone)]
pub struct RegistryService<S, C>
where
    S: RegistryStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    mode: CreateAgentMode,
    deleted_agents: DeletedAgentVisibility,
}

impl<S, C> RegistryService<S, C>
where
    S: RegistryStore,
    C: Clock + Send + Sync,
{
    /// Creates a service with atomic agent creation and soft-deleted agents
    /// included in reads.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            mode: CreateAgentMode::default(),
            deleted_agents: DeletedAgentVisibility::default(),
        }
    }

    /// Creates a service using the policies from `config`.
    #[must_use]
    pub fn from_config(store: Arc<S>, clock: Arc<C>, config: &RegistryConfig) -> Self {
        Self::new(store, clock)
            .with_create_agent_mode(config.create_agent_mode())
            .with_deleted_agents(config.deleted_agents())
    }

    /// Sets the agent creation write strategy.
    #[must_use]
    pub const fn with_create_agent_mode(mut self, mode: CreateAgentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets whether soft-deleted agents appear in listings and searches.
    #[must_use]
    pub const fn with_deleted_agents(mut self, visibility: DeletedAgentVisibility) -> Self {
        self.deleted_agents = visibility;
        self
    }

    /// Returns the agent creation write strategy.
    #[must_use]
    pub const fn create_agent_mode(&self) -> CreateAgentMode {
        self.mode
    }

    /// Returns the soft-deleted agent visibility used for reads.
    #[must_use]
    pub const fn deleted_agents(&self) -> DeletedAgentVisibility {
        self.deleted_agents
    }

    /// Ensures the backing tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Store`] when the store cannot apply
    /// its schema.
    pub async fn initialize(&self) -> RegistryServiceResult<()> {
        self.store.initialize().await?;
        debug!("registry store initialized");
        Ok(())
    }

    /// Registers an agent, reusing capabilities that already exist by name
    /// and creating the rest.
    ///
    /// The returned agent lists each distinct capability once, ordered by
    /// capability id as reads return them.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryStoreError::DuplicateAgent`] (wrapped in
    /// [`RegistryServiceError::Store`]) when the name and version pair is
    /// taken, or any other store failure unchanged.
    pub async fn create_agent(&self, request: CreateAgentRequest) -> RegistryServiceResult<Agent> {
        let CreateAgentRequest {
            agent,
            capabilities,
        } = request;
        let new_agent = NewAgent::new(agent, &*self.clock);

        let result = match self.mode {
            CreateAgentMode::Atomic => self
                .store
                .create_agent_atomically(&new_agent, &capabilities)
                .await
                .map_err(RegistryServiceError::from),
            CreateAgentMode::StepWise => self.create_agent_step_wise(&new_agent, &capabilities).await,
        };

        match &result {
            Ok(created) => info!(
                agent_id = %created.id(),
                name = created.name(),
                version = created.version(),
                capabilities = created.capabilities().len(),
                mode = %self.mode,
                "agent registered"
            ),
            Err(err) if err.is_uniqueness_violation() => warn!(
                name = new_agent.fields().name(),
                version = new_agent.fields().version(),
                error = %err,
                "agent registration rejected"
            ),
            Err(err) => warn!(error = %err, "agent registration failed"),
        }
        result
    }

    async fn create_agent_step_wise(
        &self,
        new_agent: &NewAgent,
        capabilities: &[NewCapability],
    ) -> RegistryServiceResult<Agent> {
        let mut collected = Vec::with_capacity(capabilities.len());
        for capability in capabilities {
            collected.push(self.get_or_create_capability(capability).await?);
        }
        let linked = dedup_capabilities(collected);

        let created = self.store.insert_agent(new_agent).await?;
        for capability in &linked {
            self.store
                .link_agent_capability(created.id(), capability.id())
                .await?;
        }
        Ok(created.with_capabilities(linked))
    }

    /// Looks a capability up by name and creates it when absent.
    ///
    /// The lookup and insert are separate writes, so a concurrent creator can
    /// win the insert. That uniqueness failure is answered by one more
    /// lookup.
    async fn get_or_create_capability(
        &self,
        capability: &NewCapability,
    ) -> RegistryServiceResult<Capability> {
        let name = capability.name();
        if let Some(existing) = self.store.find_capability_by_name(name).await? {
            return Ok(existing);
        }

        match self.store.insert_capability(capability).await {
            Ok(created) => {
                debug!(capability_id = %created.id(), name, "capability created");
                Ok(created)
            }
            Err(RegistryStoreError::DuplicateCapability(_)) => {
                warn!(name, "capability created concurrently, retrying lookup");
                self.store
                    .find_capability_by_name(name)
                    .await?
                    .ok_or_else(|| RegistryStoreError::DuplicateCapability(name.to_owned()).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Registers a standalone capability.
    ///
    /// Unlike agent creation, an existing name is an error rather than
    /// reused.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryStoreError::DuplicateCapability`] (wrapped in
    /// [`RegistryServiceError::Store`]) when the name is taken.
    pub async fn create_capability(
        &self,
        capability: NewCapability,
    ) -> RegistryServiceResult<Capability> {
        match self.store.insert_capability(&capability).await {
            Ok(created) => {
                info!(capability_id = %created.id(), name = created.name(), "capability registered");
                Ok(created)
            }
            Err(err) => {
                warn!(name = capability.name(), error = %err, "capability registration rejected");
                Err(err.into())
            }
        }
    }

    /// Returns a page of agents, with capabilities, in identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Store`] when the store read fails.
    pub async fn list_agents(&self, page: Page) -> RegistryServiceResult<Vec<Agent>> {
        let agents = self.store.list_agents(page, self.deleted_agents).await?;
        debug!(
            offset = page.offset(),
            limit = page.limit(),
            returned = agents.len(),
            "listed agents"
        );
        Ok(agents)
    }

    /// Returns a page of agents for signed bounds from a request layer.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Domain`] when either bound is
    /// negative, or [`RegistryServiceError::Store`] when the read fails.
    pub async fn list_agents_in_range(
        &self,
        offset: i64,
        limit: i64,
    ) -> RegistryServiceResult<Vec<Agent>> {
        let page = Page::from_signed(offset, limit)?;
        self.list_agents(page).await
    }

    /// Returns every agent providing the named capability.
    ///
    /// Unknown capability names yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Store`] when the store read fails.
    pub async fn search_agents_by_capability(
        &self,
        name: &str,
    ) -> RegistryServiceResult<Vec<Agent>> {
        let agents = self
            .store
            .find_agents_by_capability_name(name, self.deleted_agents)
            .await?;
        debug!(capability = name, returned = agents.len(), "searched agents");
        Ok(agents)
    }

    /// Finds an agent by identifier.
    ///
    /// Returns `Ok(None)` when no agent has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Store`] when the store read fails.
    pub async fn find_agent(&self, id: AgentId) -> RegistryServiceResult<Option<Agent>> {
        Ok(self.store.find_agent_by_id(id).await?)
    }

    /// Finds a capability by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Store`] when the store read fails.
    pub async fn find_capability_by_name(
        &self,
        name: &str,
    ) -> RegistryServiceResult<Option<Capability>> {
        Ok(self.store.find_capability_by_name(name).await?)
    }

    /// Returns a page of capabilities in identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryServiceError::Store`] when the store read fails.
    pub async fn list_capabilities(&self, page: Page) -> RegistryServiceResult<Vec<Capability>> {
        Ok(self.store.list_capabilities(page).await?)
    }
}
