//! In-memory registry store for tests and database-free embedding.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::agent_registry::{
    domain::{
        Agent, AgentId, Capability, CapabilityId, DeletedAgentVisibility, NewAgent,
        NewCapability, Page, PersistedAgentData, dedup_capabilities,
    },
    ports::{RegistryStore, RegistryStoreError, RegistryStoreResult},
};

/// Thread-safe in-memory registry store.
///
/// Identifiers are assigned sequentially from 1, mirroring a database
/// sequence. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistryStore {
    state: Arc<RwLock<InMemoryRegistryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRegistryState {
    last_agent_id: i64,
    last_capability_id: i64,
    agents: BTreeMap<AgentId, Agent>,
    agent_keys: HashSet<(String, String)>,
    capabilities: BTreeMap<CapabilityId, Capability>,
    capability_names: HashMap<String, CapabilityId>,
    links: Vec<(AgentId, CapabilityId)>,
}

impl InMemoryRegistryState {
    fn insert_agent(&mut self, agent: &NewAgent) -> RegistryStoreResult<Agent> {
        let fields = agent.fields();
        let key = (fields.name().to_owned(), fields.version().to_owned());
        if self.agent_keys.contains(&key) {
            return Err(RegistryStoreError::duplicate_agent(key.0, key.1));
        }

        self.last_agent_id += 1;
        let id = AgentId::new(self.last_agent_id);
        let stored = Agent::from_persisted(PersistedAgentData {
            id,
            fields: fields.clone(),
            created_at: agent.created_at(),
            is_deleted: false,
            capabilities: Vec::new(),
        });
        self.agent_keys.insert(key);
        self.agents.insert(id, stored.clone());
        Ok(stored)
    }

    fn insert_capability(&mut self, capability: &NewCapability) -> RegistryStoreResult<Capability> {
        if self.capability_names.contains_key(capability.name()) {
            return Err(RegistryStoreError::DuplicateCapability(
                capability.name().to_owned(),
            ));
        }

        self.last_capability_id += 1;
        let id = CapabilityId::new(self.last_capability_id);
        let stored = Capability::from_persisted(
            id,
            capability.name().to_owned(),
            capability.description().map(str::to_owned),
        );
        self.capability_names
            .insert(capability.name().to_owned(), id);
        self.capabilities.insert(id, stored.clone());
        Ok(stored)
    }

    fn find_capability_by_name(&self, name: &str) -> Option<Capability> {
        self.capability_names
            .get(name)
            .and_then(|id| self.capabilities.get(id))
            .cloned()
    }

    fn get_or_create_capability(
        &mut self,
        capability: &NewCapability,
    ) -> RegistryStoreResult<Capability> {
        match self.find_capability_by_name(capability.name()) {
            Some(existing) => Ok(existing),
            None => self.insert_capability(capability),
        }
    }

    fn link(&mut self, agent_id: AgentId, capability_id: CapabilityId) -> RegistryStoreResult<()> {
        if !self.agents.contains_key(&agent_id) || !self.capabilities.contains_key(&capability_id)
        {
            return Err(RegistryStoreError::UnknownLinkTarget {
                agent_id,
                capability_id,
            });
        }
        self.links.push((agent_id, capability_id));
        Ok(())
    }

    fn with_linked_capabilities(&self, agent: &Agent) -> Agent {
        let linked: Vec<Capability> = self
            .links
            .iter()
            .filter(|(agent_id, _)| *agent_id == agent.id())
            .filter_map(|(_, capability_id)| self.capabilities.get(capability_id))
            .cloned()
            .collect();
        agent.clone().with_capabilities(dedup_capabilities(linked))
    }
}

impl InMemoryRegistryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the soft-delete flag of a stored agent.
    ///
    /// The registry exposes no deletion operation; this seeds soft-deleted
    /// rows the way an external import or administrative tool would.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryStoreError::Persistence`] when the agent does not
    /// exist or the state lock is poisoned.
    pub fn set_deleted_flag(&self, id: AgentId, is_deleted: bool) -> RegistryStoreResult<()> {
        let mut state = self.write_state()?;
        let stored = state.agents.get(&id).cloned().ok_or_else(|| {
            RegistryStoreError::persistence(std::io::Error::other(format!(
                "agent not found: {id}"
            )))
        })?;
        let updated = Agent::from_persisted(PersistedAgentData {
            id,
            fields: stored.fields().clone(),
            created_at: stored.created_at(),
            is_deleted,
            capabilities: Vec::new(),
        });
        state.agents.insert(id, updated);
        Ok(())
    }

    /// Returns the number of stored association rows.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryStoreError::Persistence`] when the state lock is
    /// poisoned.
    pub fn link_count(&self) -> RegistryStoreResult<usize> {
        Ok(self.read_state()?.links.len())
    }

    fn read_state(&self) -> RegistryStoreResult<RwLockReadGuard<'_, InMemoryRegistryState>> {
        self.state.read().map_err(|err| {
            RegistryStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(&self) -> RegistryStoreResult<RwLockWriteGuard<'_, InMemoryRegistryState>> {
        self.state.write().map_err(|err| {
            RegistryStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn page_bounds(page: Page) -> (usize, usize) {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    (offset, limit)
}

#[async_trait]
impl RegistryStore for InMemoryRegistryStore {
    async fn initialize(&self) -> RegistryStoreResult<()> {
        self.read_state().map(drop)
    }

    async fn insert_agent(&self, agent: &NewAgent) -> RegistryStoreResult<Agent> {
        self.write_state()?.insert_agent(agent)
    }

    async fn insert_capability(
        &self,
        capability: &NewCapability,
    ) -> RegistryStoreResult<Capability> {
        self.write_state()?.insert_capability(capability)
    }

    async fn find_capability_by_name(&self, name: &str) -> RegistryStoreResult<Option<Capability>> {
        Ok(self.read_state()?.find_capability_by_name(name))
    }

    async fn find_capability_by_id(
        &self,
        id: CapabilityId,
    ) -> RegistryStoreResult<Option<Capability>> {
        Ok(self.read_state()?.capabilities.get(&id).cloned())
    }

    async fn find_agent_by_id(&self, id: AgentId) -> RegistryStoreResult<Option<Agent>> {
        let state = self.read_state()?;
        Ok(state
            .agents
            .get(&id)
            .map(|agent| state.with_linked_capabilities(agent)))
    }

    async fn list_agents(
        &self,
        page: Page,
        visibility: DeletedAgentVisibility,
    ) -> RegistryStoreResult<Vec<Agent>> {
        let state = self.read_state()?;
        let (offset, limit) = page_bounds(page);
        Ok(state
            .agents
            .values()
            .filter(|agent| visibility.admits(agent.is_deleted()))
            .skip(offset)
            .take(limit)
            .map(|agent| state.with_linked_capabilities(agent))
            .collect())
    }

    async fn list_capabilities(&self, page: Page) -> RegistryStoreResult<Vec<Capability>> {
        let state = self.read_state()?;
        let (offset, limit) = page_bounds(page);
        Ok(state
            .capabilities
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn link_agent_capability(
        &self,
        agent_id: AgentId,
        capability_id: CapabilityId,
    ) -> RegistryStoreResult<()> {
        self.write_state()?.link(agent_id, capability_id)
    }

    async fn find_agents_by_capability_name(
        &self,
        name: &str,
        visibility: DeletedAgentVisibility,
    ) -> RegistryStoreResult<Vec<Agent>> {
        let state = self.read_state()?;
        let Some(capability_id) = state.capability_names.get(name).copied() else {
            return Ok(Vec::new());
        };
        let matching: HashSet<AgentId> = state
            .links
            .iter()
            .filter(|(_, linked)| *linked == capability_id)
            .map(|(agent_id, _)| *agent_id)
            .collect();
        Ok(state
            .agents
            .values()
            .filter(|agent| matching.contains(&agent.id()))
            .filter(|agent| visibility.admits(agent.is_deleted()))
            .map(|agent| state.with_linked_capabilities(agent))
            .collect())
    }

    async fn create_agent_atomically(
        &self,
        agent: &NewAgent,
        capabilities: &[NewCapability],
    ) -> RegistryStoreResult<Agent> {
        let mut state = self.write_state()?;

        let fields = agent.fields();
        let key = (fields.name().to_owned(), fields.version().to_owned());
        if state.agent_keys.contains(&key) {
            return Err(RegistryStoreError::duplicate_agent(key.0, key.1));
        }

        let mut collected = Vec::with_capacity(capabilities.len());
        for capability in capabilities {
            collected.push(state.get_or_create_capability(capability)?);
        }
        let linked = dedup_capabilities(collected);

        let created = state.insert_agent(agent)?;
        for capability in &linked {
            state.link(created.id(), capability.id())?;
        }
        Ok(created.with_capabilities(linked))
    }
}
