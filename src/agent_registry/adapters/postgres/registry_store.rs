//! `PostgreSQL` registry store implementation.

use super::queries;
use crate::agent_registry::{
    domain::{
        Agent, AgentId, Capability, CapabilityId, DeletedAgentVisibility, NewAgent,
        NewCapability, Page,
    },
    ports::{RegistryStore, RegistryStoreError, RegistryStoreResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by registry adapters.
pub type RegistryPgPool = Pool<ConnectionManager<PgConnection>>;

/// Idempotent DDL for the agent, capability, and association tables.
pub const REGISTRY_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-19-000000_create_registry_tables/up.sql");

/// `PostgreSQL`-backed registry store.
///
/// Each operation checks out one pooled connection on a blocking thread and
/// returns it to the pool when the operation finishes, whether or not it
/// succeeded.
#[derive(Debug, Clone)]
pub struct PostgresRegistryStore {
    pool: RegistryPgPool,
}

impl PostgresRegistryStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: RegistryPgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &RegistryPgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> RegistryStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RegistryStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RegistryStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RegistryStoreError::persistence)?
    }
}

impl From<diesel::result::Error> for RegistryStoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl RegistryStore for PostgresRegistryStore {
    async fn initialize(&self) -> RegistryStoreResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(REGISTRY_SCHEMA_SQL)
                .map_err(RegistryStoreError::persistence)
        })
        .await
    }

    async fn insert_agent(&self, agent: &NewAgent) -> RegistryStoreResult<Agent> {
        let new_agent = agent.clone();
        self.run_blocking(move |connection| queries::insert_agent(connection, &new_agent))
            .await
    }

    async fn insert_capability(
        &self,
        capability: &NewCapability,
    ) -> RegistryStoreResult<Capability> {
        let new_capability = capability.clone();
        self.run_blocking(move |connection| {
            queries::insert_capability(connection, &new_capability)
        })
        .await
    }

    async fn find_capability_by_name(&self, name: &str) -> RegistryStoreResult<Option<Capability>> {
        let name_str = name.to_owned();
        self.run_blocking(move |connection| queries::find_capability_by_name(connection, &name_str))
            .await
    }

    async fn find_capability_by_id(
        &self,
        id: CapabilityId,
    ) -> RegistryStoreResult<Option<Capability>> {
        self.run_blocking(move |connection| queries::find_capability_by_id(connection, id))
            .await
    }

    async fn find_agent_by_id(&self, id: AgentId) -> RegistryStoreResult<Option<Agent>> {
        self.run_blocking(move |connection| queries::find_agent_by_id(connection, id))
            .await
    }

    async fn list_agents(
        &self,
        page: Page,
        visibility: DeletedAgentVisibility,
    ) -> RegistryStoreResult<Vec<Agent>> {
        self.run_blocking(move |connection| queries::list_agents(connection, page, visibility))
            .await
    }

    async fn list_capabilities(&self, page: Page) -> RegistryStoreResult<Vec<Capability>> {
        self.run_blocking(move |connection| queries::list_capabilities(connection, page))
            .await
    }

    async fn link_agent_capability(
        &self,
        agent_id: AgentId,
        capability_id: CapabilityId,
    ) -> RegistryStoreResult<()> {
        self.run_blocking(move |connection| {
            queries::link_agent_capability(connection, agent_id, capability_id)
        })
        .await
    }

    async fn find_agents_by_capability_name(
        &self,
        name: &str,
        visibility: DeletedAgentVisibility,
    ) -> RegistryStoreResult<Vec<Agent>> {
        let name_str = name.to_owned();
        self.run_blocking(move |connection| {
            queries::find_agents_by_capability_name(connection, &name_str, visibility)
        })
        .await
    }

    async fn create_agent_atomically(
        &self,
        agent: &NewAgent,
        capabilities: &[NewCapability],
    ) -> RegistryStoreResult<Agent> {
        let new_agent = agent.clone();
        let new_capabilities = capabilities.to_vec();
        self.run_blocking(move |connection| {
            connection.transaction::<_, RegistryStoreError, _>(|tx_conn| {
                let linked = queries::get_or_create_capabilities(tx_conn, &new_capabilities)?;

                let created = queries::insert_agent(tx_conn, &new_agent)?;
                for capability in &linked {
                    queries::link_agent_capability(tx_conn, created.id(), capability.id())?;
                }
                Ok(created.with_capabilities(linked))
            })
        })
        .await
    }
}
