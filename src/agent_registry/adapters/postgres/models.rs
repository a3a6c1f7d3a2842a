//! Diesel row models for agent registry persistence.

use super::schema::{agent_capabilities, agents, capabilities};
use crate::agent_registry::domain::{
    Agent, AgentFields, AgentId, Capability, CapabilityId, NewAgent, NewCapability,
    PersistedAgentData,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for agent records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = agents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AgentRow {
    /// Agent identifier.
    pub id: i64,
    /// Agent name.
    pub name: String,
    /// Agent version.
    pub version: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: String,
    /// Owner.
    pub owner: String,
    /// Endpoint URL.
    pub endpoint: String,
    /// `OpenAPI` document.
    pub openapi_spec: Value,
    /// Deployment environment.
    pub environment: String,
    /// Ordered tags.
    pub tags: Option<Vec<String>>,
    /// Out-of-band document location.
    pub openapi_spec_s3_uri: Option<String>,
    /// Out-of-band document checksum.
    pub openapi_spec_checksum: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

impl AgentRow {
    /// Converts the row into an agent carrying the given capabilities.
    pub fn into_agent(self, capabilities: Vec<Capability>) -> Agent {
        let Self {
            id,
            name,
            version,
            display_name,
            description,
            owner,
            endpoint,
            openapi_spec,
            environment,
            tags,
            openapi_spec_s3_uri,
            openapi_spec_checksum,
            created_at,
            is_deleted,
        } = self;

        let mut fields = AgentFields::new(
            name,
            version,
            description,
            owner,
            endpoint,
            openapi_spec,
            environment,
        );
        if let Some(value) = display_name {
            fields = fields.with_display_name(value);
        }
        if let Some(value) = tags {
            fields = fields.with_tags(value);
        }
        if let Some(value) = openapi_spec_s3_uri {
            fields = fields.with_openapi_spec_s3_uri(value);
        }
        if let Some(value) = openapi_spec_checksum {
            fields = fields.with_openapi_spec_checksum(value);
        }

        Agent::from_persisted(PersistedAgentData {
            id: AgentId::new(id),
            fields,
            created_at,
            is_deleted,
            capabilities,
        })
    }
}

/// Insert model for agent records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agents)]
pub struct NewAgentRow {
    /// Agent name.
    pub name: String,
    /// Agent version.
    pub version: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: String,
    /// Owner.
    pub owner: String,
    /// Endpoint URL.
    pub endpoint: String,
    /// `OpenAPI` document.
    pub openapi_spec: Value,
    /// Deployment environment.
    pub environment: String,
    /// Ordered tags.
    pub tags: Option<Vec<String>>,
    /// Out-of-band document location.
    pub openapi_spec_s3_uri: Option<String>,
    /// Out-of-band document checksum.
    pub openapi_spec_checksum: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub is_deleted: bool,
}

impl From<&NewAgent> for NewAgentRow {
    fn from(agent: &NewAgent) -> Self {
        let fields = agent.fields();
        Self {
            name: fields.name().to_owned(),
            version: fields.version().to_owned(),
            display_name: fields.display_name().map(str::to_owned),
            description: fields.description().to_owned(),
            owner: fields.owner().to_owned(),
            endpoint: fields.endpoint().to_owned(),
            openapi_spec: fields.openapi_spec().clone(),
            environment: fields.environment().to_owned(),
            tags: fields.tags().map(<[String]>::to_vec),
            openapi_spec_s3_uri: fields.openapi_spec_s3_uri().map(str::to_owned),
            openapi_spec_checksum: fields.openapi_spec_checksum().map(str::to_owned),
            created_at: agent.created_at(),
            is_deleted: false,
        }
    }
}

/// Query result row for capability records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = capabilities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CapabilityRow {
    /// Capability identifier.
    pub id: i64,
    /// Unique capability name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl From<CapabilityRow> for Capability {
    fn from(row: CapabilityRow) -> Self {
        Self::from_persisted(CapabilityId::new(row.id), row.name, row.description)
    }
}

/// Insert model for capability records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = capabilities)]
pub struct NewCapabilityRow {
    /// Unique capability name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl From<&NewCapability> for NewCapabilityRow {
    fn from(capability: &NewCapability) -> Self {
        Self {
            name: capability.name().to_owned(),
            description: capability.description().map(str::to_owned),
        }
    }
}

/// Insert model for association rows.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = agent_capabilities)]
pub struct AgentCapabilityRow {
    /// Linked agent.
    pub agent_id: i64,
    /// Linked capability.
    pub capability_id: i64,
}
