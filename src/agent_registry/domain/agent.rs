//! Registered agent aggregate and its input types.

use super::{AgentId, Capability};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied descriptive fields of an agent.
///
/// The `OpenAPI` document is stored opaquely and never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFields {
    name: String,
    version: String,
    display_name: Option<String>,
    description: String,
    owner: String,
    endpoint: String,
    openapi_spec: Value,
    environment: String,
    tags: Option<Vec<String>>,
    openapi_spec_s3_uri: Option<String>,
    openapi_spec_checksum: Option<String>,
}

impl AgentFields {
    /// Creates agent fields with every required value.
    ///
    /// Optional fields default to `None` and are set with the `with_*`
    /// builders.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
        owner: impl Into<String>,
        endpoint: impl Into<String>,
        openapi_spec: Value,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            display_name: None,
            description: description.into(),
            owner: owner.into(),
            endpoint: endpoint.into(),
            openapi_spec,
            environment: environment.into(),
            tags: None,
            openapi_spec_s3_uri: None,
            openapi_spec_checksum: None,
        }
    }

    /// Sets the human-readable display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the tags, preserving their order.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Points at a copy of the full `OpenAPI` document stored out of band.
    #[must_use]
    pub fn with_openapi_spec_s3_uri(mut self, uri: impl Into<String>) -> Self {
        self.openapi_spec_s3_uri = Some(uri.into());
        self
    }

    /// Sets the integrity hash of the out-of-band `OpenAPI` document.
    #[must_use]
    pub fn with_openapi_spec_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.openapi_spec_checksum = Some(checksum.into());
        self
    }

    /// Returns the agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agent version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the owner.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the opaque `OpenAPI` document.
    #[must_use]
    pub const fn openapi_spec(&self) -> &Value {
        &self.openapi_spec
    }

    /// Returns the deployment environment, such as `prod` or `staging`.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Returns the tags, if any.
    #[must_use]
    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    /// Returns the out-of-band `OpenAPI` document location, if any.
    #[must_use]
    pub fn openapi_spec_s3_uri(&self) -> Option<&str> {
        self.openapi_spec_s3_uri.as_deref()
    }

    /// Returns the out-of-band `OpenAPI` document checksum, if any.
    #[must_use]
    pub fn openapi_spec_checksum(&self) -> Option<&str> {
        self.openapi_spec_checksum.as_deref()
    }
}

/// An agent ready for insertion, stamped with its creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAgent {
    fields: AgentFields,
    created_at: DateTime<Utc>,
}

impl NewAgent {
    /// Stamps agent fields with the current clock time.
    #[must_use]
    pub fn new(fields: AgentFields, clock: &impl Clock) -> Self {
        Self {
            fields,
            created_at: clock.utc(),
        }
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn fields(&self) -> &AgentFields {
        &self.fields
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Parameter object for reconstructing a persisted agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAgentData {
    /// Persisted agent identifier.
    pub id: AgentId,
    /// Persisted descriptive fields.
    pub fields: AgentFields,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted soft-delete flag.
    pub is_deleted: bool,
    /// Capabilities linked to the agent.
    pub capabilities: Vec<Capability>,
}

/// Registered agent aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    #[serde(flatten)]
    fields: AgentFields,
    created_at: DateTime<Utc>,
    is_deleted: bool,
    capabilities: Vec<Capability>,
}

impl Agent {
    /// Reconstructs an agent from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentData) -> Self {
        Self {
            id: data.id,
            fields: data.fields,
            created_at: data.created_at,
            is_deleted: data.is_deleted,
            capabilities: data.capabilities,
        }
    }

    /// Replaces the linked capability list.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<Capability>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn fields(&self) -> &AgentFields {
        &self.fields
    }

    /// Returns the agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.fields.name()
    }

    /// Returns the agent version.
    #[must_use]
    pub fn version(&self) -> &str {
        self.fields.version()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the agent is soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns the linked capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Returns the names of the linked capabilities.
    #[must_use]
    pub fn capability_names(&self) -> Vec<&str> {
        self.capabilities.iter().map(Capability::name).collect()
    }
}
