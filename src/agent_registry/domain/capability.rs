//! Capabilities: named features shared by name across agents.

use super::CapabilityId;
use serde::{Deserialize, Serialize};

/// A stored capability.
///
/// The name is the deduplication key. It is compared exactly, without case
/// or whitespace normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    id: CapabilityId,
    name: String,
    description: Option<String>,
}

impl Capability {
    /// Reconstructs a capability from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: CapabilityId,
        name: String,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            description,
        }
    }

    /// Returns the capability identifier.
    #[must_use]
    pub const fn id(&self) -> CapabilityId {
        self.id
    }

    /// Returns the unique capability name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Caller-supplied fields for a capability that may not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCapability {
    name: String,
    description: Option<String>,
}

impl NewCapability {
    /// Creates capability input with no description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the capability name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Orders capabilities by id and drops repeated ids.
///
/// Agent reads and agent creation both return capabilities in this order.
#[must_use]
pub fn dedup_capabilities(mut capabilities: Vec<Capability>) -> Vec<Capability> {
    capabilities.sort_by_key(Capability::id);
    capabilities.dedup_by_key(|capability| capability.id());
    capabilities
}
