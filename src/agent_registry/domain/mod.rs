//! Domain model for agent registration and capability discovery.
//!
//! The registry domain models registered agents, the named capabilities they
//! provide, and the paging and visibility rules used when reading them back.
//! All infrastructure concerns are kept outside the domain boundary.

mod agent;
mod capability;
mod error;
mod ids;
mod page;
mod visibility;

pub use agent::{Agent, AgentFields, NewAgent, PersistedAgentData};
pub use capability::{Capability, NewCapability, dedup_capabilities};
pub use error::{ParseVisibilityError, RegistryDomainError};
pub use ids::{AgentId, CapabilityId};
pub use page::{DEFAULT_PAGE_LIMIT, Page};
pub use visibility::DeletedAgentVisibility;
