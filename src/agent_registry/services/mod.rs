//! Application services for agent registration and capability discovery.

mod mode;
mod registry;

pub use mode::{CreateAgentMode, ParseCreateAgentModeError};
pub use registry::{
    CreateAgentRequest, RegistryService, RegistryServiceError, RegistryServiceResult,
};
