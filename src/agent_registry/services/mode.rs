//! How agent creation composes its storage writes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Write strategy for agent creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateAgentMode {
    /// Capabilities, the agent, and its links are written in one store
    /// transaction. A rejected agent leaves no new capabilities behind.
    #[default]
    Atomic,
    /// Each capability, the agent, and each link is a separate durable
    /// write. Capabilities created before a rejected agent insert persist.
    StepWise,
}

impl CreateAgentMode {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::StepWise => "stepwise",
        }
    }
}

impl fmt::Display for CreateAgentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing a create-agent mode.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown create agent mode: {0}")]
pub struct ParseCreateAgentModeError(pub String);

impl TryFrom<&str> for CreateAgentMode {
    type Error = ParseCreateAgentModeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "atomic" => Ok(Self::Atomic),
            "stepwise" | "step_wise" => Ok(Self::StepWise),
            _ => Err(ParseCreateAgentModeError(value.to_owned())),
        }
    }
}
