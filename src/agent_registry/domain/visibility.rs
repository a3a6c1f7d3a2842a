//! Visibility of soft-deleted agents in listings and searches.

use super::ParseVisibilityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Controls whether soft-deleted agents appear in read results.
///
/// Name and version uniqueness is unaffected: a soft-deleted agent always
/// blocks reuse of its name and version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletedAgentVisibility {
    /// Soft-deleted agents are returned like any other agent.
    #[default]
    Include,
    /// Soft-deleted agents are filtered out.
    Exclude,
}

impl DeletedAgentVisibility {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }

    /// Returns whether an agent with the given deletion flag is visible.
    #[must_use]
    pub const fn admits(self, is_deleted: bool) -> bool {
        match self {
            Self::Include => true,
            Self::Exclude => !is_deleted,
        }
    }
}

impl fmt::Display for DeletedAgentVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DeletedAgentVisibility {
    type Error = ParseVisibilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "include" => Ok(Self::Include),
            "exclude" => Ok(Self::Exclude),
            _ => Err(ParseVisibilityError(value.to_owned())),
        }
    }
}
