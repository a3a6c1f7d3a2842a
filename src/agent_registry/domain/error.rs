//! Error types for agent registry domain values.

use thiserror::Error;

/// Errors returned while constructing registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryDomainError {
    /// The page offset is negative or does not fit the storage range.
    #[error("page offset out of range: {0}")]
    InvalidPageOffset(i64),

    /// The page limit is negative or does not fit the storage range.
    #[error("page limit out of range: {0}")]
    InvalidPageLimit(i64),
}

/// Error returned while parsing a deleted-agent visibility setting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown deleted agent visibility: {0}")]
pub struct ParseVisibilityError(pub String);
