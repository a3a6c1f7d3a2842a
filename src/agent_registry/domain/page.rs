//! Offset and limit window for paginated reads.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};

/// Number of rows returned when the caller does not choose a limit.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// A window over rows ordered by identifier.
///
/// Bounds are unsigned, so negative offsets or limits cannot reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    offset: u32,
    limit: u32,
}

impl Page {
    /// Creates a page skipping `offset` rows and returning at most `limit`.
    #[must_use]
    pub const fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Creates a page from signed bounds as supplied by a request layer.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidPageOffset`] or
    /// [`RegistryDomainError::InvalidPageLimit`] when a bound is negative or
    /// larger than `u32::MAX`.
    pub fn from_signed(offset: i64, limit: i64) -> Result<Self, RegistryDomainError> {
        let checked_offset =
            u32::try_from(offset).map_err(|_| RegistryDomainError::InvalidPageOffset(offset))?;
        let checked_limit =
            u32::try_from(limit).map_err(|_| RegistryDomainError::InvalidPageLimit(limit))?;
        Ok(Self::new(checked_offset, checked_limit))
    }

    /// Returns the number of rows to skip.
    #[must_use]
    pub const fn offset(self) -> u32 {
        self.offset
    }

    /// Returns the maximum number of rows to return.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}
