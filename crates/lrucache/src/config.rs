//! Cache configuration

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Default capacity used by `CacheConfig::default()`
pub const DEFAULT_CAPACITY: i64 = 16;

/// Cache configuration.
///
/// The capacity is signed so that values coming from user input or a config
/// file are rejected with `Error::InvalidConfiguration` instead of failing to
/// deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub capacity: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Create a config with the given capacity
    pub fn new(capacity: i64) -> Self {
        Self { capacity }
    }

    /// Check the capacity and convert it to the form the engine stores
    ///
    /// # Returns
    /// * `Result<NonZeroUsize>` - Validated capacity
    pub fn validate(&self) -> Result<NonZeroUsize> {
        usize::try_from(self.capacity)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                warn!("Rejected cache capacity {}", self.capacity);
                Error::InvalidConfiguration {
                    capacity: self.capacity,
                }
            })
    }
}
