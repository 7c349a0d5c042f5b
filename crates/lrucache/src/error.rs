//! Error types for lrucache

use thiserror::Error;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
///
/// A missing key is not an error: lookups report it as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Capacity must be a positive integer
    #[error("Invalid configuration: capacity must be positive, got {capacity}")]
    InvalidConfiguration {
        /// The rejected capacity
        capacity: i64,
    },

    /// Operation attempted before a successful `configure`
    #[error("Cache is not configured")]
    NotConfigured,
}
