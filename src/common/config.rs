//! Configuration constants and buffer pool settings.

use crate::buffer::replacer::ReplacementPolicy;
use crate::common::{Error, Result};

/// Size of a page (and of every block of a page file) in bytes.
///
/// Shared by the storage backends and the buffer pool: every block read,
/// block write and frame buffer is exactly this size.
///
/// # Alignment
/// Pages are aligned to 4096 bytes for efficient Direct I/O (O_DIRECT).
pub const PAGE_SIZE: usize = 4096;

/// Number of frames used when a pool is configured without an explicit size.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Largest number of blocks a store can hold.
///
/// Block counts are `u32`, so page numbers run from 0 to `MAX_PAGES - 1`;
/// `PageId(u32::MAX)` can never be stored.
pub const MAX_PAGES: u32 = u32::MAX;

/// Settings fixed when a buffer pool is opened.
///
/// Capacity and policy are immutable for the life of the pool.
///
/// # Example
/// ```
/// use pagecache::{BufferPoolConfig, ReplacementPolicy};
///
/// let config = BufferPoolConfig::new(3, ReplacementPolicy::Clock).with_pool_id("orders");
/// assert_eq!(config.capacity, 3);
/// assert_eq!(config.pool_id, "orders");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferPoolConfig {
    /// Name used in log output to tell pools apart.
    pub pool_id: String,
    /// Number of frames in the pool.
    pub capacity: usize,
    /// Replacement discipline used on a capacity-exhausted miss.
    pub policy: ReplacementPolicy,
}

impl BufferPoolConfig {
    /// Create a config with the given capacity and policy.
    pub fn new(capacity: usize, policy: ReplacementPolicy) -> Self {
        Self {
            pool_id: String::from("default"),
            capacity,
            policy,
        }
    }

    /// Set the pool id.
    pub fn with_pool_id(mut self, pool_id: impl Into<String>) -> Self {
        self.pool_id = pool_id.into();
        self
    }

    /// Check that the settings describe a usable pool.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE, ReplacementPolicy::default())
    }
}
