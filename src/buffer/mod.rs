//! Buffer pool management.
//!
//! The buffer pool is the in-memory cache layer between consumers (record
//! and index managers) and a page file. It manages a fixed set of frames,
//! each holding at most one page.
//!
//! # Components
//! - [`BufferPool`] - The page cache
//! - [`Frame`] / [`FrameState`] - A slot in the pool and its bookkeeping
//! - [`PageHandle`], [`PageReadGuard`] / [`PageWriteGuard`] - Pinned page access
//! - [`BufferPoolStats`] - Performance statistics
//! - [`replacer`] - FIFO, LRU and CLOCK eviction policies

mod buffer_pool;
mod frame;
mod page_handle;
pub mod replacer;
mod stats;

pub use buffer_pool::BufferPool;
pub use frame::{Frame, FrameState};
pub use page_handle::{PageHandle, PageReadGuard, PageWriteGuard};
pub use replacer::{ReplacementPolicy, Replacer};
pub use stats::{BufferPoolStats, StatsSnapshot};
