//! pagecache - a fixed-capacity page buffer pool.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │        Consumers: record manager, index manager, tools          │
//! │            pin / unpin / mark_dirty / force / flush             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Buffer Pool (buffer/)                    │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │     Replacement policy: FIFO | LRU | CLOCK      │   │   │
//! │  │   │        (chosen when the pool is opened)          │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  │       BufferPool + Frame + PageHandle + Statistics       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Storage Layer (storage/)                  │   │
//! │  │       StorageBackend: PageFile | MemoryStore + Page      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`buffer`] - Buffer pool management and eviction policies
//! - [`storage`] - Block stores and the page format
//!
//! # Quick Start
//! ```
//! use pagecache::{BufferPool, BufferPoolConfig, MemoryStore, PageId, ReplacementPolicy};
//!
//! let config = BufferPoolConfig::new(3, ReplacementPolicy::Clock);
//! let pool = BufferPool::with_backend(config, MemoryStore::new()).unwrap();
//!
//! let handle = pool.pin(PageId::new(0)).unwrap();
//! pool.write(&handle).unwrap().as_mut_slice()[0] = 0xAB;
//! pool.mark_dirty(&handle).unwrap();
//! pool.unpin(&handle).unwrap();
//!
//! pool.shutdown().unwrap();
//! assert_eq!(pool.write_count(), 1);
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{BufferPoolConfig, Error, FrameId, PageId, Result};

pub use buffer::{
    BufferPool, BufferPoolStats, FrameState, PageHandle, PageReadGuard, PageWriteGuard,
    ReplacementPolicy, StatsSnapshot,
};
pub use storage::{MemoryStore, Page, PageFile, StorageBackend};
