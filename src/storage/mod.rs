//! Storage layer - block stores and the page format.
//!
//! This module handles persistent storage:
//! - [`StorageBackend`] - The block-store contract the buffer pool consumes
//! - [`PageFile`] - File-backed block store
//! - [`MemoryStore`] - In-memory block store
//! - [`Page`] - The raw `PAGE_SIZE` data container

mod backend;
mod memory;
mod page;
mod page_file;

pub use backend::StorageBackend;
pub use memory::MemoryStore;
pub use page::Page;
pub use page_file::PageFile;
