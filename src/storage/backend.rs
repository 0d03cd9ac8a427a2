//! The block-store contract consumed by the buffer pool.

use crate::common::Result;
use crate::storage::Page;

/// A fixed-block-size store that a buffer pool caches.
///
/// Blocks are addressed by a zero-based number and are exactly
/// [`PAGE_SIZE`](crate::PAGE_SIZE) bytes. Closing the store is `Drop`.
///
/// # Errors
/// - `read_block` returns `Error::ReadNonExistingPage` for a block at or past
///   `block_count()`.
/// - `write_block` and `ensure_capacity` return `Error::WriteFailed` when the
///   write (or growth) does not happen.
pub trait StorageBackend: Send {
    /// Number of blocks currently in the store.
    fn block_count(&self) -> u32;

    /// Grow the store with zeroed blocks until it holds at least `blocks`.
    fn ensure_capacity(&mut self, blocks: u32) -> Result<()>;

    /// Read block `block` into `page`.
    fn read_block(&mut self, block: u32, page: &mut Page) -> Result<()>;

    /// Write `page` to block `block`, which must already exist.
    fn write_block(&mut self, block: u32, page: &Page) -> Result<()>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn block_count(&self) -> u32 {
        (**self).block_count()
    }

    fn ensure_capacity(&mut self, blocks: u32) -> Result<()> {
        (**self).ensure_capacity(blocks)
    }

    fn read_block(&mut self, block: u32, page: &mut Page) -> Result<()> {
        (**self).read_block(block, page)
    }

    fn write_block(&mut self, block: u32, page: &Page) -> Result<()> {
        (**self).write_block(block, page)
    }
}
