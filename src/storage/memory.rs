//! In-memory block store.

use crate::common::{Error, Result};
use crate::storage::{Page, StorageBackend};

/// A [`StorageBackend`] that keeps its blocks in memory.
///
/// Has the same error semantics as [`PageFile`](crate::storage::PageFile)
/// and is used where durability does not matter: tests, benchmarks and
/// scratch pools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blocks: Vec<Box<Page>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Create a store that already holds `blocks` zeroed blocks.
    pub fn with_blocks(blocks: u32) -> Self {
        let mut store = Self::new();
        store.grow_to(blocks);
        store
    }

    /// Borrow a block's bytes without going through a pool.
    pub fn block(&self, block: u32) -> Option<&[u8]> {
        self.blocks.get(block as usize).map(|p| p.as_slice())
    }

    fn grow_to(&mut self, blocks: u32) {
        let target = blocks as usize;
        while self.blocks.len() < target {
            self.blocks.push(Box::new(Page::new()));
        }
    }
}

impl StorageBackend for MemoryStore {
    fn block_count(&self) -> u32 {
        self.blocks.len() as u32
    }

    fn ensure_capacity(&mut self, blocks: u32) -> Result<()> {
        self.grow_to(blocks);
        Ok(())
    }

    fn read_block(&mut self, block: u32, page: &mut Page) -> Result<()> {
        let src = self
            .blocks
            .get(block as usize)
            .ok_or(Error::ReadNonExistingPage {
                block,
                block_count: self.block_count(),
            })?;
        page.copy_from(src);
        Ok(())
    }

    fn write_block(&mut self, block: u32, page: &Page) -> Result<()> {
        let block_count = self.block_count();
        let dst = self
            .blocks
            .get_mut(block as usize)
            .ok_or_else(|| Error::write_past_end(block, block_count))?;
        dst.copy_from(page);
        Ok(())
    }
}
