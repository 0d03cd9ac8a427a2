//! Frame - a slot in the buffer pool.
//!
//! A frame is split in two halves:
//! - [`Frame`] owns the page bytes behind a `RwLock`, so pinned pages can be
//!   read and written without holding the pool's bookkeeping lock.
//! - [`FrameState`] is the bookkeeping (which page, dirty, fix count) and
//!   lives inside the pool's mutex next to the page table and replacer.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::{FrameId, PageId};
use crate::storage::Page;

/// The page buffer of one frame.
///
/// Allocated once when the pool is built and recycled in place across
/// evictions; the buffer is never reallocated while the pool lives.
pub struct Frame {
    id: FrameId,
    page: RwLock<Page>,
}

impl Frame {
    /// Create a frame with a zeroed buffer.
    pub fn new(id: FrameId) -> Self {
        Self {
            id,
            page: RwLock::new(Page::new()),
        }
    }

    /// Position of this frame in the pool.
    #[inline]
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Acquire read lock on the page.
    #[inline]
    pub fn page(&self) -> RwLockReadGuard<'_, Page> {
        self.page.read()
    }

    /// Acquire write lock on the page.
    #[inline]
    pub fn page_mut(&self) -> RwLockWriteGuard<'_, Page> {
        self.page.write()
    }

    /// Acquire write lock on the page only if nobody holds a guard on it.
    #[inline]
    pub fn try_page_mut(&self) -> Option<RwLockWriteGuard<'_, Page>> {
        self.page.try_write()
    }
}

/// Bookkeeping for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    /// No page loaded.
    #[default]
    Empty,
    /// Holds `page_id`; its bytes are in the matching [`Frame`].
    Occupied {
        page_id: PageId,
        /// Bytes differ from the on-disk copy.
        dirty: bool,
        /// Outstanding pins. A frame with `fix_count > 0` is never evicted.
        fix_count: u32,
    },
}

impl FrameState {
    /// State of a frame that was just loaded and pinned once.
    pub fn loaded(page_id: PageId) -> Self {
        FrameState::Occupied {
            page_id,
            dirty: false,
            fix_count: 1,
        }
    }

    /// Page held by the frame, if any.
    #[inline]
    pub fn page_id(&self) -> Option<PageId> {
        match self {
            FrameState::Empty => None,
            FrameState::Occupied { page_id, .. } => Some(*page_id),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, FrameState::Empty)
    }

    /// Dirty flag; empty frames are clean.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        matches!(self, FrameState::Occupied { dirty: true, .. })
    }

    /// Fix count; empty frames report 0.
    #[inline]
    pub fn fix_count(&self) -> u32 {
        match self {
            FrameState::Empty => 0,
            FrameState::Occupied { fix_count, .. } => *fix_count,
        }
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.fix_count() > 0
    }

    /// Occupied and unpinned: a legal eviction victim.
    #[inline]
    pub fn is_evictable(&self) -> bool {
        matches!(self, FrameState::Occupied { fix_count: 0, .. })
    }

    /// Increment the fix count. Returns the new fix count, or `None` if the
    /// frame is empty.
    pub fn pin(&mut self) -> Option<u32> {
        match self {
            FrameState::Occupied { fix_count, .. } => {
                *fix_count += 1;
                Some(*fix_count)
            }
            FrameState::Empty => None,
        }
    }

    /// Decrement the fix count. Returns the new fix count, or `None` if the
    /// frame is empty or not pinned (the count never goes negative).
    pub fn unpin(&mut self) -> Option<u32> {
        match self {
            FrameState::Occupied { fix_count, .. } if *fix_count > 0 => {
                *fix_count -= 1;
                Some(*fix_count)
            }
            _ => None,
        }
    }

    /// Set the dirty flag. No effect on an empty frame.
    pub fn mark_dirty(&mut self) {
        if let FrameState::Occupied { dirty, .. } = self {
            *dirty = true;
        }
    }

    /// Clear the dirty flag after a write-back.
    pub fn clear_dirty(&mut self) {
        if let FrameState::Occupied { dirty, .. } = self {
            *dirty = false;
        }
    }
}
