//! Handles and guards for pinned pages.
//!
//! - [`PageHandle`] - what `pin` returns; names a page and the frame holding it
//! - [`PageReadGuard`] - shared access to a pinned page's bytes
//! - [`PageWriteGuard`] - exclusive access to a pinned page's bytes
//!
//! Guards only lock the page bytes. Pinning is explicit: dropping a guard
//! does not unpin, and writing through a guard does not mark the page dirty.
//! Drop guards before calling back into the pool for the same page.

use std::ops::{Deref, DerefMut};

use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

use crate::common::{FrameId, PageId};
use crate::storage::Page;

/// A pin on one page, returned by
/// [`BufferPool::pin`](crate::buffer::BufferPool::pin).
///
/// Stays meaningful until the matching `unpin`; after that the frame may be
/// reused for another page and the pool rejects the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHandle {
    page_id: PageId,
    frame_id: FrameId,
}

impl PageHandle {
    pub(crate) fn new(page_id: PageId, frame_id: FrameId) -> Self {
        Self { page_id, frame_id }
    }

    /// The pinned page.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// The frame holding the page.
    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }
}

/// Shared access to a pinned page.
///
/// # Example
/// ```ignore
/// let handle = pool.pin(PageId::new(3))?;
/// let first = pool.read(&handle)?.as_slice()[0];
/// pool.unpin(&handle)?;
/// ```
pub struct PageReadGuard<'a> {
    page_id: PageId,
    lock: RwLockReadGuard<'a, Page>,
}

impl<'a> PageReadGuard<'a> {
    pub(crate) fn new(page_id: PageId, lock: RwLockReadGuard<'a, Page>) -> Self {
        Self { page_id, lock }
    }

    /// Get the page ID.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }
}

impl Deref for PageReadGuard<'_> {
    type Target = Page;

    #[inline]
    fn deref(&self) -> &Page {
        &self.lock
    }
}

/// Exclusive access to a pinned page.
///
/// Call [`BufferPool::mark_dirty`](crate::buffer::BufferPool::mark_dirty)
/// after modifying the bytes, or the change may be dropped on eviction.
///
/// # Example
/// ```ignore
/// let handle = pool.pin(PageId::new(3))?;
/// pool.write(&handle)?.as_mut_slice()[0] = 0xFF;
/// pool.mark_dirty(&handle)?;
/// pool.unpin(&handle)?;
/// ```
pub struct PageWriteGuard<'a> {
    page_id: PageId,
    lock: RwLockWriteGuard<'a, Page>,
}

impl<'a> PageWriteGuard<'a> {
    pub(crate) fn new(page_id: PageId, lock: RwLockWriteGuard<'a, Page>) -> Self {
        Self { page_id, lock }
    }

    /// Get the page ID.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }
}

impl Deref for PageWriteGuard<'_> {
    type Target = Page;

    #[inline]
    fn deref(&self) -> &Page {
        &self.lock
    }
}

impl DerefMut for PageWriteGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Page {
        &mut self.lock
    }
}
