//! Buffer Pool - the core page caching layer.
//!
//! The [`BufferPool`] provides:
//! - Page caching between a block store and memory
//! - Pin-based reference counting
//! - Write-back of dirty pages on eviction, on demand and at shutdown
//! - FIFO, LRU or CLOCK eviction, fixed when the pool is opened

use std::collections::HashMap;
use std::path::Path;

use parking_lot::{Mutex, RwLockWriteGuard};
use tracing::{debug, info, trace, warn};

use crate::buffer::replacer::{ReplacementPolicy, Replacer};
use crate::buffer::{
    BufferPoolStats, Frame, FrameState, PageHandle, PageReadGuard, PageWriteGuard,
};
use crate::common::config::MAX_PAGES;
use crate::common::{BufferPoolConfig, Error, FrameId, PageId, Result};
use crate::storage::{Page, PageFile, StorageBackend};

/// A fixed-capacity cache of pages from one block store.
///
/// # Architecture
/// ```text
/// ┌─────────────────────────────────────────────────────────────┐
/// │                        BufferPool                           │
/// │  ┌──────────────────── Mutex<PoolInner> ─────────────────┐  │
/// │  │ page_table  PageId → FrameId    states  [FrameState]  │  │
/// │  │ free_list   Vec<FrameId>        replacer  FIFO|LRU|CLOCK │
/// │  │ backend     Option<B>  (None once shut down)          │  │
/// │  └───────────────────────────────────────────────────────┘  │
/// │  frames: [Frame0] [Frame1] [Frame2] ...  (RwLock<Page> each)│
/// │  stats:  atomic counters                                    │
/// └─────────────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// All bookkeeping sits behind one mutex held for the whole of `pin`,
/// `unpin` and `mark_dirty`, so no caller ever sees a half-finished pin.
/// Page bytes are behind a per-frame `RwLock` and are reached through
/// guards from [`read`](Self::read) / [`write`](Self::write).
///
/// Lock order is frame lock, then pool mutex. `read`, `write` and the
/// flush paths block on a frame lock only while not holding the mutex;
/// eviction holds the mutex and so only ever try-locks a frame, passing
/// over frames a guard still holds. A thread may keep pinning and
/// unpinning while it holds guards, but must drop its own guard on a page
/// before it flushes that page.
///
/// # Usage
/// ```ignore
/// let config = BufferPoolConfig::new(3, ReplacementPolicy::Lru);
/// let pool = BufferPool::open(config, "table.db")?;
///
/// let handle = pool.pin(PageId::new(0))?;
/// pool.write(&handle)?.as_mut_slice()[0] = 0xAB;
/// pool.mark_dirty(&handle)?;
/// pool.unpin(&handle)?;
///
/// pool.shutdown()?;
/// ```
pub struct BufferPool<B: StorageBackend = PageFile> {
    config: BufferPoolConfig,

    /// Fixed pool of page buffers allocated at startup.
    frames: Vec<Frame>,

    inner: Mutex<PoolInner<B>>,

    stats: BufferPoolStats,
}

struct PoolInner<B> {
    /// Bookkeeping per frame, indexed by `FrameId`.
    states: Vec<FrameState>,

    /// Maps resident page IDs to frame IDs.
    page_table: HashMap<PageId, FrameId>,

    /// Empty frames; popped from the back, lowest frame id first.
    free_list: Vec<FrameId>,

    replacer: Box<dyn Replacer>,

    /// `None` once the pool is shut down.
    backend: Option<B>,
}

impl BufferPool<PageFile> {
    /// Open a pool over an existing page file.
    ///
    /// # Errors
    /// - `Error::FileNotFound` if the page file doesn't exist
    /// - `Error::InvalidCapacity` if `config.capacity` is 0
    pub fn open<P: AsRef<Path>>(config: BufferPoolConfig, path: P) -> Result<Self> {
        let page_file = PageFile::open(path)?;
        Self::with_backend(config, page_file)
    }
}

impl<B: StorageBackend> BufferPool<B> {
    /// Create a pool over any block store.
    ///
    /// # Errors
    /// - `Error::InvalidCapacity` if `config.capacity` is 0
    pub fn with_backend(config: BufferPoolConfig, backend: B) -> Result<Self> {
        config.validate()?;
        let capacity = config.capacity;

        let frames: Vec<Frame> = (0..capacity).map(|i| Frame::new(FrameId::new(i))).collect();
        let free_list: Vec<FrameId> = (0..capacity).rev().map(FrameId::new).collect();

        info!(
            pool = %config.pool_id,
            capacity,
            policy = %config.policy,
            blocks = backend.block_count(),
            "opened buffer pool"
        );

        Ok(Self {
            inner: Mutex::new(PoolInner {
                states: vec![FrameState::Empty; capacity],
                page_table: HashMap::with_capacity(capacity),
                free_list,
                replacer: config.policy.build(capacity),
                backend: Some(backend),
            }),
            frames,
            stats: BufferPoolStats::new(),
            config,
        })
    }

    // ========================================================================
    // Public API: Pin and unpin
    // ========================================================================

    /// Pin a page, loading it from the backend on a miss.
    ///
    /// On a hit the fix count goes up and the policy sees an access. On a
    /// miss an empty frame is claimed if there is one; otherwise the policy
    /// picks an unpinned victim, which is written back first if dirty. The
    /// backend is grown to hold the page, then the block is read in.
    ///
    /// A frame that some thread still holds a page guard on is never
    /// claimed; the search moves on to the next candidate.
    ///
    /// # Errors
    /// - `Error::PageOutOfRange` if no store can hold `page_id`
    /// - `Error::AllFramesPinned` if the pool is full and every frame is pinned
    /// - `Error::WriteFailed` if the victim's write-back (or growing the file)
    ///   fails; the victim keeps its page
    /// - `Error::ReadNonExistingPage` / `Error::Io` if the read fails; the
    ///   claimed frame is left empty
    /// - `Error::PoolClosed` after shutdown
    pub fn pin(&self, page_id: PageId) -> Result<PageHandle> {
        let mut guard = self.inner.lock();
        let PoolInner {
            states,
            page_table,
            free_list,
            replacer,
            backend,
        } = &mut *guard;
        let backend = backend.as_mut().ok_or(Error::PoolClosed)?;

        if let Some(&frame_id) = page_table.get(&page_id) {
            let fix_count = states[frame_id.index()]
                .pin()
                .ok_or_else(|| self.misuse("pin", page_id))?;
            replacer.on_access(frame_id);
            self.stats.record_hit();
            trace!(pool = %self.config.pool_id, %page_id, %frame_id, fix_count, "hit");
            return Ok(PageHandle::new(page_id, frame_id));
        }

        let blocks = page_id.block_count().ok_or(Error::PageOutOfRange {
            page_id,
            max_pages: MAX_PAGES,
        })?;

        self.stats.record_miss();

        let (frame_id, mut page, victim) = match self.claim_free(free_list) {
            Some((frame_id, page)) => (frame_id, page, None),
            None => {
                let (frame_id, page) =
                    self.claim_victim(page_id, states.as_slice(), &mut **replacer)?;
                let state = &mut states[frame_id.index()];
                // Write back before the frame is touched; on failure it keeps its page
                self.write_back(backend, state, frame_id, &page)?;
                (frame_id, page, state.page_id())
            }
        };

        if let Err(e) = backend.ensure_capacity(blocks) {
            if victim.is_none() {
                free_list.push(frame_id);
            }
            return Err(e);
        }

        if let Some(old) = victim {
            page_table.remove(&old);
            states[frame_id.index()] = FrameState::Empty;
            self.stats.record_eviction();
            debug!(pool = %self.config.pool_id, evicted = %old, %frame_id, "evicted");
        }

        if let Err(e) = backend.read_block(page_id.0, &mut page) {
            // Frame bytes are now garbage: leave it empty rather than stale
            states[frame_id.index()] = FrameState::Empty;
            replacer.remove(frame_id);
            free_list.push(frame_id);
            return Err(e);
        }
        self.stats.record_read();

        states[frame_id.index()] = FrameState::loaded(page_id);
        page_table.insert(page_id, frame_id);
        replacer.on_load(frame_id);

        debug!(pool = %self.config.pool_id, %page_id, %frame_id, "loaded");
        Ok(PageHandle::new(page_id, frame_id))
    }

    /// Release one pin on the handle's page.
    ///
    /// # Errors
    /// - `Error::InvalidPin` if the page is not resident or not pinned
    /// - `Error::PoolClosed` after shutdown
    pub fn unpin(&self, handle: &PageHandle) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.ensure_open()?;

        let page_id = handle.page_id();
        let fix_count = inner
            .resident_state(page_id)
            .and_then(|state| state.unpin())
            .ok_or_else(|| self.misuse("unpin", page_id))?;

        trace!(pool = %self.config.pool_id, %page_id, fix_count, "unpinned");
        Ok(())
    }

    /// Mark the handle's page as modified. No I/O happens.
    ///
    /// # Errors
    /// - `Error::InvalidPin` if the page is not resident or not pinned
    /// - `Error::PoolClosed` after shutdown
    pub fn mark_dirty(&self, handle: &PageHandle) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.ensure_open()?;

        let page_id = handle.page_id();
        match inner.resident_state(page_id) {
            Some(state) if state.is_pinned() => {
                state.mark_dirty();
                Ok(())
            }
            _ => Err(self.misuse("mark_dirty", page_id)),
        }
    }

    // ========================================================================
    // Public API: Page access
    // ========================================================================

    /// Shared access to a pinned page's bytes.
    ///
    /// # Errors
    /// - `Error::InvalidPin` if the handle no longer names a pinned page
    /// - `Error::PoolClosed` after shutdown
    pub fn read(&self, handle: &PageHandle) -> Result<PageReadGuard<'_>> {
        let page = self.handle_frame(handle)?.page();
        self.check_pinned(handle)?;
        Ok(PageReadGuard::new(handle.page_id(), page))
    }

    /// Exclusive access to a pinned page's bytes.
    ///
    /// # Errors
    /// - `Error::InvalidPin` if the handle no longer names a pinned page
    /// - `Error::PoolClosed` after shutdown
    pub fn write(&self, handle: &PageHandle) -> Result<PageWriteGuard<'_>> {
        let page = self.handle_frame(handle)?.page_mut();
        self.check_pinned(handle)?;
        Ok(PageWriteGuard::new(handle.page_id(), page))
    }

    // ========================================================================
    // Public API: Flush and shutdown
    // ========================================================================

    /// Write the handle's page back now if it is dirty.
    ///
    /// Works on pinned and unpinned pages; a page that has already left the
    /// pool was written back on eviction, so that case is a no-op. If
    /// another thread holds a write guard on the page, this waits for it.
    ///
    /// # Errors
    /// - `Error::WriteFailed` if the write fails; the page stays dirty
    /// - `Error::PoolClosed` after shutdown
    pub fn force_page(&self, handle: &PageHandle) -> Result<()> {
        let page_id = handle.page_id();
        let frame_id = {
            let inner = self.inner.lock();
            inner.ensure_open()?;
            match inner.page_table.get(&page_id) {
                Some(&frame_id) => frame_id,
                None => return Ok(()),
            }
        };

        self.flush_page(frame_id, page_id, true)?;
        Ok(())
    }

    /// Write back every dirty, unpinned page. Returns the number written.
    ///
    /// Pinned pages are skipped: their owner may be mid-update. Use
    /// [`shutdown`](Self::shutdown) to flush everything.
    ///
    /// # Errors
    /// - `Error::WriteFailed` on the first failed write; earlier pages stay clean
    /// - `Error::PoolClosed` after shutdown
    pub fn force_flush_all(&self) -> Result<usize> {
        let targets = {
            let inner = self.inner.lock();
            inner.ensure_open()?;
            inner.dirty_frames(false)
        };

        let mut written = 0;
        for (frame_id, page_id) in targets {
            if self.flush_page(frame_id, page_id, false)? {
                written += 1;
            }
        }

        debug!(pool = %self.config.pool_id, written, "flushed unpinned dirty pages");
        Ok(written)
    }

    /// Write back every dirty page regardless of fix count, then close the
    /// backend. Every later call fails with `Error::PoolClosed`.
    ///
    /// Pages held under a write guard by another thread are waited for.
    ///
    /// # Errors
    /// - `Error::WriteFailed` if a write fails; the pool stays open so the
    ///   caller can retry
    /// - `Error::PoolClosed` if already shut down
    pub fn shutdown(&self) -> Result<()> {
        let mut written = 0;
        // Close only once a pass under the mutex finds nothing left to write
        let mut guard = loop {
            let guard = self.inner.lock();
            guard.ensure_open()?;
            let targets = guard.dirty_frames(true);
            if targets.is_empty() {
                break guard;
            }
            drop(guard);

            for (frame_id, page_id) in targets {
                if self.flush_page(frame_id, page_id, true)? {
                    written += 1;
                }
            }
        };

        let inner = &mut *guard;
        let pinned = inner.states.iter().filter(|s| s.is_pinned()).count();
        if pinned > 0 {
            warn!(pool = %self.config.pool_id, pinned, "shutting down with pinned pages");
        }

        inner.page_table.clear();
        inner.free_list.clear();
        for (i, state) in inner.states.iter_mut().enumerate() {
            if !state.is_empty() {
                inner.replacer.remove(FrameId::new(i));
            }
            *state = FrameState::Empty;
        }
        // Dropping the backend closes the page file
        inner.backend = None;

        info!(
            pool = %self.config.pool_id,
            written,
            stats = %self.stats.snapshot(),
            "buffer pool shut down"
        );
        Ok(())
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    /// Page held by each frame, in frame order; `None` for an empty frame.
    pub fn frame_contents(&self) -> Result<Vec<Option<PageId>>> {
        self.per_frame(FrameState::page_id)
    }

    /// Dirty flag of each frame, in frame order; empty frames are clean.
    pub fn dirty_flags(&self) -> Result<Vec<bool>> {
        self.per_frame(|s| s.is_dirty())
    }

    /// Fix count of each frame, in frame order; empty frames report 0.
    pub fn fix_counts(&self) -> Result<Vec<u32>> {
        self.per_frame(FrameState::fix_count)
    }

    /// Total blocks read from the backend.
    pub fn read_count(&self) -> u64 {
        self.stats.pages_read()
    }

    /// Total blocks written to the backend.
    pub fn write_count(&self) -> u64 {
        self.stats.pages_written()
    }

    /// Fix count of a resident page, or `None` if it is not in the pool.
    pub fn pin_count(&self, page_id: PageId) -> Option<u32> {
        let inner = self.inner.lock();
        inner
            .page_table
            .get(&page_id)
            .map(|f| inner.states[f.index()].fix_count())
    }

    /// Number of frames holding a page.
    pub fn occupied_count(&self) -> usize {
        self.inner.lock().states.iter().filter(|s| !s.is_empty()).count()
    }

    /// Get buffer pool statistics.
    pub fn stats(&self) -> &BufferPoolStats {
        &self.stats
    }

    /// Number of frames in the pool.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Replacement policy the pool was opened with.
    pub fn policy(&self) -> ReplacementPolicy {
        self.config.policy
    }

    /// Name of the pool as given in its config.
    pub fn pool_id(&self) -> &str {
        &self.config.pool_id
    }

    /// Whether `shutdown` has completed.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().backend.is_none()
    }

    // ========================================================================
    // Internal
    // ========================================================================

    /// Take the lowest empty frame that no guard is holding.
    fn claim_free(
        &self,
        free_list: &mut Vec<FrameId>,
    ) -> Option<(FrameId, RwLockWriteGuard<'_, Page>)> {
        (0..free_list.len()).rev().find_map(|i| {
            let page = self.frames[free_list[i].index()].try_page_mut()?;
            Some((free_list.remove(i), page))
        })
    }

    /// Ask the policy for a victim, passing over frames a guard still holds.
    fn claim_victim(
        &self,
        page_id: PageId,
        states: &[FrameState],
        replacer: &mut dyn Replacer,
    ) -> Result<(FrameId, RwLockWriteGuard<'_, Page>)> {
        // Copy of `states` with latched frames shown as pinned
        let mut latched: Option<Vec<FrameState>> = None;

        loop {
            let view = latched.as_deref().unwrap_or(states);
            let Some(frame_id) = replacer.select_victim(view) else {
                debug!(pool = %self.config.pool_id, %page_id, "no evictable frame");
                return Err(Error::AllFramesPinned {
                    capacity: self.config.capacity,
                });
            };

            if let Some(page) = self.frames[frame_id.index()].try_page_mut() {
                return Ok((frame_id, page));
            }

            trace!(pool = %self.config.pool_id, %frame_id, "victim is latched, skipping");
            let view = latched.get_or_insert_with(|| states.to_vec());
            let _ = view[frame_id.index()].pin();
        }
    }

    /// Write one frame back if dirty, clearing its dirty flag on success.
    ///
    /// The caller holds both the pool mutex and a lock on the frame's page.
    fn write_back(
        &self,
        backend: &mut B,
        state: &mut FrameState,
        frame_id: FrameId,
        page: &Page,
    ) -> Result<bool> {
        let FrameState::Occupied {
            page_id,
            dirty: true,
            ..
        } = *state
        else {
            return Ok(false);
        };

        backend.write_block(page_id.0, page)?;
        state.clear_dirty();
        self.stats.record_write();

        debug!(pool = %self.config.pool_id, %page_id, %frame_id, "wrote back");
        Ok(true)
    }

    /// Write back `page_id` if `frame_id` still holds it dirty.
    ///
    /// Takes the frame lock before the pool mutex. A thread that holds a
    /// guard on the page can keep pinning and unpinning while this waits.
    fn flush_page(
        &self,
        frame_id: FrameId,
        page_id: PageId,
        include_pinned: bool,
    ) -> Result<bool> {
        let page = self.frames[frame_id.index()].page();

        let mut guard = self.inner.lock();
        let PoolInner {
            states, backend, ..
        } = &mut *guard;
        let backend = backend.as_mut().ok_or(Error::PoolClosed)?;

        let state = &mut states[frame_id.index()];
        if state.page_id() != Some(page_id) || (state.is_pinned() && !include_pinned) {
            return Ok(false);
        }
        self.write_back(backend, state, frame_id, &page)
    }

    fn handle_frame(&self, handle: &PageHandle) -> Result<&Frame> {
        self.frames
            .get(handle.frame_id().index())
            .ok_or_else(|| self.misuse("page access", handle.page_id()))
    }

    /// Check that a handle still names a pinned page.
    fn check_pinned(&self, handle: &PageHandle) -> Result<()> {
        let inner = self.inner.lock();
        inner.ensure_open()?;

        match inner.states.get(handle.frame_id().index()) {
            Some(s) if s.page_id() == Some(handle.page_id()) && s.is_pinned() => Ok(()),
            _ => Err(self.misuse("page access", handle.page_id())),
        }
    }

    fn per_frame<T>(&self, f: impl Fn(&FrameState) -> T) -> Result<Vec<T>> {
        let inner = self.inner.lock();
        inner.ensure_open()?;
        Ok(inner.states.iter().map(f).collect())
    }

    fn misuse(&self, op: &str, page_id: PageId) -> Error {
        warn!(pool = %self.config.pool_id, %page_id, op, "page is not pinned");
        Error::InvalidPin(page_id)
    }
}

impl<B> PoolInner<B> {
    fn ensure_open(&self) -> Result<()> {
        match self.backend {
            Some(_) => Ok(()),
            None => Err(Error::PoolClosed),
        }
    }

    fn resident_state(&mut self, page_id: PageId) -> Option<&mut FrameState> {
        let frame_id = *self.page_table.get(&page_id)?;
        self.states.get_mut(frame_id.index())
    }

    /// Dirty frames in frame order, optionally including pinned ones.
    fn dirty_frames(&self, include_pinned: bool) -> Vec<(FrameId, PageId)> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_dirty() && (include_pinned || !s.is_pinned()))
            .filter_map(|(i, s)| s.page_id().map(|p| (FrameId::new(i), p)))
            .collect()
    }
}

impl<B: StorageBackend> Drop for BufferPool<B> {
    fn drop(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Err(e) = self.shutdown() {
            warn!(pool = %self.config.pool_id, error = %e, "shutdown on drop failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use tempfile::tempdir;

    fn create_pool(capacity: usize, policy: ReplacementPolicy) -> BufferPool<MemoryStore> {
        let config = BufferPoolConfig::new(capacity, policy);
        BufferPool::with_backend(config, MemoryStore::new()).unwrap()
    }

    fn pin_unpin(pool: &BufferPool<MemoryStore>, page: u32) {
        let handle = pool.pin(PageId::new(page)).unwrap();
        pool.unpin(&handle).unwrap();
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = BufferPoolConfig::new(0, ReplacementPolicy::Fifo);
        let result = BufferPool::with_backend(config, MemoryStore::new());
        assert!(matches!(result, Err(Error::InvalidCapacity(0))));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.db");

        let result = BufferPool::open(BufferPoolConfig::default(), &path);
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_pin_fills_frames_in_order() {
        let pool = create_pool(3, ReplacementPolicy::Lru);

        for page in [7, 3, 5] {
            pool.pin(PageId::new(page)).unwrap();
        }

        assert_eq!(
            pool.frame_contents().unwrap(),
            vec![Some(PageId::new(7)), Some(PageId::new(3)), Some(PageId::new(5))]
        );
        assert_eq!(pool.fix_counts().unwrap(), vec![1, 1, 1]);
        assert_eq!(pool.occupied_count(), 3);
        assert_eq!(pool.read_count(), 3);
    }

    #[test]
    fn test_hit_does_no_io() {
        let pool = create_pool(2, ReplacementPolicy::Clock);

        let h1 = pool.pin(PageId::new(1)).unwrap();
        let h2 = pool.pin(PageId::new(1)).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(pool.pin_count(PageId::new(1)), Some(2));
        assert_eq!(pool.read_count(), 1);

        let snapshot = pool.stats().snapshot();
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 1);
    }

    #[test]
    fn test_unpin_below_zero_is_invalid() {
        let pool = create_pool(2, ReplacementPolicy::Fifo);
        let handle = pool.pin(PageId::new(0)).unwrap();

        pool.unpin(&handle).unwrap();
        assert!(matches!(pool.unpin(&handle), Err(Error::InvalidPin(_))));
        assert_eq!(pool.fix_counts().unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_mark_dirty_requires_pin() {
        let pool = create_pool(2, ReplacementPolicy::Fifo);
        let handle = pool.pin(PageId::new(0)).unwrap();

        pool.mark_dirty(&handle).unwrap();
        assert_eq!(pool.dirty_flags().unwrap(), vec![true, false]);

        pool.unpin(&handle).unwrap();
        assert!(matches!(pool.mark_dirty(&handle), Err(Error::InvalidPin(_))));
    }

    #[test]
    fn test_dirty_victim_written_back() {
        let pool = create_pool(1, ReplacementPolicy::Fifo);

        let handle = pool.pin(PageId::new(0)).unwrap();
        pool.write(&handle).unwrap().as_mut_slice()[0] = 0x42;
        pool.mark_dirty(&handle).unwrap();
        pool.unpin(&handle).unwrap();

        pin_unpin(&pool, 1);
        assert_eq!(pool.write_count(), 1);
        assert_eq!(pool.stats().snapshot().evictions, 1);

        let handle = pool.pin(PageId::new(0)).unwrap();
        assert_eq!(pool.read(&handle).unwrap().as_slice()[0], 0x42);
        assert_eq!(pool.dirty_flags().unwrap(), vec![false]);
    }

    #[test]
    fn test_clean_victim_not_written() {
        let pool = create_pool(1, ReplacementPolicy::Lru);

        pin_unpin(&pool, 0);
        pin_unpin(&pool, 1);

        assert_eq!(pool.write_count(), 0);
        assert_eq!(pool.read_count(), 2);
    }

    #[test]
    fn test_all_frames_pinned() {
        let pool = create_pool(2, ReplacementPolicy::Clock);
        pool.pin(PageId::new(1)).unwrap();
        pool.pin(PageId::new(2)).unwrap();

        let result = pool.pin(PageId::new(3));
        assert!(matches!(
            result,
            Err(Error::AllFramesPinned { capacity: 2 })
        ));
        assert_eq!(
            pool.frame_contents().unwrap(),
            vec![Some(PageId::new(1)), Some(PageId::new(2))]
        );
    }

    #[test]
    fn test_pin_past_max_pages_rejected() {
        let pool = create_pool(2, ReplacementPolicy::Lru);

        let result = pool.pin(PageId::new(MAX_PAGES));
        assert!(matches!(
            result,
            Err(Error::PageOutOfRange { page_id, .. }) if page_id == PageId::new(u32::MAX)
        ));
        assert_eq!(pool.frame_contents().unwrap(), vec![None, None]);
        assert_eq!(pool.stats().snapshot(), Default::default());

        // The pool is still usable
        pin_unpin(&pool, 0);
        assert_eq!(pool.read_count(), 1);
    }

    #[test]
    fn test_eviction_skips_latched_frame() {
        let pool = create_pool(2, ReplacementPolicy::Fifo);
        pin_unpin(&pool, 1);
        pin_unpin(&pool, 2);

        // Guard on page 1 outlives its pin
        let handle = pool.pin(PageId::new(1)).unwrap();
        let latched = pool.read(&handle).unwrap();
        pool.unpin(&handle).unwrap();

        pin_unpin(&pool, 3);
        assert_eq!(
            pool.frame_contents().unwrap(),
            vec![Some(PageId::new(1)), Some(PageId::new(3))]
        );
        drop(latched);

        pin_unpin(&pool, 4);
        assert_eq!(
            pool.frame_contents().unwrap(),
            vec![Some(PageId::new(4)), Some(PageId::new(3))]
        );
    }

    #[test]
    fn test_only_latched_frame_is_not_claimed() {
        let pool = create_pool(1, ReplacementPolicy::Clock);
        let handle = pool.pin(PageId::new(0)).unwrap();
        let latched = pool.write(&handle).unwrap();
        pool.unpin(&handle).unwrap();

        assert!(matches!(
            pool.pin(PageId::new(1)),
            Err(Error::AllFramesPinned { capacity: 1 })
        ));
        assert_eq!(pool.frame_contents().unwrap(), vec![Some(PageId::new(0))]);
        drop(latched);

        pin_unpin(&pool, 1);
        assert_eq!(pool.frame_contents().unwrap(), vec![Some(PageId::new(1))]);
    }

    #[test]
    fn test_pin_while_holding_guard() {
        let pool = create_pool(2, ReplacementPolicy::Lru);
        let handle = pool.pin(PageId::new(0)).unwrap();
        pool.mark_dirty(&handle).unwrap();

        let mut page = pool.write(&handle).unwrap();
        page.as_mut_slice()[0] = 9;
        pin_unpin(&pool, 1);
        pin_unpin(&pool, 2);
        assert_eq!(pool.force_flush_all().unwrap(), 0);
        drop(page);

        pool.force_page(&handle).unwrap();
        assert_eq!(pool.write_count(), 1);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let pool = create_pool(1, ReplacementPolicy::Fifo);
        let stale = pool.pin(PageId::new(0)).unwrap();
        pool.unpin(&stale).unwrap();

        let fresh = pool.pin(PageId::new(1)).unwrap();
        assert_eq!(stale.frame_id(), fresh.frame_id());
        assert!(matches!(pool.read(&stale), Err(Error::InvalidPin(_))));
        assert!(pool.write(&fresh).is_ok());
    }

    #[test]
    fn test_force_page_only_when_dirty() {
        let pool = create_pool(2, ReplacementPolicy::Lru);
        let handle = pool.pin(PageId::new(0)).unwrap();

        pool.force_page(&handle).unwrap();
        assert_eq!(pool.write_count(), 0);

        pool.mark_dirty(&handle).unwrap();
        pool.force_page(&handle).unwrap();
        assert_eq!(pool.write_count(), 1);
        assert_eq!(pool.dirty_flags().unwrap(), vec![false, false]);
    }

    #[test]
    fn test_force_flush_all_skips_pinned() {
        let pool = create_pool(3, ReplacementPolicy::Lru);

        let pinned = pool.pin(PageId::new(0)).unwrap();
        pool.mark_dirty(&pinned).unwrap();

        let released = pool.pin(PageId::new(1)).unwrap();
        pool.mark_dirty(&released).unwrap();
        pool.unpin(&released).unwrap();

        assert_eq!(pool.force_flush_all().unwrap(), 1);
        assert_eq!(pool.dirty_flags().unwrap(), vec![true, false, false]);
    }

    #[test]
    fn test_shutdown_flushes_pinned_and_closes() {
        let pool = create_pool(2, ReplacementPolicy::Clock);
        let handle = pool.pin(PageId::new(0)).unwrap();
        pool.mark_dirty(&handle).unwrap();

        pool.shutdown().unwrap();
        assert_eq!(pool.write_count(), 1);
        assert!(pool.is_closed());

        assert!(matches!(pool.pin(PageId::new(0)), Err(Error::PoolClosed)));
        assert!(matches!(pool.unpin(&handle), Err(Error::PoolClosed)));
        assert!(matches!(pool.frame_contents(), Err(Error::PoolClosed)));
        assert!(matches!(pool.force_flush_all(), Err(Error::PoolClosed)));
        assert!(matches!(pool.shutdown(), Err(Error::PoolClosed)));
        assert_eq!(pool.write_count(), 1);
    }
}
