//! FIFO (First-In-First-Out) replacement policy.

use std::collections::VecDeque;

use super::{ReplacementPolicy, Replacer};
use crate::buffer::FrameState;
use crate::common::FrameId;

/// Evicts pages in the order they were loaded into the pool.
///
/// Pinned frames are skipped but keep their place in the queue. A hit does
/// not move a page: FIFO order is load order, not access order.
#[derive(Debug, Default)]
pub struct FifoReplacer {
    /// Frame IDs in load order (front = oldest).
    queue: VecDeque<FrameId>,
}

impl FifoReplacer {
    /// Create a new FIFO replacer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a FIFO replacer sized for a pool of `capacity` frames.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
        }
    }

    /// Number of tracked frames.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn forget(&mut self, frame_id: FrameId) {
        if let Some(pos) = self.queue.iter().position(|&f| f == frame_id) {
            self.queue.remove(pos);
        }
    }
}

impl Replacer for FifoReplacer {
    fn on_load(&mut self, frame_id: FrameId) {
        // A reused victim goes to the back as the newest load
        self.forget(frame_id);
        self.queue.push_back(frame_id);
    }

    fn on_access(&mut self, _frame_id: FrameId) {}

    fn select_victim(&mut self, frames: &[FrameState]) -> Option<FrameId> {
        self.queue
            .iter()
            .copied()
            .find(|f| frames[f.index()].is_evictable())
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.forget(frame_id);
    }

    fn policy(&self) -> ReplacementPolicy {
        ReplacementPolicy::Fifo
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::frames;
    use super::*;

    fn loaded(ids: &[usize]) -> FifoReplacer {
        let mut replacer = FifoReplacer::new();
        for &id in ids {
            replacer.on_load(FrameId::new(id));
        }
        replacer
    }

    #[test]
    fn test_fifo_basic() {
        let mut replacer = loaded(&[0, 1, 2]);
        let states = frames(&[false, false, false]);

        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(0)));

        // Victim reused for a new page: now the newest
        replacer.on_load(FrameId::new(0));
        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(1)));
        replacer.on_load(FrameId::new(1));
        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(2)));
    }

    #[test]
    fn test_fifo_skips_pinned() {
        let mut replacer = loaded(&[0, 1, 2]);

        let states = frames(&[true, false, true]);
        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(1)));

        let states = frames(&[true, true, true]);
        assert_eq!(replacer.select_victim(&states), None);
    }

    #[test]
    fn test_fifo_select_does_not_forget_victim() {
        let mut replacer = loaded(&[0, 1]);
        let states = frames(&[false, false]);

        // Eviction aborted: same answer next time
        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(0)));
        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(0)));
        assert_eq!(replacer.len(), 2);
    }

    #[test]
    fn test_fifo_remove() {
        let mut replacer = loaded(&[0, 1]);
        replacer.remove(FrameId::new(0));

        let states = frames(&[false, false]);
        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(1)));
        assert_eq!(replacer.len(), 1);
    }

    #[test]
    fn test_fifo_reaccess_no_reorder() {
        let mut replacer = loaded(&[0, 1]);
        replacer.on_access(FrameId::new(0));

        let states = frames(&[false, false]);
        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(0)));
    }
}
