//! LRU (Least Recently Used) replacement policy.

use std::collections::VecDeque;

use super::{ReplacementPolicy, Replacer};
use crate::buffer::FrameState;
use crate::common::FrameId;

/// Evicts the unpinned page whose last pin is oldest.
///
/// Recency is an index queue over frame ids: front = least recently used,
/// back = most recently used. Both loads and hits move a frame to the back.
#[derive(Debug, Default)]
pub struct LruReplacer {
    recency: VecDeque<FrameId>,
}

impl LruReplacer {
    /// Create a new LRU replacer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an LRU replacer sized for a pool of `capacity` frames.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            recency: VecDeque::with_capacity(capacity),
        }
    }

    /// Frame ids from least to most recently used.
    pub fn order(&self) -> impl Iterator<Item = FrameId> + '_ {
        self.recency.iter().copied()
    }

    fn forget(&mut self, frame_id: FrameId) {
        if let Some(pos) = self.recency.iter().position(|&f| f == frame_id) {
            self.recency.remove(pos);
        }
    }

    fn touch(&mut self, frame_id: FrameId) {
        self.forget(frame_id);
        self.recency.push_back(frame_id);
    }
}

impl Replacer for LruReplacer {
    fn on_load(&mut self, frame_id: FrameId) {
        self.touch(frame_id);
    }

    fn on_access(&mut self, frame_id: FrameId) {
        self.touch(frame_id);
    }

    fn select_victim(&mut self, frames: &[FrameState]) -> Option<FrameId> {
        self.recency
            .iter()
            .copied()
            .find(|f| frames[f.index()].is_evictable())
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.forget(frame_id);
    }

    fn policy(&self) -> ReplacementPolicy {
        ReplacementPolicy::Lru
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::frames;
    use super::*;

    fn loaded(ids: &[usize]) -> LruReplacer {
        let mut replacer = LruReplacer::new();
        for &id in ids {
            replacer.on_load(FrameId::new(id));
        }
        replacer
    }

    #[test]
    fn test_lru_evicts_least_recent() {
        let mut replacer = loaded(&[0, 1, 2]);
        let states = frames(&[false, false, false]);

        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(0)));
    }

    #[test]
    fn test_lru_access_refreshes() {
        let mut replacer = loaded(&[0, 1, 2]);
        replacer.on_access(FrameId::new(0));

        let order: Vec<_> = replacer.order().map(|f| f.index()).collect();
        assert_eq!(order, vec![1, 2, 0]);

        let states = frames(&[false, false, false]);
        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(1)));
    }

    #[test]
    fn test_lru_skips_pinned() {
        let mut replacer = loaded(&[0, 1, 2]);

        let states = frames(&[true, true, false]);
        assert_eq!(replacer.select_victim(&states), Some(FrameId::new(2)));

        let states = frames(&[true, true, true]);
        assert_eq!(replacer.select_victim(&states), None);
    }

    #[test]
    fn test_lru_remove() {
        let mut replacer = loaded(&[0, 1]);
        replacer.remove(FrameId::new(0));

        let order: Vec<_> = replacer.order().collect();
        assert_eq!(order, vec![FrameId::new(1)]);
    }
}
