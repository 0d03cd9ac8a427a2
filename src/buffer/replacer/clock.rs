//! CLOCK (second chance) replacement policy.

use super::{ReplacementPolicy, Replacer};
use crate::buffer::FrameState;
use crate::common::FrameId;

/// A circular hand over all frames plus one reference bit per frame.
///
/// Loads and hits set the frame's bit. On eviction the hand sweeps:
/// an unpinned frame with its bit set loses the bit and is passed over,
/// the first unpinned frame found with a clear bit is the victim and the
/// hand stops just past it. Pinned frames are skipped without touching
/// their bit.
#[derive(Debug)]
pub struct ClockReplacer {
    ref_bits: Vec<bool>,
    hand: usize,
}

impl ClockReplacer {
    /// Create a CLOCK replacer for a pool of `capacity` frames.
    pub fn new(capacity: usize) -> Self {
        Self {
            ref_bits: vec![false; capacity],
            hand: 0,
        }
    }

    /// Current position of the hand.
    pub fn hand(&self) -> FrameId {
        FrameId::new(self.hand)
    }

    /// Reference bit of `frame_id`.
    pub fn ref_bit(&self, frame_id: FrameId) -> bool {
        self.ref_bits.get(frame_id.index()).copied().unwrap_or(false)
    }

    fn advance(&mut self) {
        self.hand = (self.hand + 1) % self.ref_bits.len();
    }

    fn set_bit(&mut self, frame_id: FrameId, value: bool) {
        if let Some(bit) = self.ref_bits.get_mut(frame_id.index()) {
            *bit = value;
        }
    }
}

impl Replacer for ClockReplacer {
    fn on_load(&mut self, frame_id: FrameId) {
        self.set_bit(frame_id, true);
    }

    fn on_access(&mut self, frame_id: FrameId) {
        self.set_bit(frame_id, true);
    }

    fn select_victim(&mut self, frames: &[FrameState]) -> Option<FrameId> {
        let n = self.ref_bits.len().min(frames.len());
        if n == 0 {
            return None;
        }

        // First lap clears every unpinned bit, so a second lap is enough
        for _ in 0..2 * n {
            let idx = self.hand;
            if idx < n && frames[idx].is_evictable() {
                if self.ref_bits[idx] {
                    self.ref_bits[idx] = false;
                } else {
                    self.advance();
                    return Some(FrameId::new(idx));
                }
            }
            self.advance();
        }
        None
    }

    fn remove(&mut self, frame_id: FrameId) {
        self.set_bit(frame_id, false);
    }

    fn policy(&self) -> ReplacementPolicy {
        ReplacementPolicy::Clock
    }
}
