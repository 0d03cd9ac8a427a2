//! Eviction policy implementations (replacers).
//!
//! Implements:
//! - [`FifoReplacer`] - evicts in load order
//! - [`LruReplacer`] - evicts the least recently used page
//! - [`ClockReplacer`] - second-chance sweep over reference bits
//!
//! All three share the [`Replacer`] interface and are chosen at pool
//! construction through [`ReplacementPolicy`].

mod clock;
mod fifo;
mod lru;

use std::fmt;
use std::str::FromStr;

pub use clock::ClockReplacer;
pub use fifo::FifoReplacer;
pub use lru::LruReplacer;

use crate::buffer::FrameState;
use crate::common::{Error, FrameId};

/// A replacement policy: decides which frame to evict on a full-pool miss.
///
/// The pool calls `on_load` after a page is read into a frame and
/// `on_access` on every hit. `select_victim` only *chooses*: the victim
/// keeps its place until the pool follows up with `on_load` (the frame was
/// reused) or `remove` (the frame became empty). A pin aborted by a failed
/// write-back therefore leaves the victim evictable.
pub trait Replacer: Send {
    /// A page was loaded into `frame_id`.
    fn on_load(&mut self, frame_id: FrameId);

    /// The page in `frame_id` was pinned again (cache hit).
    fn on_access(&mut self, frame_id: FrameId);

    /// Choose an occupied frame with `fix_count == 0`, or `None` if every
    /// occupied frame is pinned.
    fn select_victim(&mut self, frames: &[FrameState]) -> Option<FrameId>;

    /// Forget `frame_id`; it no longer holds a page.
    fn remove(&mut self, frame_id: FrameId);

    /// Which policy this replacer implements.
    fn policy(&self) -> ReplacementPolicy;
}

/// The replacement disciplines a pool can be opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReplacementPolicy {
    /// First in, first out: evict the page loaded longest ago.
    Fifo,
    /// Least recently used: evict the page pinned longest ago.
    #[default]
    Lru,
    /// CLOCK (second chance): FIFO with a reference bit per frame.
    Clock,
}

impl ReplacementPolicy {
    /// All supported policies.
    pub const ALL: [ReplacementPolicy; 3] = [
        ReplacementPolicy::Fifo,
        ReplacementPolicy::Lru,
        ReplacementPolicy::Clock,
    ];

    /// Build a replacer for a pool of `capacity` frames.
    pub fn build(self, capacity: usize) -> Box<dyn Replacer> {
        match self {
            ReplacementPolicy::Fifo => Box::new(FifoReplacer::with_capacity(capacity)),
            ReplacementPolicy::Lru => Box::new(LruReplacer::with_capacity(capacity)),
            ReplacementPolicy::Clock => Box::new(ClockReplacer::new(capacity)),
        }
    }

    /// Lower-case name, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            ReplacementPolicy::Fifo => "fifo",
            ReplacementPolicy::Lru => "lru",
            ReplacementPolicy::Clock => "clock",
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReplacementPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(ReplacementPolicy::Fifo),
            "lru" => Ok(ReplacementPolicy::Lru),
            "clock" => Ok(ReplacementPolicy::Clock),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use crate::common::PageId;

    /// Frame states for `n` occupied frames, pinned where `pinned[i]` is true.
    pub fn frames(pinned: &[bool]) -> Vec<FrameState> {
        pinned
            .iter()
            .enumerate()
            .map(|(i, &p)| FrameState::Occupied {
                page_id: PageId::new(i as u32),
                dirty: false,
                fix_count: u32::from(p),
            })
            .collect()
    }
}
