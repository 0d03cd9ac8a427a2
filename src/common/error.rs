//! Error types for the page cache.

use std::path::PathBuf;

use thiserror::Error;

use super::PageId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the storage backends and the buffer pool.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from disk operations that has no more specific kind.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The page file backing a pool does not exist.
    #[error("page file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A block past the end of the store was requested.
    #[error("block {block} does not exist (store holds {block_count} blocks)")]
    ReadNonExistingPage { block: u32, block_count: u32 },

    /// Writing a block (or growing the store) failed.
    #[error("failed to write block {block}: {source}")]
    WriteFailed {
        block: u32,
        #[source]
        source: std::io::Error,
    },

    /// The page number is too large for any store to hold.
    #[error("{page_id} is out of range (stores hold at most {max_pages} blocks)")]
    PageOutOfRange { page_id: PageId, max_pages: u32 },

    /// A miss occurred and every frame is pinned, so no victim exists.
    ///
    /// The caller must unpin something and retry.
    #[error("all {capacity} frames are pinned")]
    AllFramesPinned { capacity: usize },

    /// Unpin, mark-dirty or page access on a page that is not resident or
    /// not pinned.
    #[error("{0} is not pinned in the buffer pool")]
    InvalidPin(PageId),

    /// The pool has been shut down.
    #[error("buffer pool is closed")]
    PoolClosed,

    /// A pool was configured with an unusable frame count.
    #[error("invalid buffer pool capacity: {0}")]
    InvalidCapacity(usize),

    /// A replacement policy name could not be parsed.
    #[error("unknown replacement policy: {0:?}")]
    UnknownPolicy(String),
}

impl Error {
    /// Build a `WriteFailed` for a block that lies past the end of the store.
    pub(crate) fn write_past_end(block: u32, block_count: u32) -> Self {
        Error::WriteFailed {
            block,
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("store holds {} blocks", block_count),
            ),
        }
    }
}
