//! Page identifier type.

use std::fmt;

use super::config::MAX_PAGES;

/// Identifies a block of the page file.
///
/// Page N lives at byte offset `N × PAGE_SIZE` in its file. An empty frame
/// is represented by `Option<PageId>::None` rather than a magic value.
///
/// # Example
/// ```
/// use pagecache::PageId;
///
/// let page_id = PageId::new(42);
/// assert_eq!(page_id.0, 42);
/// assert_eq!(page_id.block_count(), Some(43));
/// assert_eq!(PageId::new(u32::MAX).block_count(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Create a new PageId.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }

    /// Number of blocks a file needs to contain this page, or `None` if the
    /// page lies past [`MAX_PAGES`].
    #[inline]
    pub fn block_count(&self) -> Option<u32> {
        if self.0 < MAX_PAGES {
            Some(self.0 + 1)
        } else {
            None
        }
    }
}

impl From<u32> for PageId {
    fn from(id: u32) -> Self {
        PageId(id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({})", self.0)
    }
}
