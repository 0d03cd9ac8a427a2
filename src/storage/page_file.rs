//! Page file - a file-backed block store.
//!
//! The [`PageFile`] handles all direct file operations:
//! - Creating, opening and destroying page files
//! - Reading and writing blocks
//! - Growing the file by whole blocks

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, Result};
use crate::storage::{Page, StorageBackend};

/// A single page file on disk.
///
/// # File Layout
/// Blocks are laid out sequentially with no file header:
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Block 0 │ Block 1 │ Block 2 │  ...    │ Block N │
/// │ (4KB)   │ (4KB)   │ (4KB)   │         │ (4KB)   │
/// └─────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset:  0      4096     8192    ...    N×4096
/// ```
///
/// # Thread Safety
/// `PageFile` is **single-threaded**. The buffer pool serializes access to it.
///
/// # Durability
/// Every block write and every growth is followed by `sync_data()`.
#[derive(Debug)]
pub struct PageFile {
    file: File,
    path: PathBuf,
    /// Number of blocks in the file.
    block_count: u32,
}

impl PageFile {
    /// Create a new, empty page file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;

        debug!(path = %path.display(), "created page file");
        Ok(Self {
            file,
            path,
            block_count: 0,
        })
    }

    /// Open an existing page file.
    ///
    /// # Errors
    /// Returns `Error::FileNotFound` if the file doesn't exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| not_found_or_io(e, &path))?;

        // Trailing partial blocks are ignored
        let file_size = file.metadata()?.len();
        let block_count = (file_size / PAGE_SIZE as u64) as u32;

        Ok(Self {
            file,
            path,
            block_count,
        })
    }

    /// Open an existing page file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Delete a page file from disk.
    ///
    /// # Errors
    /// Returns `Error::FileNotFound` if the file doesn't exist.
    pub fn destroy<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        fs::remove_file(path).map_err(|e| not_found_or_io(e, path))?;
        debug!(path = %path.display(), "destroyed page file");
        Ok(())
    }

    /// Append one zeroed block, returning its block number.
    pub fn append_empty_block(&mut self) -> Result<u32> {
        let block = self.block_count;
        self.ensure_capacity(block + 1)?;
        Ok(block)
    }

    /// Path of the file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the total size of the page file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        (self.block_count as u64) * (PAGE_SIZE as u64)
    }

    fn offset(block: u32) -> u64 {
        (block as u64) * (PAGE_SIZE as u64)
    }
}

impl StorageBackend for PageFile {
    #[inline]
    fn block_count(&self) -> u32 {
        self.block_count
    }

    fn ensure_capacity(&mut self, blocks: u32) -> Result<()> {
        if blocks <= self.block_count {
            return Ok(());
        }

        // Extending the length zero-fills the new blocks
        let first_new = self.block_count;
        self.file
            .set_len(Self::offset(blocks))
            .and_then(|_| self.file.sync_data())
            .map_err(|source| Error::WriteFailed {
                block: first_new,
                source,
            })?;

        debug!(
            path = %self.path.display(),
            from = first_new,
            to = blocks,
            "grew page file"
        );
        self.block_count = blocks;
        Ok(())
    }

    fn read_block(&mut self, block: u32, page: &mut Page) -> Result<()> {
        if block >= self.block_count {
            return Err(Error::ReadNonExistingPage {
                block,
                block_count: self.block_count,
            });
        }

        self.file.seek(SeekFrom::Start(Self::offset(block)))?;
        self.file.read_exact(page.as_mut_slice())?;
        Ok(())
    }

    fn write_block(&mut self, block: u32, page: &Page) -> Result<()> {
        if block >= self.block_count {
            return Err(Error::write_past_end(block, self.block_count));
        }

        let offset = Self::offset(block);
        let file = &mut self.file;
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.write_all(page.as_slice()))
            .and_then(|_| file.sync_data())
            .map_err(|source| Error::WriteFailed { block, source })
    }
}

fn not_found_or_io(err: io::Error, path: &Path) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::FileNotFound(path.to_path_buf())
    } else {
        Error::Io(err)
    }
}
