//! Stream factories (spec §4.D)
//!
//! A lazy, re-entrant producer of a readable byte stream for a buffer's
//! contents. The memory factory's existence keeps the region pinned through
//! a lock token — "read the current contents" without racing a concurrent
//! dump. The raw-file factory fails with `FileMoved` if its path no longer
//! resolves.
//!
//! Grounded on the original `fwMemory::stream::in::Raw` (file-backed
//! stream) and `panxinmiao-myth`'s `assets/handle.rs` `StrongHandle`
//! pattern, reused here for the memory factory's pinning lock.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{Result, VoxelError};

use super::manager::LockToken;

/// A lazily-opened, exactly-`size`-byte readable stream.
pub trait StreamFactory: Send + Sync {
    /// Open a fresh stream over the buffer's current contents.
    ///
    /// # Errors
    /// Returns `FileMoved` if a file-backed factory's path no longer
    /// resolves, or an I/O error for other failures.
    fn open(&self) -> Result<Box<dyn Read + Send>>;

    /// Number of bytes the opened stream will yield.
    fn size(&self) -> usize;

    /// `true` if this factory was supplied by a caller (spec §6.1's
    /// `streamInfo().userStream`), as opposed to one synthesized internally
    /// by dump/restore.
    fn is_user_supplied(&self) -> bool {
        false
    }
}

/// Wraps an already-loaded region. Its very existence keeps the region
/// pinned: it holds a [`LockToken`], so the buffer cannot be dumped while a
/// stream (or the factory itself) is alive.
pub struct MemoryStreamFactory {
    data: Arc<Vec<u8>>,
    // Keeps the buffer pinned for the factory's lifetime; see spec §4.D.
    _pin: LockToken,
}

impl MemoryStreamFactory {
    #[must_use]
    pub fn new(data: Arc<Vec<u8>>, pin: LockToken) -> Self {
        Self { data, _pin: pin }
    }
}

impl StreamFactory for MemoryStreamFactory {
    fn open(&self) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new((*self.data).clone())))
    }

    fn size(&self) -> usize {
        self.data.len()
    }
}

/// Opens a file by path on each `open()` call. Used to restore dumped
/// buffers and to let callers point a buffer at an existing raw file.
pub struct RawFileStreamFactory {
    pub path: PathBuf,
    pub size: usize,
}

impl RawFileStreamFactory {
    #[must_use]
    pub fn new(path: PathBuf, size: usize) -> Self {
        Self { path, size }
    }
}

impl StreamFactory for RawFileStreamFactory {
    fn open(&self) -> Result<Box<dyn Read + Send>> {
        if !self.path.exists() {
            return Err(VoxelError::FileMoved(self.path.clone()));
        }
        let file = File::open(&self.path)?;
        Ok(Box::new(file))
    }

    fn size(&self) -> usize {
        self.size
    }
}

/// A caller-supplied producer, e.g. for network- or database-backed
/// buffers. Wraps an arbitrary closure returning a fresh reader each call.
pub struct UserStreamFactory {
    open_fn: Box<dyn Fn() -> Result<Box<dyn Read + Send>> + Send + Sync>,
    size: usize,
}

impl UserStreamFactory {
    pub fn new(
        size: usize,
        open_fn: impl Fn() -> Result<Box<dyn Read + Send>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            open_fn: Box::new(open_fn),
            size,
        }
    }
}

impl StreamFactory for UserStreamFactory {
    fn open(&self) -> Result<Box<dyn Read + Send>> {
        (self.open_fn)()
    }

    fn size(&self) -> usize {
        self.size
    }

    fn is_user_supplied(&self) -> bool {
        true
    }
}

/// Path wrapper that optionally deletes its file on drop.
///
/// Carried from the original source's `FileHolder` (spec §9 "Supplemented
/// features"): a dump always creates one of these with `auto_delete = true`
/// so the temp file disappears once nothing references it.
#[derive(Debug, Clone)]
pub struct TempFile {
    inner: Arc<TempFileInner>,
}

#[derive(Debug)]
struct TempFileInner {
    path: PathBuf,
    auto_delete: bool,
}

impl TempFile {
    #[must_use]
    pub fn new(path: PathBuf, auto_delete: bool) -> Self {
        Self {
            inner: Arc::new(TempFileInner { path, auto_delete }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl Drop for TempFileInner {
    fn drop(&mut self) {
        if self.auto_delete {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
