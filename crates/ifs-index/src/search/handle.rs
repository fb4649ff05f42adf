//! Searcher handles and the idle-handle pool.
//!
//! A [`SearchHandle`] pins one searcher generation and remembers the commit
//! opstamp it was taken at. Before each use the handle compares that stamp
//! with the latest commit and reloads if the index has been rebuilt since.

use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;
use tantivy::{Opstamp, Searcher};
use tracing::debug;

use super::SearchIndex;
use crate::IndexError;

/// Number of idle handles a pool keeps by default.
const DEFAULT_MAX_IDLE: usize = 8;

/// A searcher pinned to one index generation.
pub struct SearchHandle {
    /// The index this handle reads.
    index: SearchIndex,
    /// The pinned searcher.
    searcher: Searcher,
    /// Commit opstamp recorded before the searcher was taken.
    opstamp: Opstamp,
}

impl SearchHandle {
    /// Takes a searcher on the latest commit of `index`.
    pub(super) fn new(index: SearchIndex) -> Result<Self, IndexError> {
        // Record the stamp first: a commit racing the reload then only makes
        // the handle look stale, never fresher than it is
        let opstamp = index.opstamp()?;
        index.reload()?;
        let searcher = index.reader.searcher();
        Ok(Self {
            index,
            searcher,
            opstamp,
        })
    }

    /// The pinned searcher.
    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// The index this handle reads.
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Commit opstamp this handle was taken at.
    pub fn opstamp(&self) -> Opstamp {
        self.opstamp
    }

    /// Returns true if a newer commit exists.
    pub fn is_stale(&self) -> Result<bool, IndexError> {
        Ok(self.index.opstamp()? != self.opstamp)
    }

    /// Reloads the searcher if the index has changed.
    ///
    /// Returns true if a reload happened.
    pub fn refresh_if_stale(&mut self) -> Result<bool, IndexError> {
        if !self.is_stale()? {
            return Ok(false);
        }
        let fresh = Self::new(self.index.clone())?;
        debug!(from = self.opstamp, to = fresh.opstamp, "refreshed search handle");
        *self = fresh;
        Ok(true)
    }
}

/// Keeps idle handles for reuse across queries.
pub struct HandlePool {
    /// The index handles are taken on.
    index: SearchIndex,
    /// Handles waiting to be checked out.
    idle: Mutex<Vec<SearchHandle>>,
    /// Most idle handles kept; extra returns are dropped.
    max_idle: usize,
}

impl HandlePool {
    /// Creates an empty pool over `index`.
    pub fn new(index: SearchIndex) -> Self {
        Self::with_max_idle(index, DEFAULT_MAX_IDLE)
    }

    /// Creates an empty pool keeping at most `max_idle` idle handles.
    pub fn with_max_idle(index: SearchIndex, max_idle: usize) -> Self {
        Self {
            index,
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Takes an idle handle, or a new one, refreshed to the latest commit.
    ///
    /// The handle goes back to the pool when the guard is dropped.
    pub fn checkout(&self) -> Result<PooledHandle<'_>, IndexError> {
        let pooled = self.idle.lock().pop();
        let handle = match pooled {
            Some(mut handle) => {
                handle.refresh_if_stale()?;
                handle
            }
            None => SearchHandle::new(self.index.clone())?,
        };
        Ok(PooledHandle {
            pool: self,
            handle: Some(handle),
        })
    }

    /// Number of handles currently idle.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// Returns a handle to the idle list.
    fn release(&self, handle: SearchHandle) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(handle);
        }
    }
}

/// A handle checked out of a [`HandlePool`].
pub struct PooledHandle<'a> {
    /// Owning pool.
    pool: &'a HandlePool,
    /// Always `Some` until dropped.
    handle: Option<SearchHandle>,
}

impl Deref for PooledHandle<'_> {
    type Target = SearchHandle;

    fn deref(&self) -> &Self::Target {
        self.handle
            .as_ref()
            .expect("pooled handle should be present until drop")
    }
}

impl DerefMut for PooledHandle<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.handle
            .as_mut()
            .expect("pooled handle should be present until drop")
    }
}

impl Drop for PooledHandle<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pool.release(handle);
        }
    }
}
