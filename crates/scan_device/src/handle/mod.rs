//! Table of open handles.
//!
//! Maps each [`HandleId`] to its cursor and separator set. Opening and
//! closing are the only operations that change table membership; every
//! other verb looks an entry up, clones its `Arc`, and drops the table lock
//! before touching the entry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use scan_core::{HandleCursor, HandleId, SeparatorSet};

use crate::error::Resource;
use crate::guard::Interrupt;
use crate::{Result, ScanError};

/// Mutable per-handle tokenizer state.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HandleState {
    pub(crate) cursor: HandleCursor,
    pub(crate) separators: SeparatorSet,
}

/// One open handle.
#[derive(Debug)]
pub(crate) struct HandleEntry {
    /// Serializes threads sharing this handle.
    pub(crate) state: Mutex<HandleState>,
    /// Interrupt requests for waits made on behalf of this handle.
    pub(crate) interrupt: Interrupt,
}

/// Open handles keyed by id.
#[derive(Debug)]
pub(crate) struct HandleTable {
    entries: RwLock<FxHashMap<HandleId, Arc<HandleEntry>>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl HandleTable {
    pub(crate) fn new(capacity: usize) -> Self {
        HandleTable {
            entries: RwLock::new(FxHashMap::default()),
            next_id: AtomicU64::new(1),
            capacity,
        }
    }

    /// Register a new handle whose state is built by `init`.
    ///
    /// Fails with [`ScanError::OutOfMemory`] when the table is full.
    pub(crate) fn insert(&self, init: impl FnOnce(HandleId) -> HandleState) -> Result<HandleId> {
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity {
            return Err(ScanError::OutOfMemory {
                resource: Resource::Handle,
                requested: entries.len() + 1,
            });
        }
        entries.try_reserve(1).map_err(|_| ScanError::OutOfMemory {
            resource: Resource::Handle,
            requested: entries.len() + 1,
        })?;

        let id = HandleId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = HandleEntry {
            state: Mutex::new(init(id)),
            interrupt: Interrupt::default(),
        };
        entries.insert(id, Arc::new(entry));
        Ok(id)
    }

    /// Remove a handle. In-flight operations holding its entry finish normally.
    pub(crate) fn remove(&self, id: HandleId) -> Result<()> {
        self.entries
            .write()
            .remove(&id)
            .map(drop)
            .ok_or(ScanError::InvalidHandle(id))
    }

    /// Look up an open handle.
    pub(crate) fn get(&self, id: HandleId) -> Result<Arc<HandleEntry>> {
        self.entries
            .read()
            .get(&id)
            .cloned()
            .ok_or(ScanError::InvalidHandle(id))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}
