//! Locking discipline for the shared buffer and per-handle state.
//!
//! One coarse [`BufferGuard`] protects the [`SharedBuffer`]: every replace and
//! every snapshot happens under it, and nothing inside it blocks on I/O.
//! Per-handle state has its own mutex so that a handle shared between
//! threads serializes its cursor updates without involving other handles.
//!
//! Lock order is always handle state, then buffer. The handle table lock is
//! never held while either is taken.
//!
//! # Interrupts
//!
//! Waits are interruptible. A lock attempt that cannot be satisfied
//! immediately polls the waiting handle's [`Interrupt`] every
//! `poll` interval; a raised interrupt is consumed and surfaced as
//! [`ScanError::Interrupted`]. An interrupt raised while nobody is waiting
//! stays pending until the handle's next contended wait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use scan_core::{Generation, HandleId, SharedBuffer, Snapshot};

use crate::{Result, ScanError};

/// Pending interrupt request for one handle.
#[derive(Debug, Default)]
pub(crate) struct Interrupt {
    raised: AtomicBool,
}

impl Interrupt {
    /// Request that the handle's current or next contended wait give up.
    pub(crate) fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consume a pending request. Returns `true` if one was pending.
    fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }
}

/// Acquire `mutex` on behalf of `handle`, giving up if `interrupt` is raised.
pub(crate) fn lock_interruptible<'a, T>(
    mutex: &'a Mutex<T>,
    handle: HandleId,
    interrupt: &Interrupt,
    poll: Duration,
) -> Result<MutexGuard<'a, T>> {
    if let Some(guard) = mutex.try_lock() {
        return Ok(guard);
    }
    loop {
        if interrupt.take() {
            tracing::warn!(handle = %handle, "lock wait interrupted");
            return Err(ScanError::Interrupted(handle));
        }
        if let Some(guard) = mutex.try_lock_for(poll) {
            return Ok(guard);
        }
    }
}

/// The process-wide buffer behind its mutual-exclusion region.
#[derive(Debug, Default)]
pub(crate) struct BufferGuard {
    pub(crate) inner: Mutex<SharedBuffer>,
}

impl BufferGuard {
    /// Replace the payload on behalf of `handle`.
    pub(crate) fn replace(
        &self,
        bytes: Vec<u8>,
        handle: HandleId,
        interrupt: &Interrupt,
        poll: Duration,
    ) -> Result<Generation> {
        let mut buffer = lock_interruptible(&self.inner, handle, interrupt, poll)?;
        Ok(buffer.replace(bytes))
    }

    /// Snapshot the payload on behalf of `handle`.
    ///
    /// The lock is held only long enough to clone the reference; the
    /// snapshot keeps its payload alive after the lock is released.
    pub(crate) fn snapshot(
        &self,
        handle: HandleId,
        interrupt: &Interrupt,
        poll: Duration,
    ) -> Result<Snapshot> {
        let buffer = lock_interruptible(&self.inner, handle, interrupt, poll)?;
        Ok(buffer.snapshot())
    }

    /// Current generation. Uninterruptible; used where no handle exists yet.
    pub(crate) fn generation(&self) -> Generation {
        self.inner.lock().generation()
    }
}
