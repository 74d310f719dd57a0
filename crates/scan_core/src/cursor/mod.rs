//! Per-handle scan position.
//!
//! A [`HandleCursor`] is a byte offset plus the [`Generation`] the offset was
//! computed against. It never borrows the buffer, so a write replacing the
//! payload cannot leave it dangling; at worst it leaves it stale, and a stale
//! cursor is reset by [`sync()`](HandleCursor::sync) before it is used.
//!
//! # Lifecycle
//!
//! ```text
//! Fresh ──read──► Advancing ──read──► Exhausted
//!   ▲                 │                   │
//!   └── own write ────┴───────────────────┘
//!
//! any state ──write by another handle──► Stale ──next read──► Fresh
//! ```

use std::fmt;

use crate::{Generation, Snapshot};

/// Identifier of one open handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(u64);

impl HandleId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        HandleId(raw)
    }

    /// Raw id value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a cursor stands relative to a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    /// At the start of the buffer it observed; nothing consumed yet.
    Fresh,
    /// Some bytes consumed, some remain.
    Advancing,
    /// Every byte consumed; reads yield end-of-stream.
    Exhausted,
    /// The buffer was replaced by another handle since this cursor last read.
    Stale,
}

/// Tokenizer position owned by exactly one handle.
///
/// # Invariant
///
/// `pos <= text length of the payload at observed generation`. Offsets only
/// move forward within a generation; [`reset()`](Self::reset) is the only
/// way back to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandleCursor {
    handle: HandleId,
    pos: usize,
    observed: Generation,
}

impl HandleCursor {
    /// Fresh cursor for `handle` at the start of the payload at `generation`.
    pub fn new(handle: HandleId, generation: Generation) -> Self {
        Self {
            handle,
            pos: 0,
            observed: generation,
        }
    }

    /// The handle owning this cursor.
    #[inline]
    pub fn handle(&self) -> HandleId {
        self.handle
    }

    /// Current byte offset into the observed payload's text.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Generation the offset belongs to.
    #[inline]
    pub fn observed_generation(&self) -> Generation {
        self.observed
    }

    /// Return to the start of the payload at `generation`.
    pub fn reset(&mut self, generation: Generation) {
        self.pos = 0;
        self.observed = generation;
    }

    /// Returns `true` if `snapshot` belongs to a different generation.
    #[inline]
    pub fn is_stale(&self, snapshot: &Snapshot) -> bool {
        self.observed != snapshot.generation()
    }

    /// Reset to the start of `snapshot` if the cursor is stale.
    ///
    /// Returns `true` if a reset happened. After this call the offset is
    /// valid for `snapshot`.
    pub fn sync(&mut self, snapshot: &Snapshot) -> bool {
        if self.is_stale(snapshot) {
            self.reset(snapshot.generation());
            true
        } else {
            false
        }
    }

    /// Move forward to `pos` within the observed payload.
    pub fn advance_to(&mut self, pos: usize) {
        debug_assert!(pos >= self.pos, "cursor moved backwards: {} -> {pos}", self.pos);
        self.pos = pos;
    }

    /// Lifecycle state of this cursor against `snapshot`.
    pub fn state(&self, snapshot: &Snapshot) -> CursorState {
        if self.is_stale(snapshot) {
            CursorState::Stale
        } else if self.pos >= snapshot.text().len() {
            CursorState::Exhausted
        } else if self.pos == 0 {
            CursorState::Fresh
        } else {
            CursorState::Advancing
        }
    }
}
