//! Separator tokenizer core.
//!
//! The pieces every transport needs to expose one shared text buffer as a
//! token stream:
//!
//! - [`SeparatorSet`]: byte classification table owned by one handle.
//! - [`SharedBuffer`]: the single replaceable payload, stamped with a
//!   [`Generation`] on every write, and its read-consistent [`Snapshot`].
//! - [`HandleCursor`]: per-handle scan position remembering which generation
//!   it was computed against.
//! - [`next_token`]: the skip-separators / take-token step.
//!
//! Nothing in this crate locks. Callers that share a [`SharedBuffer`] across
//! threads wrap it themselves (see `scan_device`).
//!
//! # Staleness
//!
//! Cursors never hold a reference into the buffer. They hold a byte offset
//! plus the generation that offset belongs to. A cursor whose generation no
//! longer matches the snapshot is stale and must be resynchronized with
//! [`HandleCursor::sync`] before its offset is used.

mod buffer;
mod cursor;
mod engine;
mod separators;

pub use buffer::{Generation, SharedBuffer, Snapshot};
pub use cursor::{CursorState, HandleCursor, HandleId};
pub use engine::{next_token, tokens, Scan, Token, Tokens};
pub use separators::{SeparatorSet, DEFAULT_SEPARATORS};
