//! The single replaceable text payload.
//!
//! [`SharedBuffer`] is replaced wholesale on every write and never mutated
//! in place. Each replacement bumps its [`Generation`], which is how cursors
//! computed against an earlier payload detect that they are stale.
//!
//! Readers take a [`Snapshot`]: a reference-counted view of one payload.
//! The payload is released when the last snapshot of it is dropped, so a
//! reader that is still tokenizing can never observe freed or half-written
//! memory, however many writes land in the meantime.
//!
//! # Text View
//!
//! Payloads are text. A NUL byte ends the text the tokenizer sees, matching
//! the legacy device which measured its data with `strlen`. The full payload
//! is kept and the NUL offset is recorded so the device layer can report it.

use std::fmt;
use std::sync::Arc;

/// Counter stamped on every buffer replacement.
///
/// Totally orders writes. The empty buffer a [`SharedBuffer`] starts with
/// is [`Generation::INITIAL`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Generation of a buffer that has never been written.
    pub const INITIAL: Generation = Generation(0);

    /// Raw counter value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The generation following this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Generation {
        Generation(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Process-wide text buffer holding the most recently written payload.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    payload: Payload,
    generation: Generation,
}

/// One written payload with its text boundary precomputed.
#[derive(Clone, Debug, Default)]
struct Payload {
    bytes: Arc<Vec<u8>>,
    /// Offset of the first NUL byte, or `bytes.len()` if there is none.
    text_len: usize,
}

impl Payload {
    fn new(bytes: Vec<u8>) -> Self {
        let text_len = memchr::memchr(0, &bytes).unwrap_or(bytes.len());
        Self {
            bytes: Arc::new(bytes),
            text_len,
        }
    }
}

impl SharedBuffer {
    /// Create an empty buffer at [`Generation::INITIAL`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` as the sole current payload.
    ///
    /// Returns the new generation. The previous payload stays alive for as
    /// long as some [`Snapshot`] still refers to it.
    pub fn replace(&mut self, bytes: Vec<u8>) -> Generation {
        self.payload = Payload::new(bytes);
        self.generation = self.generation.next();
        self.generation
    }

    /// Read-consistent view of the current payload.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            payload: self.payload.clone(),
            generation: self.generation,
        }
    }

    /// Generation of the current payload.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Length of the full payload in bytes, including anything after a NUL.
    pub fn len(&self) -> usize {
        self.payload.bytes.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.bytes.is_empty()
    }
}

/// Immutable view of one payload, valid for as long as it is held.
#[derive(Clone)]
pub struct Snapshot {
    payload: Payload,
    generation: Generation,
}

impl Snapshot {
    /// Tokenizable text: the payload up to (not including) the first NUL.
    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.payload.bytes[..self.payload.text_len]
    }

    /// The full payload as written.
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload.bytes
    }

    /// Generation this snapshot was taken at.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Offset of the first interior NUL byte, if the payload contains one.
    pub fn interior_nul(&self) -> Option<usize> {
        (self.payload.text_len < self.payload.bytes.len()).then_some(self.payload.text_len)
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("generation", &self.generation)
            .field("len", &self.payload.bytes.len())
            .field("text_len", &self.payload.text_len)
            .finish()
    }
}
