//! The device: one shared buffer, many tokenizing handles.
//!
//! [`Scanner`] exposes the verbs a transport calls on behalf of its clients:
//! [`open_handle`](Scanner::open_handle), [`close_handle`](Scanner::close_handle),
//! [`write_buffer`](Scanner::write_buffer), [`read_token`](Scanner::read_token)
//! and [`reconfigure_separators`](Scanner::reconfigure_separators), plus
//! streaming variants that move bytes through `std::io` readers and writers.
//!
//! # Atomicity
//!
//! A failed call changes nothing. Inbound bytes are staged into owned storage
//! before any lock is taken, so a short or faulting source never reaches the
//! buffer or the separator set. Reads compute the next cursor on a copy and
//! commit it only after the sink has accepted bytes.
//!
//! # Staleness
//!
//! A write resets the writer's own cursor. Every other handle's cursor keeps
//! the generation it last read at; on its next read that mismatch is detected
//! and the cursor restarts at the beginning of the latest payload.

use std::io::{Read, Write};
use std::sync::OnceLock;

use scan_core::{
    next_token, CursorState, Generation, HandleCursor, HandleId, Scan, SeparatorSet,
};

use crate::error::{Direction, Resource};
use crate::guard::{lock_interruptible, BufferGuard};
use crate::handle::{HandleState, HandleTable};
use crate::{Result, ScanError, ScannerConfig};

/// Result of a successful [`Scanner::read_token`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenRead {
    /// Token bytes, possibly a prefix of a longer token.
    Token(Vec<u8>),
    /// No tokens remain in the buffer this handle observes.
    EndOfStream,
}

/// Shared token-stream device.
#[derive(Debug)]
pub struct Scanner {
    config: ScannerConfig,
    buffer: BufferGuard,
    handles: HandleTable,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}

impl Scanner {
    /// Create a device with an empty buffer.
    pub fn new(config: ScannerConfig) -> Self {
        let handles = HandleTable::new(config.max_handles);
        Scanner {
            config,
            buffer: BufferGuard::default(),
            handles,
        }
    }

    /// The process-wide device, configured from the environment on first use.
    pub fn global() -> &'static Scanner {
        static GLOBAL: OnceLock<Scanner> = OnceLock::new();
        GLOBAL.get_or_init(|| Scanner::new(ScannerConfig::from_env()))
    }

    /// Configuration this device was built with.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    // -- Handle lifecycle --

    /// Open a handle: a fresh cursor at the current generation and the
    /// configured default separators.
    pub fn open_handle(&self) -> Result<HandleId> {
        let generation = self.buffer.generation();
        let separators = self.config.default_separators;
        let id = self.handles.insert(|id| HandleState {
            cursor: HandleCursor::new(id, generation),
            separators,
        })?;
        tracing::debug!(handle = %id, generation = generation.get(), "handle opened");
        Ok(id)
    }

    /// Close a handle, discarding its cursor and separators.
    pub fn close_handle(&self, id: HandleId) -> Result<()> {
        self.handles.remove(id)?;
        tracing::debug!(handle = %id, "handle closed");
        Ok(())
    }

    // -- Writes --

    /// Replace the shared buffer with `bytes`. Returns the byte count written.
    pub fn write_buffer(&self, id: HandleId, bytes: &[u8]) -> Result<usize> {
        let mut src = bytes;
        self.write_from(id, &mut src, bytes.len())
    }

    /// Replace the shared buffer with exactly `len` bytes read from `src`.
    ///
    /// If `src` errors or ends early the call fails with
    /// [`ScanError::TransferFault`] and the buffer is unchanged.
    pub fn write_from<R: Read + ?Sized>(
        &self,
        id: HandleId,
        src: &mut R,
        len: usize,
    ) -> Result<usize> {
        let entry = self.handles.get(id)?;
        if len > self.config.max_buffer_len {
            return Err(ScanError::OutOfMemory {
                resource: Resource::Buffer,
                requested: len,
            });
        }
        let payload = stage(src, len, Resource::Buffer)?;
        if let Some(nul) = payload.iter().position(|&b| b == 0) {
            tracing::warn!(
                handle = %id,
                offset = nul,
                len,
                "payload contains NUL; text ends there",
            );
        }

        let poll = self.config.lock_poll_interval;
        let mut state = lock_interruptible(&entry.state, id, &entry.interrupt, poll)?;
        let generation = self.buffer.replace(payload, id, &entry.interrupt, poll)?;
        state.cursor.reset(generation);

        tracing::debug!(handle = %id, generation = generation.get(), len, "buffer replaced");
        Ok(len)
    }

    // -- Reads --

    /// Read the handle's next token, at most `max_len` bytes of it.
    ///
    /// A token longer than `max_len` is returned in pieces: the cursor moves
    /// only past the bytes returned, so the next read continues the same
    /// token. `max_len == 0` cannot accept any byte and fails with
    /// [`ScanError::TransferFault`] unless the stream is already at its end.
    pub fn read_token(&self, id: HandleId, max_len: usize) -> Result<TokenRead> {
        let mut out = Vec::new();
        match self.read_token_to(id, &mut out, max_len)? {
            0 => Ok(TokenRead::EndOfStream),
            _ => Ok(TokenRead::Token(out)),
        }
    }

    /// Write the handle's next token (at most `max_len` bytes) into `sink`.
    ///
    /// Returns the number of bytes the sink accepted; `0` means end of
    /// stream. The cursor advances past exactly the accepted bytes. If the
    /// sink accepts nothing or errors, the call fails with
    /// [`ScanError::TransferFault`] and the cursor does not move.
    pub fn read_token_to<W: Write + ?Sized>(
        &self,
        id: HandleId,
        sink: &mut W,
        max_len: usize,
    ) -> Result<usize> {
        let entry = self.handles.get(id)?;
        let poll = self.config.lock_poll_interval;
        let mut state = lock_interruptible(&entry.state, id, &entry.interrupt, poll)?;
        let snapshot = self.buffer.snapshot(id, &entry.interrupt, poll)?;

        let mut cursor = state.cursor;
        if cursor.sync(&snapshot) {
            tracing::debug!(
                handle = %id,
                from = state.cursor.observed_generation().get(),
                to = snapshot.generation().get(),
                "stale cursor restarted on latest buffer",
            );
        }

        let token = match next_token(snapshot.text(), cursor.pos(), &state.separators) {
            Scan::Token(token) => token,
            Scan::EndOfStream => {
                cursor.advance_to(snapshot.text().len());
                state.cursor = cursor;
                tracing::trace!(handle = %id, "end of stream");
                return Ok(0);
            }
        };

        let chunk = &token.bytes()[..token.len().min(max_len)];
        let delivered = match sink.write(chunk) {
            Ok(n) => n.min(chunk.len()),
            Err(e) => {
                tracing::warn!(handle = %id, "sink rejected token: {e}");
                0
            }
        };
        if delivered == 0 {
            return Err(ScanError::TransferFault {
                direction: Direction::Outbound,
                expected: chunk.len(),
                transferred: 0,
            });
        }

        cursor.advance_to(token.start() + delivered);
        state.cursor = cursor;
        tracing::trace!(
            handle = %id,
            start = token.start(),
            len = delivered,
            partial = delivered < token.len(),
            "token read",
        );
        Ok(delivered)
    }

    // -- Separators --

    /// Replace the handle's separator set with `raw` separator bytes.
    pub fn reconfigure_separators(&self, id: HandleId, raw: &[u8]) -> Result<()> {
        let mut src = raw;
        self.reconfigure_from(id, &mut src, raw.len())
    }

    /// Replace the handle's separator set with exactly `len` bytes from `src`.
    ///
    /// On any failure the previous set is kept.
    pub fn reconfigure_from<R: Read + ?Sized>(
        &self,
        id: HandleId,
        src: &mut R,
        len: usize,
    ) -> Result<()> {
        let entry = self.handles.get(id)?;
        let raw = stage(src, len, Resource::Separators)?;
        let separators = SeparatorSet::from_bytes(&raw);

        let poll = self.config.lock_poll_interval;
        let mut state = lock_interruptible(&entry.state, id, &entry.interrupt, poll)?;
        state.separators = separators;

        tracing::debug!(handle = %id, ?separators, "separators reconfigured");
        Ok(())
    }

    // -- Control and introspection --

    /// Interrupt the handle's current (or next) contended lock wait.
    ///
    /// The interrupted call fails with [`ScanError::Interrupted`].
    pub fn interrupt(&self, id: HandleId) -> Result<()> {
        self.handles.get(id)?.interrupt.raise();
        Ok(())
    }

    /// Lifecycle state of the handle's cursor against the current buffer.
    pub fn cursor_state(&self, id: HandleId) -> Result<CursorState> {
        let entry = self.handles.get(id)?;
        let poll = self.config.lock_poll_interval;
        let state = lock_interruptible(&entry.state, id, &entry.interrupt, poll)?;
        let snapshot = self.buffer.snapshot(id, &entry.interrupt, poll)?;
        Ok(state.cursor.state(&snapshot))
    }

    /// The handle's current separator set.
    pub fn separators(&self, id: HandleId) -> Result<SeparatorSet> {
        let entry = self.handles.get(id)?;
        let poll = self.config.lock_poll_interval;
        let state = lock_interruptible(&entry.state, id, &entry.interrupt, poll)?;
        Ok(state.separators)
    }

    /// Generation of the current buffer.
    pub fn generation(&self) -> Generation {
        self.buffer.generation()
    }

    /// Number of open handles.
    pub fn open_handles(&self) -> usize {
        self.handles.len()
    }
}

/// Copy exactly `len` bytes from `src` into freshly allocated storage.
fn stage<R: Read + ?Sized>(src: &mut R, len: usize, resource: Resource) -> Result<Vec<u8>> {
    let mut staged = Vec::new();
    staged
        .try_reserve_exact(len)
        .map_err(|_| ScanError::OutOfMemory {
            resource,
            requested: len,
        })?;

    let fault = |transferred| ScanError::TransferFault {
        direction: Direction::Inbound,
        expected: len,
        transferred,
    };
    let limit = u64::try_from(len).unwrap_or(u64::MAX);
    if let Err(e) = src.take(limit).read_to_end(&mut staged) {
        tracing::warn!(expected = len, transferred = staged.len(), "source failed: {e}");
        return Err(fault(staged.len()));
    }
    if staged.len() != len {
        return Err(fault(staged.len()));
    }
    Ok(staged)
}
