//! Error taxonomy for device operations.
//!
//! Every verb either succeeds or fails with exactly one of these kinds and
//! leaves the buffer and the calling handle's state as they were before the
//! call.

use std::fmt;

use scan_core::HandleId;
use thiserror::Error;

/// Storage that could not be allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    /// Staging storage for a new buffer payload.
    Buffer,
    /// Staging storage for raw separator bytes.
    Separators,
    /// A slot in the handle table.
    Handle,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Buffer => "buffer",
            Resource::Separators => "separator set",
            Resource::Handle => "handle",
        })
    }
}

/// Which way bytes were moving when a transfer failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Collaborator to device (write, reconfigure).
    Inbound,
    /// Device to collaborator (read).
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        })
    }
}

/// Device operation failure.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ScanError {
    /// Storage for a buffer, separator set or handle could not be obtained.
    #[error("out of memory: cannot allocate {resource} ({requested} requested)")]
    OutOfMemory {
        /// What was being allocated.
        resource: Resource,
        /// Bytes (or handles) requested.
        requested: usize,
    },

    /// The collaborator could not fully deliver or accept bytes.
    #[error("{direction} transfer fault: {transferred} of {expected} bytes")]
    TransferFault {
        /// Direction of the failed copy.
        direction: Direction,
        /// Bytes that should have moved.
        expected: usize,
        /// Bytes that did move before the fault.
        transferred: usize,
    },

    /// The handle is closed or was never opened.
    #[error("invalid handle {0}")]
    InvalidHandle(HandleId),

    /// A lock wait on behalf of the handle was interrupted.
    #[error("interrupted while waiting on behalf of handle {0}")]
    Interrupted(HandleId),
}

impl ScanError {
    /// Returns `true` if retrying the same call may succeed.
    ///
    /// Only [`ScanError::Interrupted`] is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScanError::Interrupted(_))
    }
}

/// Result type for device operations.
pub type Result<T> = std::result::Result<T, ScanError>;
