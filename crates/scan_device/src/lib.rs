//! Shared token-stream device.
//!
//! One [`Scanner`] owns one text buffer. Clients open handles, and each
//! handle tokenizes the buffer independently with its own cursor and its own
//! separator set. Any handle may write, replacing the buffer for everyone.
//!
//! ```text
//! open_handle ──► HandleTable ──► HandleEntry { Mutex<cursor, separators>, interrupt }
//!                                        │
//! write_buffer / read_token ─────────────┴──► BufferGuard { Mutex<SharedBuffer> }
//! ```
//!
//! Transports (a character device, a socket, a test harness) sit outside this
//! crate and call the verbs on [`Scanner`].
//!
//! # Debugging
//!
//! Enable tracing with environment variables (after [`init_tracing`]):
//! - `RUST_LOG=scan_device=debug` - handle lifecycle, writes, resyncs
//! - `RUST_LOG=scan_device=trace` - every token read

mod config;
mod error;
mod guard;
mod handle;
mod scanner;

pub use config::{unescape_separators, ScannerConfig};
pub use error::{Direction, Resource, Result, ScanError};
pub use scanner::{Scanner, TokenRead};

// Re-export the core types that appear in this crate's API.
pub use scan_core::{CursorState, Generation, HandleId, SeparatorSet, DEFAULT_SEPARATORS};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
