//! Device configuration.
//!
//! # Environment Variables
//!
//! - `SCAN_SEPARATORS`: default separators for new handles. Accepts the
//!   escapes `\t \n \r \f \v \s \\`. Example: `SCAN_SEPARATORS=',\s'`
//! - `SCAN_MAX_HANDLES`: maximum number of simultaneously open handles.
//! - `SCAN_MAX_BUFFER`: maximum payload size in bytes accepted by a write.
//!
//! Unparseable values are ignored (with a warning) and the default is kept.

use std::time::Duration;

use scan_core::SeparatorSet;

/// Configuration for a [`Scanner`](crate::Scanner).
#[derive(Clone, Debug)]
pub struct ScannerConfig {
    /// Separator set every new handle starts with.
    pub default_separators: SeparatorSet,
    /// Open handles allowed at once. Opening past this is resource exhaustion.
    pub max_handles: usize,
    /// Largest payload a write may stage, in bytes.
    pub max_buffer_len: usize,
    /// Longest a lock wait goes without checking for an interrupt request.
    pub lock_poll_interval: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            default_separators: SeparatorSet::default(),
            max_handles: 1024,
            max_buffer_len: 16 * 1024 * 1024,
            lock_poll_interval: Duration::from_millis(1),
        }
    }
}

impl ScannerConfig {
    /// Defaults overridden by `SCAN_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `SCAN_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ScannerConfig::default();

        if let Some(raw) = lookup("SCAN_SEPARATORS") {
            config.default_separators = SeparatorSet::from_bytes(&unescape_separators(&raw));
        }
        if let Some(n) = parse_count(&lookup, "SCAN_MAX_HANDLES") {
            config.max_handles = n;
        }
        if let Some(n) = parse_count(&lookup, "SCAN_MAX_BUFFER") {
            config.max_buffer_len = n;
        }

        config
    }
}

fn parse_count(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(key, value = %value, "ignoring unparseable setting: {e}");
            None
        }
    }
}

/// Decode separator bytes written with backslash escapes.
///
/// Recognizes `\t \n \r \f \v`, `\s` (space) and `\\`. Any other escaped
/// character stands for itself, and a trailing lone backslash is kept.
pub fn unescape_separators(raw: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.bytes();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(b't') => out.push(b'\t'),
            Some(b'n') => out.push(b'\n'),
            Some(b'r') => out.push(b'\r'),
            Some(b'f') => out.push(0x0C),
            Some(b'v') => out.push(0x0B),
            Some(b's') => out.push(b' '),
            Some(other) => out.push(other),
            None => out.push(b'\\'),
        }
    }
    out
}
