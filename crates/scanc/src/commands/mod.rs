//! Command handlers for the `scan` CLI.
//!
//! Each submodule implements one command. The token session shared by all of
//! them (open, configure, write, drain, close) lives here in the module root.

use std::io::{self, Write};

use scan_device::{HandleId, ScanError, Scanner, TokenRead};
use thiserror::Error;

mod demo;
mod tokens;

pub use demo::{run_demo, DEMO_SEPARATORS, DEMO_TEXT};
pub use tokens::{parse_tokens_options, run_tokens, Input, TokensOptions};

/// Largest token piece requested per read, matching a 1 KiB buffer that keeps
/// one byte for a terminator.
pub const DEFAULT_MAX_LEN: usize = 1023;

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Input could not be read.
    #[error("cannot read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Tokens could not be written to the output.
    #[error("cannot write output: {0}")]
    Output(#[source] io::Error),

    /// The device rejected an operation.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Bad command-line arguments.
    #[error("{0}")]
    Usage(String),
}

/// Run one token session on a fresh handle and print each token to `out`.
///
/// The handle is closed whether or not the session succeeds.
pub(crate) fn print_tokens(
    scanner: &Scanner,
    separators: Option<&[u8]>,
    text: &[u8],
    max_len: usize,
    out: &mut dyn Write,
) -> Result<usize, CommandError> {
    let handle = scanner.open_handle()?;
    let result = session(scanner, handle, separators, text, max_len, out);
    let closed = scanner.close_handle(handle);
    let count = result?;
    closed?;
    Ok(count)
}

fn session(
    scanner: &Scanner,
    handle: HandleId,
    separators: Option<&[u8]>,
    text: &[u8],
    max_len: usize,
    out: &mut dyn Write,
) -> Result<usize, CommandError> {
    if let Some(separators) = separators {
        scanner.reconfigure_separators(handle, separators)?;
    }
    scanner.write_buffer(handle, text)?;

    let mut count = 0;
    while let TokenRead::Token(token) = scanner.read_token(handle, max_len)? {
        writeln!(out, "Token: '{}'", String::from_utf8_lossy(&token))
            .map_err(CommandError::Output)?;
        count += 1;
    }
    out.flush().map_err(CommandError::Output)?;

    tracing::debug!(handle = %handle, tokens = count, "session finished");
    Ok(count)
}

#[cfg(test)]
mod tests;
