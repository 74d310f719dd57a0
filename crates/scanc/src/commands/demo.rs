//! The `demo` command: the classic four-token walkthrough.

use std::io::Write;

use scan_device::Scanner;

use super::{print_tokens, CommandError, DEFAULT_MAX_LEN};

/// Text written by the demo.
pub const DEMO_TEXT: &[u8] = b"This is a test.";

/// Separators the demo installs before writing.
pub const DEMO_SEPARATORS: &[u8] = b" \t\n";

/// Set separators, write [`DEMO_TEXT`] and print its tokens.
pub fn run_demo(scanner: &Scanner, out: &mut dyn Write) -> Result<(), CommandError> {
    print_tokens(scanner, Some(DEMO_SEPARATORS), DEMO_TEXT, DEFAULT_MAX_LEN, out)?;
    Ok(())
}
