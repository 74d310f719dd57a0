//! The `tokens` command: tokenize a file or standard input.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use scan_device::{unescape_separators, Scanner};

use super::{print_tokens, CommandError, DEFAULT_MAX_LEN};

/// Where the text to tokenize comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Input {
    #[default]
    Stdin,
    File(PathBuf),
}

/// Options for `scan tokens`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokensOptions {
    /// Separator bytes for the handle; the device default when `None`.
    pub separators: Option<Vec<u8>>,
    /// Largest piece of a token requested per read.
    pub max_len: usize,
    pub input: Input,
}

impl Default for TokensOptions {
    fn default() -> Self {
        TokensOptions {
            separators: None,
            max_len: DEFAULT_MAX_LEN,
            input: Input::Stdin,
        }
    }
}

/// Parse the arguments following `scan tokens`.
///
/// Accepts `--separators=S` (with `\t`, `\n`, `\s` style escapes),
/// `--max-len=N` and one input path, where `-` means standard input.
pub fn parse_tokens_options(args: &[String]) -> Result<TokensOptions, CommandError> {
    let mut options = TokensOptions::default();
    let mut input = None;

    for arg in args {
        if let Some(raw) = arg.strip_prefix("--separators=") {
            options.separators = Some(unescape_separators(raw));
        } else if let Some(raw) = arg.strip_prefix("--max-len=") {
            options.max_len = match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(CommandError::Usage(format!(
                        "--max-len expects a positive integer, got '{raw}'"
                    )))
                }
            };
        } else if arg.starts_with('-') && arg != "-" {
            return Err(CommandError::Usage(format!("unknown option '{arg}'")));
        } else if input.is_some() {
            return Err(CommandError::Usage(format!("unexpected argument '{arg}'")));
        } else if arg == "-" {
            input = Some(Input::Stdin);
        } else {
            input = Some(Input::File(PathBuf::from(arg)));
        }
    }

    options.input = input.unwrap_or_default();
    Ok(options)
}

/// Tokenize the selected input on `scanner` and print each token to `out`.
pub fn run_tokens(
    scanner: &Scanner,
    options: &TokensOptions,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let text = read_input(&options.input)?;
    let count = print_tokens(
        scanner,
        options.separators.as_deref(),
        &text,
        options.max_len,
        out,
    )?;
    tracing::debug!(bytes = text.len(), tokens = count, "input tokenized");
    Ok(())
}

fn read_input(input: &Input) -> Result<Vec<u8>, CommandError> {
    match input {
        Input::Stdin => {
            let mut text = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut text)
                .map_err(|source| CommandError::Input {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(text)
        }
        Input::File(path) => std::fs::read(path).map_err(|source| CommandError::Input {
            path: path.display().to_string(),
            source,
        }),
    }
}
