#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn output_of(f: impl FnOnce(&mut Vec<u8>) -> Result<(), CommandError>) -> String {
    let mut out = Vec::new();
    f(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// === Option parsing ===

#[test]
fn no_arguments_reads_stdin_with_defaults() {
    let options = parse_tokens_options(&[]).unwrap();
    assert_eq!(options, TokensOptions::default());
    assert_eq!(options.max_len, DEFAULT_MAX_LEN);
}

#[test]
fn options_and_path_in_any_order() {
    let options =
        parse_tokens_options(&args(&["notes.txt", "--max-len=8", r"--separators=,\t"])).unwrap();
    assert_eq!(
        options,
        TokensOptions {
            separators: Some(b",\t".to_vec()),
            max_len: 8,
            input: Input::File(PathBuf::from("notes.txt")),
        }
    );
}

#[test]
fn dash_selects_stdin() {
    let options = parse_tokens_options(&args(&["-"])).unwrap();
    assert_eq!(options.input, Input::Stdin);
}

#[test]
fn bad_arguments_are_usage_errors() {
    let cases: [&[&str]; 4] = [
        &["--max-len=0"],
        &["--max-len=lots"],
        &["--verbose"],
        &["a.txt", "b.txt"],
    ];
    for bad in cases {
        let err = parse_tokens_options(&args(bad)).unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)), "{bad:?} gave {err:?}");
    }
}

// === Sessions ===

#[test]
fn demo_prints_the_classic_tokens() {
    let scanner = Scanner::default();
    let printed = output_of(|out| run_demo(&scanner, out));
    assert_eq!(
        printed,
        "Token: 'This'\nToken: 'is'\nToken: 'a'\nToken: 'test.'\n"
    );
    assert_eq!(scanner.open_handles(), 0);
}

#[test]
fn session_uses_device_default_separators_when_unset() {
    let scanner = Scanner::default();
    let mut out = Vec::new();
    let count = print_tokens(&scanner, None, b"one\ttwo\n three", 64, &mut out).unwrap();
    assert_eq!(count, 3);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Token: 'one'\nToken: 'two'\nToken: 'three'\n"
    );
}

#[test]
fn small_max_len_prints_token_pieces() {
    let scanner = Scanner::default();
    let mut out = Vec::new();
    print_tokens(&scanner, None, b"abcdef gh", 4, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Token: 'abcd'\nToken: 'ef'\nToken: 'gh'\n"
    );
}

#[test]
fn missing_file_is_an_input_error() {
    let scanner = Scanner::default();
    let options = TokensOptions {
        input: Input::File(PathBuf::from("/definitely/not/here.txt")),
        ..TokensOptions::default()
    };
    let err = run_tokens(&scanner, &options, &mut Vec::<u8>::new()).unwrap_err();
    assert!(matches!(err, CommandError::Input { .. }), "{err:?}");
    assert_eq!(scanner.open_handles(), 0);
}

#[test]
fn device_errors_close_the_handle() {
    let scanner = Scanner::new(scan_device::ScannerConfig {
        max_buffer_len: 4,
        ..scan_device::ScannerConfig::default()
    });
    let err = print_tokens(&scanner, None, b"too long", 64, &mut Vec::<u8>::new()).unwrap_err();
    assert!(matches!(err, CommandError::Scan(ScanError::OutOfMemory { .. })));
    assert_eq!(scanner.open_handles(), 0);
}
