//! Property-based tests for the device verbs.
//!
//! Checks that reads with any byte limit still hand back the buffer's tokens
//! intact, and that a handle which falls behind a write restarts on the new
//! payload instead of mixing the two.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use scan_device::{HandleId, Scanner, TokenRead};

// -- Strategies --

/// Short words over a small alphabet, joined by runs of separators.
fn text_strategy() -> impl Strategy<Value = Vec<u8>> {
    let word = prop::collection::vec(prop::sample::select(b"abcxyz".to_vec()), 1..12);
    let gap = prop::collection::vec(prop::sample::select(b" \t\n".to_vec()), 1..3);
    (
        prop::collection::vec((word, gap), 0..10),
        prop::collection::vec(prop::sample::select(b" \n".to_vec()), 0..2),
    )
        .prop_map(|(parts, lead)| {
            let mut out = lead;
            for (w, g) in parts {
                out.extend(w);
                out.extend(g);
            }
            out
        })
}

fn whole_tokens(text: &[u8]) -> Vec<Vec<u8>> {
    text.split(|b| b" \t\n\r\x0C\x0B".contains(b))
        .filter(|t| !t.is_empty())
        .map(<[u8]>::to_vec)
        .collect()
}

fn drain(scanner: &Scanner, id: HandleId, max_len: usize) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    while let TokenRead::Token(t) = scanner.read_token(id, max_len).unwrap() {
        out.push(t);
    }
    out
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Concatenating the pieces returned under a small limit gives back
    /// exactly the buffer's tokens, and no piece exceeds the limit.
    #[test]
    fn truncated_reads_reassemble(text in text_strategy(), max_len in 1usize..6) {
        let scanner = Scanner::default();
        let h = scanner.open_handle().unwrap();
        scanner.write_buffer(h, &text).unwrap();

        let pieces = drain(&scanner, h, max_len);
        prop_assert!(pieces.iter().all(|p| !p.is_empty() && p.len() <= max_len));

        let rejoined: Vec<u8> = pieces.concat();
        let expected: Vec<u8> = whole_tokens(&text).concat();
        prop_assert_eq!(rejoined, expected);
    }

    /// A reader interrupted by another handle's write sees only tokens of
    /// the new payload afterwards.
    #[test]
    fn stale_reader_restarts_on_new_payload(
        first in text_strategy(),
        second in text_strategy(),
        consumed in 0usize..5,
    ) {
        let scanner = Scanner::default();
        let writer = scanner.open_handle().unwrap();
        let reader = scanner.open_handle().unwrap();

        scanner.write_buffer(writer, &first).unwrap();
        for _ in 0..consumed {
            scanner.read_token(reader, 64).unwrap();
        }
        scanner.write_buffer(writer, &second).unwrap();

        prop_assert_eq!(drain(&scanner, reader, 64), whole_tokens(&second));
    }
}
