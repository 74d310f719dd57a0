use super::*;
use pretty_assertions::assert_eq;

/// Collect every token of `text` as owned strings.
fn words(text: &[u8], separators: &SeparatorSet) -> Vec<String> {
    tokens(text, separators)
        .map(|t| String::from_utf8_lossy(t.bytes()).into_owned())
        .collect()
}

// === Basic tokenization ===

#[test]
fn legacy_sentence_with_default_separators() {
    let set = SeparatorSet::default();
    assert_eq!(
        words(b"This is a test.", &set),
        vec!["This", "is", "a", "test."]
    );
}

#[test]
fn next_token_reports_offsets() {
    let set = SeparatorSet::default();
    let Scan::Token(token) = next_token(b"  ab cd", 0, &set) else {
        panic!("expected a token");
    };
    assert_eq!(token.bytes(), b"ab");
    assert_eq!(token.start(), 2);
    assert_eq!(token.end(), 4);
    assert_eq!(token.len(), 2);
    assert!(!token.is_empty());
}

#[test]
fn resumes_from_position() {
    let set = SeparatorSet::default();
    let Scan::Token(token) = next_token(b"ab cd", 2, &set) else {
        panic!("expected a token");
    };
    assert_eq!(token.bytes(), b"cd");
    assert_eq!(token.start(), 3);
}

#[test]
fn resumes_mid_token() {
    // A position inside a token continues that token.
    let set = SeparatorSet::default();
    let Scan::Token(token) = next_token(b"hello world", 2, &set) else {
        panic!("expected a token");
    };
    assert_eq!(token.bytes(), b"llo");
}

// === Edge cases ===

#[test]
fn consecutive_separators_collapse() {
    let set = SeparatorSet::from_bytes(b",");
    assert_eq!(words(b"a,,,b,,c", &set), vec!["a", "b", "c"]);
}

#[test]
fn trailing_separators_are_end_of_stream() {
    let set = SeparatorSet::default();
    assert_eq!(next_token(b"word  \n\t", 4, &set), Scan::EndOfStream);
}

#[test]
fn empty_text_is_end_of_stream() {
    assert_eq!(next_token(b"", 0, &SeparatorSet::default()), Scan::EndOfStream);
}

#[test]
fn separators_only_is_end_of_stream() {
    assert_eq!(
        next_token(b" \t\r\n", 0, &SeparatorSet::default()),
        Scan::EndOfStream
    );
}

#[test]
fn position_past_end_is_end_of_stream() {
    assert_eq!(next_token(b"abc", 99, &SeparatorSet::default()), Scan::EndOfStream);
}

#[test]
fn empty_set_yields_whole_remainder() {
    let set = SeparatorSet::EMPTY;
    assert_eq!(words(b"abc", &set), vec!["abc"]);
    assert_eq!(words(b"a b\tc", &set), vec!["a b\tc"]);
}

#[test]
fn no_separator_members_yields_one_token() {
    let set = SeparatorSet::from_bytes(b",");
    assert_eq!(words(b"hello world", &set), vec!["hello world"]);
}

// === memchr dispatch ===

#[test]
fn one_two_three_and_many_separators_agree() {
    let text = b"a,b;c:d|e f";
    assert_eq!(words(text, &SeparatorSet::from_bytes(b",")), vec!["a", "b;c:d|e f"]);
    assert_eq!(
        words(text, &SeparatorSet::from_bytes(b",;")),
        vec!["a", "b", "c:d|e f"]
    );
    assert_eq!(
        words(text, &SeparatorSet::from_bytes(b",;:")),
        vec!["a", "b", "c", "d|e f"]
    );
    assert_eq!(
        words(text, &SeparatorSet::from_bytes(b",;:| ")),
        vec!["a", "b", "c", "d", "e", "f"]
    );
}

#[test]
fn find_separator_matches_table_scan() {
    let text = b"xyz\x0Babc";
    for set in [
        SeparatorSet::EMPTY,
        SeparatorSet::from_bytes(b"\x0B"),
        SeparatorSet::from_bytes(b"b\x0B"),
        SeparatorSet::from_bytes(b"cb\x0B"),
        SeparatorSet::default(),
    ] {
        let expected = text.iter().position(|&b| set.contains(b));
        assert_eq!(find_separator(text, &set), expected, "set {set:?}");
    }
}

// === Property tests ===

mod proptest_engine {
    use super::super::{next_token, tokens, Scan};
    use crate::SeparatorSet;
    use proptest::prelude::*;

    fn separator_set() -> impl Strategy<Value = SeparatorSet> {
        prop_oneof![
            Just(SeparatorSet::default()),
            Just(SeparatorSet::EMPTY),
            proptest::collection::vec(any::<u8>(), 0..8)
                .prop_map(|bytes| SeparatorSet::from_bytes(&bytes)),
        ]
    }

    fn text() -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(
            prop_oneof![
                Just(b' '),
                Just(b'\t'),
                Just(b'\n'),
                Just(b','),
                Just(b'a'),
                Just(b'z'),
                any::<u8>(),
            ],
            0..256,
        )
    }

    proptest! {
        #[test]
        fn tokens_and_skipped_runs_reconstruct_input(text in text(), set in separator_set()) {
            let mut rebuilt = Vec::with_capacity(text.len());
            let mut pos = 0;
            loop {
                match next_token(&text, pos, &set) {
                    Scan::Token(token) => {
                        let skipped = &text[pos..token.start()];
                        prop_assert!(skipped.iter().all(|&b| set.contains(b)));
                        prop_assert!(!token.is_empty());
                        prop_assert!(token.bytes().iter().all(|&b| !set.contains(b)));
                        rebuilt.extend_from_slice(skipped);
                        rebuilt.extend_from_slice(token.bytes());
                        pos = token.end();
                    }
                    Scan::EndOfStream => {
                        let trailing = &text[pos..];
                        prop_assert!(trailing.iter().all(|&b| set.contains(b)));
                        rebuilt.extend_from_slice(trailing);
                        break;
                    }
                }
            }
            prop_assert_eq!(rebuilt, text);
        }

        #[test]
        fn text_without_separators_is_one_token(
            text in proptest::collection::vec(b'a'..=b'z', 1..128)
        ) {
            let set = SeparatorSet::default();
            let all: Vec<_> = tokens(&text, &set).collect();
            prop_assert_eq!(all.len(), 1);
            prop_assert_eq!(all[0].bytes(), &text[..]);
        }

        #[test]
        fn tokens_are_maximal(text in text(), set in separator_set()) {
            for token in tokens(&text, &set) {
                if token.start() > 0 {
                    prop_assert!(set.contains(text[token.start() - 1]));
                }
                if token.end() < text.len() {
                    prop_assert!(set.contains(text[token.end()]));
                }
            }
        }
    }
}
