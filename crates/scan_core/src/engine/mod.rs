//! Skip-separators / take-token step.
//!
//! [`next_token`] is the whole algorithm: skip bytes that are separators,
//! then take the maximal run of bytes that are not. Runs of separators
//! collapse (no empty tokens), a trailing separator run is end-of-stream,
//! and an empty separator set makes the remainder one token.
//!
//! Finding the end of a token uses `memchr` when the set has at most three
//! members (the common single-delimiter configurations) and a table scan
//! otherwise.

use crate::SeparatorSet;

/// Outcome of one tokenizer step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scan<'a> {
    /// A token was found.
    Token(Token<'a>),
    /// Only separators (or nothing) remain after the position.
    EndOfStream,
}

/// A maximal run of non-separator bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    bytes: &'a [u8],
    start: usize,
}

impl<'a> Token<'a> {
    /// Token contents.
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Offset of the first token byte.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset one past the last token byte; the position after this token.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.bytes.len()
    }

    /// Token length in bytes. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`: the engine never produces empty tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Produce the token at or after `pos` in `text`.
///
/// Positions past the end of `text` are treated as the end.
pub fn next_token<'a>(text: &'a [u8], pos: usize, separators: &SeparatorSet) -> Scan<'a> {
    let len = text.len();
    let from = pos.min(len);

    let Some(skipped) = text[from..].iter().position(|&b| !separators.contains(b)) else {
        return Scan::EndOfStream;
    };
    let start = from + skipped;
    let end = find_separator(&text[start..], separators).map_or(len, |i| start + i);

    Scan::Token(Token {
        bytes: &text[start..end],
        start,
    })
}

/// Offset of the first separator in `haystack`.
fn find_separator(haystack: &[u8], separators: &SeparatorSet) -> Option<usize> {
    let mut needles = [0u8; 3];
    let mut count = 0;
    for b in separators.iter() {
        if count == needles.len() {
            return haystack.iter().position(|&c| separators.contains(c));
        }
        needles[count] = b;
        count += 1;
    }

    match count {
        0 => None,
        1 => memchr::memchr(needles[0], haystack),
        2 => memchr::memchr2(needles[0], needles[1], haystack),
        _ => memchr::memchr3(needles[0], needles[1], needles[2], haystack),
    }
}

/// Iterator over every token of `text`, front to back.
pub fn tokens<'a>(text: &'a [u8], separators: &'a SeparatorSet) -> Tokens<'a> {
    Tokens {
        text,
        separators,
        pos: 0,
    }
}

/// Iterator returned by [`tokens`].
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    text: &'a [u8],
    separators: &'a SeparatorSet,
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        match next_token(self.text, self.pos, self.separators) {
            Scan::Token(token) => {
                self.pos = token.end();
                Some(token)
            }
            Scan::EndOfStream => {
                self.pos = self.text.len();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
