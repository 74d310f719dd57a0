//! Per-handle separator classification.
//!
//! A [`SeparatorSet`] is a 256-bit membership table indexed by byte value.
//! Classification is one shift and one mask regardless of how many
//! separators are configured.

use std::fmt;

/// Separators a handle starts with unless configured otherwise: space, tab,
/// newline, carriage-return, form-feed and vertical-tab.
pub const DEFAULT_SEPARATORS: &[u8] = b" \t\n\r\x0C\x0B";

/// Set of byte values that delimit tokens.
///
/// The empty set is legal: with no separators the whole remaining buffer
/// reads as a single token.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeparatorSet {
    /// Bit `b % 64` of word `b / 64` is set when byte `b` is a member.
    bits: [u64; 4],
}

/// Size assertion: the table is exactly four words.
const _: () = assert!(std::mem::size_of::<SeparatorSet>() == 32);

impl SeparatorSet {
    /// The set with no members.
    pub const EMPTY: SeparatorSet = SeparatorSet { bits: [0; 4] };

    /// Build a set from raw separator bytes. Duplicates are ignored.
    pub const fn from_bytes(bytes: &[u8]) -> Self {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            bits[(b >> 6) as usize] |= 1u64 << (b & 63);
            i += 1;
        }
        SeparatorSet { bits }
    }

    /// Returns `true` if `byte` is a separator.
    #[inline]
    pub const fn contains(&self, byte: u8) -> bool {
        self.bits[(byte >> 6) as usize] & (1u64 << (byte & 63)) != 0
    }

    /// Add `byte` to the set. Returns `true` if it was not already a member.
    pub fn insert(&mut self, byte: u8) -> bool {
        let was_member = self.contains(byte);
        self.bits[(byte >> 6) as usize] |= 1u64 << (byte & 63);
        !was_member
    }

    /// Remove `byte` from the set. Returns `true` if it was a member.
    pub fn remove(&mut self, byte: u8) -> bool {
        let was_member = self.contains(byte);
        self.bits[(byte >> 6) as usize] &= !(1u64 << (byte & 63));
        was_member
    }

    /// Number of distinct separator bytes.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if no byte is a separator.
    pub fn is_empty(&self) -> bool {
        self.bits == [0; 4]
    }

    /// Members in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |&b| self.contains(b))
    }
}

impl Default for SeparatorSet {
    fn default() -> Self {
        Self::from_bytes(DEFAULT_SEPARATORS)
    }
}

impl FromIterator<u8> for SeparatorSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = SeparatorSet::EMPTY;
        for b in iter {
            set.insert(b);
        }
        set
    }
}

impl fmt::Debug for SeparatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeparatorSet(\"")?;
        for b in self.iter() {
            write!(f, "{}", std::ascii::escape_default(b))?;
        }
        f.write_str("\")")
    }
}
