//! Base tables (C1): validate a character alphabet and compile it into the
//! digit/length lookup structures the string-key algebra runs on.
//!
//! An alphabet is a caller-supplied, strictly ascending sequence of distinct
//! `char`s. Two immutable lookup structures are derived from it once, at
//! factory construction, and shared by every key produced under that
//! configuration:
//!
//! - [`DigitMap`]: symbol ↔ integer position `0 .. base-1`.
//! - [`LengthMap`]: signed integer-length ↔ symbol, split at `base / 2`.

use crate::error::FraciError;

/// Minimum number of distinct symbols an alphabet may contain.
///
/// Two symbols are needed to encode the length sign-pair `(+1, -1)`; a third
/// is required for the midpoint "splittable" digit between the two closest
/// fractional neighbors; the fourth provides headroom so increment doesn't
/// immediately overflow at single-digit lengths.
pub const MIN_ALPHABET_LEN: usize = 4;

/// A validated, immutable digit alphabet: symbol ↔ position lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitMap {
    symbols: Vec<char>,
}

impl DigitMap {
    /// Validates `alphabet` and compiles it into a [`DigitMap`].
    pub fn new(alphabet: &str) -> Result<Self, FraciError> {
        let symbols: Vec<char> = alphabet.chars().collect();
        validate_ascending(&symbols)?;
        Ok(Self { symbols })
    }

    /// Number of distinct symbols (the base `B`).
    pub fn base(&self) -> usize {
        self.symbols.len()
    }

    /// The symbol at digit position `index`, or `None` if out of range.
    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// The digit position of `symbol`, or `None` if unknown.
    pub fn position(&self, symbol: char) -> Option<usize> {
        // Alphabets are small (a handful to ~100 symbols); linear scan over
        // an ascending slice plus binary_search is not worth the code size.
        self.symbols.binary_search(&symbol).ok()
    }

    /// The smallest digit symbol (index 0).
    pub fn min_digit(&self) -> char {
        self.symbols[0]
    }

    /// The largest digit symbol (index `base - 1`).
    pub fn max_digit(&self) -> char {
        self.symbols[self.symbols.len() - 1]
    }
}

/// A validated, immutable length alphabet: signed length ↔ symbol lookup.
///
/// The alphabet is split at `⌊B/2⌋`: the first half encodes negative
/// integer-lengths `-⌊B/2⌋ .. -1`, the second half encodes positive lengths
/// `+1 .. +⌈B/2⌉`. Length `0` never occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthMap {
    symbols: Vec<char>,
    split: usize,
}

impl LengthMap {
    /// Validates `alphabet` and compiles it into a [`LengthMap`].
    pub fn new(alphabet: &str) -> Result<Self, FraciError> {
        let symbols: Vec<char> = alphabet.chars().collect();
        validate_ascending(&symbols)?;
        let split = symbols.len() / 2;
        Ok(Self { symbols, split })
    }

    /// Number of distinct symbols (the base `B`).
    pub fn base(&self) -> usize {
        self.symbols.len()
    }

    /// Most negative representable length, `-split`.
    pub fn min_length(&self) -> i64 {
        -(self.split as i64)
    }

    /// Largest representable positive length, `⌈B/2⌉`.
    pub fn max_length(&self) -> i64 {
        (self.symbols.len() - self.split) as i64
    }

    /// The symbol at index `⌊B/2⌋` — the canonical length for integer `0`
    /// (positive length of 1).
    pub fn zero_symbol(&self) -> char {
        self.symbols[self.split]
    }

    /// The signed length `1`, i.e. `zero_symbol`'s index, expressed as a length.
    pub fn zero_length(&self) -> i64 {
        1
    }

    /// Maps a signed, non-zero length to its symbol.
    pub fn symbol_for_length(&self, length: i64) -> Option<char> {
        if length == 0 {
            return None;
        }
        let idx = self.index_for_length(length)?;
        self.symbols.get(idx).copied()
    }

    /// Maps a symbol back to its signed length.
    pub fn length_for_symbol(&self, symbol: char) -> Option<i64> {
        let idx = self.symbols.binary_search(&symbol).ok()?;
        Some(self.length_for_index(idx))
    }

    fn index_for_length(&self, length: i64) -> Option<usize> {
        if length < 0 {
            let offset = (-length) as usize;
            if offset == 0 || offset > self.split {
                return None;
            }
            Some(self.split - offset)
        } else {
            let offset = length as usize;
            if offset == 0 || self.split + offset - 1 >= self.symbols.len() {
                return None;
            }
            Some(self.split + offset - 1)
        }
    }

    fn length_for_index(&self, idx: usize) -> i64 {
        if idx < self.split {
            -((self.split - idx) as i64)
        } else {
            (idx - self.split + 1) as i64
        }
    }

    /// The length whose bucket sorts immediately after `length`'s, or `None`
    /// if `length` is already the largest representable (increment widen
    /// target).
    pub fn next_length(&self, length: i64) -> Option<i64> {
        let idx = self.index_for_length(length)?;
        if idx + 1 >= self.symbols.len() {
            None
        } else {
            Some(self.length_for_index(idx + 1))
        }
    }

    /// The length whose bucket sorts immediately before `length`'s, or
    /// `None` if `length` is already the smallest representable (decrement
    /// widen target).
    pub fn prev_length(&self, length: i64) -> Option<i64> {
        let idx = self.index_for_length(length)?;
        if idx == 0 {
            None
        } else {
            Some(self.length_for_index(idx - 1))
        }
    }
}

fn validate_ascending(symbols: &[char]) -> Result<(), FraciError> {
    if symbols.len() < MIN_ALPHABET_LEN {
        return Err(FraciError::InitializationFailed(format!(
            "alphabet must contain at least {MIN_ALPHABET_LEN} distinct symbols, got {}",
            symbols.len()
        )));
    }
    for pair in symbols.windows(2) {
        if pair[0] >= pair[1] {
            return Err(FraciError::InitializationFailed(
                "alphabet symbols must be strictly ascending by code point".to_string(),
            ));
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pre-defined alphabets (spec §6)
// ─────────────────────────────────────────────────────────────────────────────

/// Decimal digits `0-9`.
pub const BASE10: &str = "0123456789";
/// Lowercase hex digits `0-9a-f`.
pub const BASE16L: &str = "0123456789abcdef";
/// Uppercase hex digits `0-9A-F`.
pub const BASE16U: &str = "0123456789ABCDEF";
/// Lowercase Latin letters `a-z`.
pub const BASE26L: &str = "abcdefghijklmnopqrstuvwxyz";
/// Uppercase Latin letters `A-Z`.
pub const BASE26U: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Lowercase alphanumerics `0-9a-z`.
pub const BASE36L: &str = "0123456789abcdefghijklmnopqrstuvwxyz";
/// Uppercase alphanumerics `0-9A-Z`.
pub const BASE36U: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Both letter cases, uppercase first, no digits (`A-Za-z`).
pub const BASE52: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
/// Digits plus both letter cases (`0-9A-Za-z`).
pub const BASE62: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
/// Base64 symbol set (`+/0-9A-Za-z`), ordered ascending by code point rather
/// than RFC 4648's conventional `A-Za-z0-9+/` layout — alphabets must sort
/// by code point for the total order in §3 to hold.
pub const BASE64: &str =
    "+/0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
/// URL-safe base64 alphabet (`A-Za-z0-9-_`), code-point ascending.
pub const BASE64URL: &str =
    "-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";
/// 88 printable ASCII symbols (the 95 printable symbols, minus quoting
/// characters `"`, `'`, `` ` ``, `\`, space, `^`, and `~`), ascending by code
/// point.
pub const BASE88: &str =
    "!#$%&()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[]_abcdefghijklmnopqrstuvwxyz{|}";
/// All 95 printable ASCII symbols (space through `~`), ascending by code point.
pub const BASE95: &str =
    " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_alphabet() {
        assert!(DigitMap::new("abc").is_err());
    }

    #[test]
    fn rejects_unordered_alphabet() {
        assert!(DigitMap::new("bac0").is_err());
    }

    #[test]
    fn rejects_duplicate_symbols() {
        assert!(DigitMap::new("0011").is_err());
    }

    #[test]
    fn digit_map_round_trips() {
        let map = DigitMap::new(BASE10).unwrap();
        assert_eq!(map.base(), 10);
        for i in 0..10 {
            let sym = map.symbol(i).unwrap();
            assert_eq!(map.position(sym), Some(i));
        }
        assert_eq!(map.min_digit(), '0');
        assert_eq!(map.max_digit(), '9');
    }

    #[test]
    fn length_map_split_and_zero() {
        let map = LengthMap::new(BASE10).unwrap();
        assert_eq!(map.base(), 10);
        assert_eq!(map.min_length(), -5);
        assert_eq!(map.max_length(), 5);
        // split = 5, so zero_symbol is symbols[5] == '5'.
        assert_eq!(map.zero_symbol(), '5');
    }

    #[test]
    fn length_map_round_trips_every_length() {
        let map = LengthMap::new(BASE10).unwrap();
        for length in map.min_length()..=map.max_length() {
            if length == 0 {
                continue;
            }
            let sym = map.symbol_for_length(length).unwrap();
            assert_eq!(map.length_for_symbol(sym), Some(length));
        }
    }

    #[test]
    fn length_map_next_prev_walk_every_bucket() {
        let map = LengthMap::new(BASE10).unwrap();
        let mut length = map.min_length();
        let mut count = 1;
        while let Some(next) = map.next_length(length) {
            assert!(next > length);
            length = next;
            count += 1;
        }
        assert_eq!(length, map.max_length());
        assert_eq!(count, map.base());
        assert_eq!(map.prev_length(map.min_length()), None);
        assert_eq!(map.next_length(map.max_length()), None);
    }

    #[test]
    fn all_predefined_alphabets_are_valid() {
        for alphabet in [
            BASE10, BASE16L, BASE16U, BASE26L, BASE26U, BASE36L, BASE36U, BASE52, BASE62,
            BASE64, BASE64URL, BASE88, BASE95,
        ] {
            assert!(DigitMap::new(alphabet).is_ok(), "{alphabet} should be valid");
            assert!(LengthMap::new(alphabet).is_ok(), "{alphabet} should be valid");
        }
    }
}
