//! Byte-string key algebra (C3): the same operation set as [`crate::string_key`]
//! but over raw byte sequences with an implicit, fixed 256-symbol alphabet.
//!
//! A binary key's integer part is a single length-header byte followed by
//! data bytes, big-endian unsigned magnitude. The header byte doubles as
//! the length symbol: headers `0x00..=0x7f` encode negative lengths
//! (`0x80 - header` data bytes), header `0x80` is the single canonical
//! encoding of integer `0` (one data byte, `0x80`), and headers
//! `0x81..=0xff` encode positive lengths (`header - 0x80` data bytes).
//! Header bytes form one contiguous ladder, so unsigned byte-lexicographic
//! comparison of the full key agrees with the mathematical
//! `(length, integer, tail)` order — that's the whole point of the header
//! scheme, so [`Vec<u8>`]'s own `Ord` is the key's order; this module
//! never implements comparison itself.

use crate::error::FraciError;

/// Every data byte's base: a binary key's digit alphabet is the full byte
/// range, so there's no [`crate::alphabet::DigitMap`]/[`crate::alphabet::LengthMap`]
/// to validate or carry around.
const BASE: usize = 256;

/// Header byte for integer `0` — a singleton bucket holding exactly one
/// encoding, `[0x80, 0x80]`, rather than a generic length bucket.
const ZERO_HEADER: u8 = 0x80;

/// A decoded binary key: its header byte, integer data bytes, and
/// fractional `tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBinaryKey {
    pub header: u8,
    pub int_bytes: Vec<u8>,
    pub tail: Vec<u8>,
}

/// A decoded integer part on its own, with no fractional tail.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParsedBinaryInteger {
    pub header: u8,
    pub bytes: Vec<u8>,
}

/// Number of data bytes a header byte's bucket holds. Header `0x80` is a
/// one-element singleton; every other header holds `|header - 0x80|` bytes.
fn byte_count(header: u8) -> usize {
    if header == ZERO_HEADER {
        1
    } else {
        (header as i32 - ZERO_HEADER as i32).unsigned_abs() as usize
    }
}

/// Parses a full binary key into its header, integer data bytes, and
/// fractional tail.
///
/// Fails with `INTERNAL` if the key is empty or the data bytes are
/// truncated.
pub fn parse_key(s: &[u8]) -> Result<ParsedBinaryKey, FraciError> {
    if s.is_empty() {
        return Err(FraciError::Internal("binary key has no header byte".to_string()));
    }
    let header = s[0];
    let n = byte_count(header);
    if s.len() < 1 + n {
        return Err(FraciError::Internal("truncated binary integer part".to_string()));
    }
    Ok(ParsedBinaryKey {
        header,
        int_bytes: s[1..1 + n].to_vec(),
        tail: s[1 + n..].to_vec(),
    })
}

/// Parses a byte slice expected to contain *only* an integer part (no tail).
pub fn parse_integer(s: &[u8]) -> Result<ParsedBinaryInteger, FraciError> {
    let parsed = parse_key(s)?;
    if !parsed.tail.is_empty() {
        return Err(FraciError::Internal(
            "expected a pure integer binary key with no fractional tail".to_string(),
        ));
    }
    Ok(ParsedBinaryInteger { header: parsed.header, bytes: parsed.int_bytes })
}

/// Encodes a decoded integer part back into its header + data bytes.
///
/// `int_bytes` must have exactly [`byte_count`]`(header)` elements.
pub fn encode_integer(header: u8, int_bytes: &[u8]) -> Result<Vec<u8>, FraciError> {
    if int_bytes.len() != byte_count(header) {
        return Err(FraciError::Internal(format!(
            "header {header:#x} expects {} data byte(s), got {}",
            byte_count(header),
            int_bytes.len()
        )));
    }
    let mut out = Vec::with_capacity(1 + int_bytes.len());
    out.push(header);
    out.extend_from_slice(int_bytes);
    Ok(out)
}

/// Most negative representable header, `0x00` (128 data bytes).
pub fn min_header() -> u8 {
    0x00
}

/// Largest representable header, `0xff` (127 data bytes).
pub fn max_header() -> u8 {
    0xff
}

/// The lexicographically smallest canonical binary integer key: header
/// `0x00` followed by the maximum byte repeated `byte_count(0x00)` times.
pub fn smallest_integer() -> Vec<u8> {
    let header = min_header();
    let int_bytes = vec![0xffu8; byte_count(header)];
    encode_integer(header, &int_bytes).expect("min header is always representable")
}

/// The canonical integer `0`: header `0x80` followed by one `0x80` data byte.
pub fn zero_integer() -> Vec<u8> {
    encode_integer(ZERO_HEADER, &[ZERO_HEADER]).expect("zero header is always representable")
}

fn increment_bytes(header: u8, int_bytes: &[u8]) -> Option<(u8, Vec<u8>)> {
    if header == ZERO_HEADER {
        // The zero singleton has no carry chain of its own; its successor
        // is the bottom of the next (positive) bucket.
        let next_header = header.checked_add(1)?;
        return Some((next_header, vec![0x00; byte_count(next_header)]));
    }
    let mut bytes = int_bytes.to_vec();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if !carry {
            break;
        }
        if *b == 0xff {
            *b = 0x00;
        } else {
            *b += 1;
            carry = false;
        }
    }
    if !carry {
        return Some((header, bytes));
    }
    let next_header = header.checked_add(1)?;
    if next_header == ZERO_HEADER {
        Some((ZERO_HEADER, vec![ZERO_HEADER]))
    } else {
        Some((next_header, vec![0x00; byte_count(next_header)]))
    }
}

fn decrement_bytes(header: u8, int_bytes: &[u8]) -> Option<(u8, Vec<u8>)> {
    if header == ZERO_HEADER {
        let prev_header = header.checked_sub(1)?;
        return Some((prev_header, vec![0xff; byte_count(prev_header)]));
    }
    let mut bytes = int_bytes.to_vec();
    let mut borrow = true;
    for b in bytes.iter_mut().rev() {
        if !borrow {
            break;
        }
        if *b == 0x00 {
            *b = 0xff;
        } else {
            *b -= 1;
            borrow = false;
        }
    }
    if !borrow {
        return Some((header, bytes));
    }
    let prev_header = header.checked_sub(1)?;
    if prev_header == ZERO_HEADER {
        Some((ZERO_HEADER, vec![ZERO_HEADER]))
    } else {
        Some((prev_header, vec![0xff; byte_count(prev_header)]))
    }
}

/// Next integer at the same or next header, or `None` past the top of the
/// representable range (header `0xff` already exhausted).
pub fn increment_integer(s: &[u8]) -> Result<Option<Vec<u8>>, FraciError> {
    let parsed = parse_integer(s)?;
    match increment_bytes(parsed.header, &parsed.bytes) {
        Some((header, bytes)) => Ok(Some(encode_integer(header, &bytes)?)),
        None => Ok(None),
    }
}

/// Symmetric to [`increment_integer`].
pub fn decrement_integer(s: &[u8]) -> Result<Option<Vec<u8>>, FraciError> {
    let parsed = parse_integer(s)?;
    match decrement_bytes(parsed.header, &parsed.bytes) {
        Some((header, bytes)) => Ok(Some(encode_integer(header, &bytes)?)),
        None => Ok(None),
    }
}

/// Byte-domain fractional average: produces a byte sequence strictly
/// between `a` and `b`, using `0x00`/`0xff` as the implicit pad/open
/// sentinels in place of [`crate::string_key::midpoint`]'s `0`/`base`.
pub fn midpoint(a: &[u8], b: Option<&[u8]>, max_length: usize) -> Result<Vec<u8>, FraciError> {
    let mut out = Vec::new();
    let mut i = 0usize;
    loop {
        let da = a.get(i).copied().unwrap_or(0x00) as i32;
        let db = match b {
            Some(bs) => bs.get(i).copied().map(|v| v as i32).unwrap_or(BASE as i32),
            None => BASE as i32,
        };
        if da == db {
            push_byte(&mut out, da as u8, max_length)?;
            i += 1;
            continue;
        }
        if da > db {
            return Err(FraciError::Internal("midpoint requires a strictly smaller tail than b".to_string()));
        }
        if db - da >= 2 {
            push_byte(&mut out, ((da + db) / 2) as u8, max_length)?;
            return Ok(out);
        }
        push_byte(&mut out, da as u8, max_length)?;
        let mut j = i + 1;
        loop {
            let da2 = a.get(j).copied().unwrap_or(0x00) as i32;
            if da2 < 0xff {
                push_byte(&mut out, ((da2 + BASE as i32) / 2) as u8, max_length)?;
                return Ok(out);
            }
            push_byte(&mut out, da2 as u8, max_length)?;
            j += 1;
        }
    }
}

fn push_byte(out: &mut Vec<u8>, byte: u8, max_length: usize) -> Result<(), FraciError> {
    out.push(byte);
    if out.len() > max_length {
        return Err(FraciError::LengthExceeded);
    }
    Ok(())
}

fn remaining_budget(max_length: usize, consumed: usize) -> Result<usize, FraciError> {
    max_length.checked_sub(consumed).ok_or(FraciError::LengthExceeded)
}

/// Produces a key strictly between `lo` and `hi` (either bound may be
/// `None`).
pub fn generate_key_between(
    lo: Option<&[u8]>,
    hi: Option<&[u8]>,
    max_length: usize,
) -> Result<Vec<u8>, FraciError> {
    match (lo, hi) {
        (None, None) => Ok(zero_integer()),
        (None, Some(hi)) => {
            let phi = parse_key(hi)?;
            if phi.tail.is_empty() {
                let int_bytes = encode_integer(phi.header, &phi.int_bytes)?;
                decrement_integer(&int_bytes)?.ok_or(FraciError::LengthExceeded)
            } else {
                let int_bytes = encode_integer(phi.header, &phi.int_bytes)?;
                let budget = remaining_budget(max_length, int_bytes.len())?;
                let tail = midpoint(&[], Some(&phi.tail), budget)?;
                Ok([int_bytes, tail].concat())
            }
        }
        (Some(lo), None) => {
            let plo = parse_key(lo)?;
            if plo.tail.is_empty() {
                let int_bytes = encode_integer(plo.header, &plo.int_bytes)?;
                increment_integer(&int_bytes)?.ok_or(FraciError::LengthExceeded)
            } else {
                let int_bytes = encode_integer(plo.header, &plo.int_bytes)?;
                let budget = remaining_budget(max_length, int_bytes.len())?;
                let tail = midpoint(&plo.tail, None, budget)?;
                Ok([int_bytes, tail].concat())
            }
        }
        (Some(lo), Some(hi)) => {
            let plo = parse_key(lo)?;
            let phi = parse_key(hi)?;
            if plo.header == phi.header && plo.int_bytes == phi.int_bytes {
                if plo.tail >= phi.tail {
                    return Err(FraciError::Internal("generate_key_between requires lo < hi".to_string()));
                }
                let int_bytes = encode_integer(plo.header, &plo.int_bytes)?;
                let budget = remaining_budget(max_length, int_bytes.len())?;
                let tail = midpoint(&plo.tail, Some(&phi.tail), budget)?;
                Ok([int_bytes, tail].concat())
            } else if (plo.header, plo.int_bytes.clone()) >= (phi.header, phi.int_bytes.clone()) {
                Err(FraciError::Internal("generate_key_between requires lo < hi".to_string()))
            } else {
                let incremented = increment_bytes(plo.header, &plo.int_bytes);
                let adjacent = match &incremented {
                    Some((header, bytes)) => (*header, bytes.clone()) >= (phi.header, phi.int_bytes.clone()),
                    None => true,
                };
                if !adjacent {
                    let (header, bytes) = incremented.unwrap();
                    encode_integer(header, &bytes)
                } else {
                    let int_bytes = encode_integer(plo.header, &plo.int_bytes)?;
                    let budget = remaining_budget(max_length, int_bytes.len())?;
                    let tail = midpoint(&plo.tail, None, budget)?;
                    Ok([int_bytes, tail].concat())
                }
            }
        }
    }
}

/// Splits `(lo, hi)` into `n` strictly increasing keys via repeated
/// bisection around the midpoint.
pub fn generate_n_keys_between(
    lo: Option<&[u8]>,
    hi: Option<&[u8]>,
    n: usize,
    max_length: usize,
) -> Result<Vec<Vec<u8>>, FraciError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![generate_key_between(lo, hi, max_length)?]);
    }
    let mid = generate_key_between(lo, hi, max_length)?;
    let left_n = n / 2;
    let right_n = n - left_n - 1;
    let mut left = generate_n_keys_between(lo, Some(&mid), left_n, max_length)?;
    let right = generate_n_keys_between(Some(&mid), hi, right_n, max_length)?;
    left.push(mid);
    left.extend(right);
    Ok(left)
}

/// Checks that `k` parses, is in canonical form (no trailing `0x00`), and
/// fits within `max_length`.
pub fn is_valid(k: &[u8], max_length: usize) -> bool {
    if k.len() > max_length {
        return false;
    }
    let Ok(parsed) = parse_key(k) else {
        return false;
    };
    match parsed.tail.last() {
        Some(&last) => last != 0x00,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_between_nothing() {
        let k = generate_key_between(None, None, 50).unwrap();
        assert_eq!(k, zero_integer());
        assert_eq!(k, vec![0x80, 0x80]);
    }

    #[test]
    fn append_increments_integer() {
        let k0 = generate_key_between(None, None, 50).unwrap();
        let k1 = generate_key_between(Some(&k0), None, 50).unwrap();
        assert!(k0 < k1);
        assert_eq!(k1, vec![0x81, 0x00]);
    }

    #[test]
    fn append_widens_header_past_byte_max() {
        let max_one_byte = vec![0x81, 0xff];
        let k = generate_key_between(Some(&max_one_byte), None, 50).unwrap();
        assert_eq!(k, vec![0x82, 0x00, 0x00]);
    }

    #[test]
    fn prepend_decrements_integer() {
        let k0 = generate_key_between(None, None, 50).unwrap();
        let k = generate_key_between(None, Some(&k0), 50).unwrap();
        assert!(k < k0);
        assert_eq!(k, vec![0x7f, 0xff]);
    }

    #[test]
    fn midpoint_of_adjacent_integers_splits_tail() {
        let lo = vec![0x80, 0x80];
        let hi = vec![0x81, 0x00];
        let k = generate_key_between(Some(&lo), Some(&hi), 50).unwrap();
        assert!(lo < k && k < hi);
        assert_eq!(k.len(), 3);
    }

    #[test]
    fn generate_key_between_rejects_equal_bounds() {
        let k = vec![0x80, 0x85];
        let err = generate_key_between(Some(&k), Some(&k), 50).unwrap_err();
        assert!(matches!(err, FraciError::Internal(_)));
    }

    #[test]
    fn generate_key_between_rejects_lo_greater_than_hi() {
        let hi = vec![0x80, 0x85];
        let lo = vec![0x80, 0x85, 0x00];
        let err = generate_key_between(Some(&lo), Some(&hi), 50).unwrap_err();
        assert!(matches!(err, FraciError::Internal(_)));
    }

    #[test]
    fn generate_n_keys_between_is_strictly_increasing() {
        let keys = generate_n_keys_between(None, None, 7, 50).unwrap();
        assert_eq!(keys.len(), 7);
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "{:?}", keys);
        }
    }

    #[test]
    fn byte_order_matches_generated_order() {
        let mut keys = generate_n_keys_between(None, None, 20, 50).unwrap();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        keys.dedup();
        assert_eq!(keys.len(), 20);
    }

    #[test]
    fn is_valid_rejects_trailing_zero_byte_and_excess_length() {
        assert!(is_valid(&[0x80, 0x80], 50));
        assert!(!is_valid(&[0x81, 0x00, 0x00], 50));
        assert!(!is_valid(&[0x80, 0x80], 1));
    }

    #[test]
    fn increment_then_decrement_round_trips() {
        let k0 = generate_key_between(None, None, 50).unwrap();
        let up = increment_integer(&k0).unwrap().unwrap();
        let back = decrement_integer(&up).unwrap().unwrap();
        assert_eq!(back, k0);
    }

    #[test]
    fn smallest_integer_is_below_everything_generated() {
        let smallest = smallest_integer();
        let k = generate_key_between(None, None, 50).unwrap();
        assert!(smallest < k);
    }

    #[test]
    fn length_exceeded_when_budget_too_small() {
        let lo = vec![0x80, 0x80];
        let hi = vec![0x81, 0x00];
        let err = generate_key_between(Some(&lo), Some(&hi), 1).unwrap_err();
        assert_eq!(err, FraciError::LengthExceeded);
    }
}
