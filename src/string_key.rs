//! Character-string key algebra (C2): encode/decode integer parts, compare,
//! increment, and find the midpoint for keys drawn from a `digitBase` /
//! `lengthBase` alphabet pair.
//!
//! A key's integer part is one length-symbol followed by `|length|` digit
//! symbols; everything after that is its fractional tail. Internally this
//! module works on decoded digit-position arrays (`Vec<usize>`, each entry
//! `0..digits.base()`) and only touches `char`s at the encode/decode
//! boundary, decoding the layout into plain integers before any arithmetic
//! runs.

use crate::alphabet::{DigitMap, LengthMap};
use crate::error::FraciError;

/// A decoded key: its integer part (`length`, `int_digits`) and fractional
/// `tail`, all as digit positions rather than symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    pub length: i64,
    pub int_digits: Vec<usize>,
    pub tail: Vec<usize>,
}

/// A decoded integer part on its own, with no fractional tail.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParsedInteger {
    pub length: i64,
    pub digits: Vec<usize>,
}

/// Parses a full key string into its integer part and fractional tail.
///
/// Fails with `INTERNAL` if the length symbol is unknown, the integer part
/// is truncated, or any symbol (in either part) is not in `digits`.
pub fn parse_key(s: &str, digits: &DigitMap, lengths: &LengthMap) -> Result<ParsedKey, FraciError> {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return Err(FraciError::Internal("key has no length symbol".to_string()));
    }
    let length = lengths
        .length_for_symbol(chars[0])
        .ok_or_else(|| FraciError::Internal(format!("unknown length symbol {:?}", chars[0])))?;
    let n = length.unsigned_abs() as usize;
    if chars.len() < 1 + n {
        return Err(FraciError::Internal("truncated integer part".to_string()));
    }
    let int_digits = positions_of(&chars[1..1 + n], digits)?;
    let tail = positions_of(&chars[1 + n..], digits)?;
    Ok(ParsedKey { length, int_digits, tail })
}

/// Parses a string expected to contain *only* an integer part (no tail).
/// Used by [`increment_integer`] / [`decrement_integer`], which operate on
/// pure integer-part strings.
pub fn parse_integer(s: &str, digits: &DigitMap, lengths: &LengthMap) -> Result<ParsedInteger, FraciError> {
    let parsed = parse_key(s, digits, lengths)?;
    if !parsed.tail.is_empty() {
        return Err(FraciError::Internal(
            "expected a pure integer key with no fractional tail".to_string(),
        ));
    }
    Ok(ParsedInteger { length: parsed.length, digits: parsed.int_digits })
}

fn positions_of(chars: &[char], digits: &DigitMap) -> Result<Vec<usize>, FraciError> {
    chars
        .iter()
        .map(|&c| digits.position(c).ok_or_else(|| FraciError::Internal(format!("unknown digit symbol {c:?}"))))
        .collect()
}

/// Encodes a decoded integer part back into its symbol string.
pub fn encode_integer(length: i64, int_digits: &[usize], digits: &DigitMap, lengths: &LengthMap) -> Result<String, FraciError> {
    let symbol = lengths
        .symbol_for_length(length)
        .ok_or_else(|| FraciError::Internal(format!("length {length} has no symbol")))?;
    let mut s = String::with_capacity(1 + int_digits.len());
    s.push(symbol);
    for &pos in int_digits {
        s.push(digits.symbol(pos).ok_or_else(|| FraciError::Internal(format!("digit position {pos} out of range")))?);
    }
    Ok(s)
}

fn encode_tail(tail: &[usize], digits: &DigitMap) -> String {
    tail.iter().map(|&pos| digits.symbol(pos).expect("tail position always in range")).collect()
}

/// The lexicographically smallest canonical integer key: the most-negative
/// length symbol followed by the maximum digit repeated that many times.
pub fn smallest_integer(digits: &DigitMap, lengths: &LengthMap) -> String {
    let length = lengths.min_length();
    let int_digits = vec![digits.base() - 1; length.unsigned_abs() as usize];
    encode_integer(length, &int_digits, digits, lengths).expect("min_length is always representable")
}

/// The canonical integer `0`: the zero-length symbol followed by one minimum
/// digit.
pub fn zero_integer(digits: &DigitMap, lengths: &LengthMap) -> String {
    encode_integer(lengths.zero_length(), &[0], digits, lengths).expect("zero length is always representable")
}

fn increment_digits(length: i64, int_digits: &[usize], base: usize, lengths: &LengthMap) -> Option<(i64, Vec<usize>)> {
    let mut digits = int_digits.to_vec();
    let mut carry = true;
    for d in digits.iter_mut().rev() {
        if !carry {
            break;
        }
        if *d + 1 == base {
            *d = 0;
        } else {
            *d += 1;
            carry = false;
        }
    }
    if !carry {
        return Some((length, digits));
    }
    let widened = lengths.next_length(length)?;
    Some((widened, vec![0; widened.unsigned_abs() as usize]))
}

fn decrement_digits(length: i64, int_digits: &[usize], base: usize, lengths: &LengthMap) -> Option<(i64, Vec<usize>)> {
    let mut digits = int_digits.to_vec();
    let mut borrow = true;
    for d in digits.iter_mut().rev() {
        if !borrow {
            break;
        }
        if *d == 0 {
            *d = base - 1;
        } else {
            *d -= 1;
            borrow = false;
        }
    }
    if !borrow {
        return Some((length, digits));
    }
    let widened = lengths.prev_length(length)?;
    Some((widened, vec![base - 1; widened.unsigned_abs() as usize]))
}

/// Next integer at the same or next length, or `None` at the top of the
/// representable range.
///
/// On overflow (digits were all at the base's maximum) this widens to the
/// next length bucket, filled with the minimum digit — the bucket's smallest
/// member sorts immediately after the exhausted bucket's largest. The
/// spec's corner case of widening across the sign boundary (the length
/// alphabet never encodes `0`) is resolved the same way, for consistency;
/// see `DESIGN.md`.
pub fn increment_integer(s: &str, digits: &DigitMap, lengths: &LengthMap) -> Result<Option<String>, FraciError> {
    let parsed = parse_integer(s, digits, lengths)?;
    match increment_digits(parsed.length, &parsed.digits, digits.base(), lengths) {
        Some((length, int_digits)) => Ok(Some(encode_integer(length, &int_digits, digits, lengths)?)),
        None => Ok(None),
    }
}

/// Symmetric to [`increment_integer`]: widens on underflow, filled with the
/// maximum digit.
pub fn decrement_integer(s: &str, digits: &DigitMap, lengths: &LengthMap) -> Result<Option<String>, FraciError> {
    let parsed = parse_integer(s, digits, lengths)?;
    match decrement_digits(parsed.length, &parsed.digits, digits.base(), lengths) {
        Some((length, int_digits)) => Ok(Some(encode_integer(length, &int_digits, digits, lengths)?)),
        None => Ok(None),
    }
}

/// Fractional base-`B` average: produces a digit sequence strictly between
/// `a` and `b`.
///
/// `a` is padded with the minimum digit past its end. `b` is padded with an
/// "open" sentinel value of `base` (one past the largest real digit) past
/// its end, or throughout if `b` is `None` ("no upper bound") — using `base`
/// rather than the largest real digit is what makes `⌊(0+base)/2⌋` land on
/// the true middle digit for an unbounded side, matching a plain decimal
/// intuition (`midpoint(0.4, ∞) == 0.45`, not `0.44`). The sentinel is safe
/// even when `b` does have more real digits past the divergence point:
/// those digits can only push `b`'s true value up, so treating the rest of
/// `b` as unbounded still yields a result strictly below the real `b`.
pub fn midpoint(base: usize, a: &[usize], b: Option<&[usize]>, max_length: usize) -> Result<Vec<usize>, FraciError> {
    let max_digit = base - 1;
    let open = base;
    let mut out = Vec::new();
    let mut i = 0usize;
    loop {
        let da = a.get(i).copied().unwrap_or(0);
        let db = match b {
            Some(bs) => bs.get(i).copied().unwrap_or(open),
            None => open,
        };
        if da == db {
            push_digit(&mut out, da, max_length)?;
            i += 1;
            continue;
        }
        if da > db {
            return Err(FraciError::Internal("midpoint requires a strictly smaller tail than b".to_string()));
        }
        if db - da >= 2 {
            push_digit(&mut out, (da + db) / 2, max_length)?;
            return Ok(out);
        }
        // db == da + 1: no integer digit fits between them at this position.
        push_digit(&mut out, da, max_length)?;
        let mut j = i + 1;
        loop {
            let da2 = a.get(j).copied().unwrap_or(0);
            if da2 < max_digit {
                push_digit(&mut out, (da2 + open) / 2, max_length)?;
                return Ok(out);
            }
            push_digit(&mut out, da2, max_length)?;
            j += 1;
        }
    }
}

fn push_digit(out: &mut Vec<usize>, digit: usize, max_length: usize) -> Result<(), FraciError> {
    out.push(digit);
    if out.len() > max_length {
        return Err(FraciError::LengthExceeded);
    }
    Ok(())
}

fn remaining_budget(max_length: usize, consumed: usize) -> Result<usize, FraciError> {
    max_length.checked_sub(consumed).ok_or(FraciError::LengthExceeded)
}

/// Produces a key strictly between `lo` and `hi` (either bound may be
/// `None`, meaning "no bound on that side").
///
/// Fails with `LENGTH_EXCEEDED` if the result would exceed `max_length`, or
/// `INTERNAL` if `lo >= hi`.
pub fn generate_key_between(
    lo: Option<&str>,
    hi: Option<&str>,
    digits: &DigitMap,
    lengths: &LengthMap,
    max_length: usize,
) -> Result<String, FraciError> {
    match (lo, hi) {
        (None, None) => Ok(zero_integer(digits, lengths)),
        (None, Some(hi)) => {
            let phi = parse_key(hi, digits, lengths)?;
            if phi.tail.is_empty() {
                let int_str = encode_integer(phi.length, &phi.int_digits, digits, lengths)?;
                decrement_integer(&int_str, digits, lengths)?.ok_or(FraciError::LengthExceeded)
            } else {
                let int_str = encode_integer(phi.length, &phi.int_digits, digits, lengths)?;
                let budget = remaining_budget(max_length, int_str.chars().count())?;
                let tail = midpoint(digits.base(), &[], Some(&phi.tail), budget)?;
                Ok(format!("{int_str}{}", encode_tail(&tail, digits)))
            }
        }
        (Some(lo), None) => {
            let plo = parse_key(lo, digits, lengths)?;
            if plo.tail.is_empty() {
                let int_str = encode_integer(plo.length, &plo.int_digits, digits, lengths)?;
                increment_integer(&int_str, digits, lengths)?.ok_or(FraciError::LengthExceeded)
            } else {
                let int_str = encode_integer(plo.length, &plo.int_digits, digits, lengths)?;
                let budget = remaining_budget(max_length, int_str.chars().count())?;
                let tail = midpoint(digits.base(), &plo.tail, None, budget)?;
                Ok(format!("{int_str}{}", encode_tail(&tail, digits)))
            }
        }
        (Some(lo), Some(hi)) => {
            let plo = parse_key(lo, digits, lengths)?;
            let phi = parse_key(hi, digits, lengths)?;
            if plo.length == phi.length && plo.int_digits == phi.int_digits {
                if plo.tail >= phi.tail {
                    return Err(FraciError::Internal("generate_key_between requires lo < hi".to_string()));
                }
                let int_str = encode_integer(plo.length, &plo.int_digits, digits, lengths)?;
                let budget = remaining_budget(max_length, int_str.chars().count())?;
                let tail = midpoint(digits.base(), &plo.tail, Some(&phi.tail), budget)?;
                Ok(format!("{int_str}{}", encode_tail(&tail, digits)))
            } else if (plo.length, plo.int_digits.clone()) >= (phi.length, phi.int_digits.clone()) {
                Err(FraciError::Internal("generate_key_between requires lo < hi".to_string()))
            } else {
                let incremented = increment_digits(plo.length, &plo.int_digits, digits.base(), lengths);
                let adjacent = match &incremented {
                    Some((len, digs)) => (*len, digs.clone()) >= (phi.length, phi.int_digits.clone()),
                    None => true,
                };
                if !adjacent {
                    let (len, digs) = incremented.unwrap();
                    encode_integer(len, &digs, digits, lengths)
                } else {
                    let int_str = encode_integer(plo.length, &plo.int_digits, digits, lengths)?;
                    let budget = remaining_budget(max_length, int_str.chars().count())?;
                    let tail = midpoint(digits.base(), &plo.tail, None, budget)?;
                    Ok(format!("{int_str}{}", encode_tail(&tail, digits)))
                }
            }
        }
    }
}

/// Splits `(lo, hi)` into `n` strictly increasing keys via repeated
/// bisection around the midpoint, to minimise depth growth compared to
/// walking the interval end-to-end.
pub fn generate_n_keys_between(
    lo: Option<&str>,
    hi: Option<&str>,
    n: usize,
    digits: &DigitMap,
    lengths: &LengthMap,
    max_length: usize,
) -> Result<Vec<String>, FraciError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![generate_key_between(lo, hi, digits, lengths, max_length)?]);
    }
    let mid = generate_key_between(lo, hi, digits, lengths, max_length)?;
    let left_n = n / 2;
    let right_n = n - left_n - 1;
    let mut left = generate_n_keys_between(lo, Some(&mid), left_n, digits, lengths, max_length)?;
    let right = generate_n_keys_between(Some(&mid), hi, right_n, digits, lengths, max_length)?;
    left.push(mid);
    left.extend(right);
    Ok(left)
}

/// Checks that `k` parses, is in canonical form (no trailing minimum
/// digit), and fits within `max_length`.
pub fn is_valid(k: &str, digits: &DigitMap, lengths: &LengthMap, max_length: usize) -> bool {
    if k.chars().count() > max_length {
        return false;
    }
    let Ok(parsed) = parse_key(k, digits, lengths) else {
        return false;
    };
    match parsed.tail.last() {
        Some(&last) => last != 0,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::BASE10;

    fn maps() -> (DigitMap, LengthMap) {
        (DigitMap::new(BASE10).unwrap(), LengthMap::new(BASE10).unwrap())
    }

    #[test]
    fn zero_between_nothing() {
        let (d, l) = maps();
        let k = generate_key_between(None, None, &d, &l, 50).unwrap();
        assert_eq!(k, "50");
    }

    #[test]
    fn append_increments_integer() {
        let (d, l) = maps();
        let k = generate_key_between(Some("50"), None, &d, &l, 50).unwrap();
        assert_eq!(k, "51");
    }

    #[test]
    fn append_widens_length_past_single_digit_max() {
        let (d, l) = maps();
        let k = generate_key_between(Some("59"), None, &d, &l, 50).unwrap();
        // length widens from +1 (one digit) to +2 (two digits), filled with
        // the minimum digit at the entry point.
        assert_eq!(k, "600");
    }

    #[test]
    fn prepend_decrements_integer() {
        let (d, l) = maps();
        let k = generate_key_between(None, Some("50"), &d, &l, 50).unwrap();
        assert_eq!(k, "49");
    }

    #[test]
    fn midpoint_of_adjacent_integers_splits_tail() {
        let (d, l) = maps();
        let k = generate_key_between(Some("50"), Some("51"), &d, &l, 50).unwrap();
        assert_eq!(k, "505");
        let k2 = generate_key_between(Some("50"), Some(&k), &d, &l, 50).unwrap();
        assert_eq!(k2, "502");
    }

    #[test]
    fn generate_key_between_rejects_equal_bounds() {
        let (d, l) = maps();
        let err = generate_key_between(Some("505"), Some("505"), &d, &l, 50).unwrap_err();
        assert!(matches!(err, FraciError::Internal(_)));
    }

    #[test]
    fn generate_key_between_rejects_lo_greater_than_hi() {
        let (d, l) = maps();
        let err = generate_key_between(Some("5055"), Some("505"), &d, &l, 50).unwrap_err();
        assert!(matches!(err, FraciError::Internal(_)));
    }

    #[test]
    fn generate_n_keys_between_is_strictly_increasing() {
        let (d, l) = maps();
        let keys = generate_n_keys_between(None, None, 5, &d, &l, 50).unwrap();
        assert_eq!(keys.len(), 5);
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "{:?}", keys);
        }
    }

    #[test]
    fn is_valid_rejects_trailing_minimum_digit() {
        let (d, l) = maps();
        assert!(is_valid("50", &d, &l, 50));
        assert!(!is_valid("500", &d, &l, 50));
    }

    #[test]
    fn is_valid_rejects_unknown_symbol_and_excess_length() {
        let (d, l) = maps();
        assert!(!is_valid("5x", &d, &l, 50));
        assert!(!is_valid("50", &d, &l, 1));
    }

    #[test]
    fn increment_then_decrement_round_trips() {
        let (d, l) = maps();
        let up = increment_integer("50", &d, &l).unwrap().unwrap();
        let back = decrement_integer(&up, &d, &l).unwrap().unwrap();
        assert_eq!(back, "50");
    }

    #[test]
    fn smallest_integer_is_below_everything_generated() {
        let (d, l) = maps();
        let smallest = smallest_integer(&d, &l);
        let k = generate_key_between(None, None, &d, &l, 50).unwrap();
        assert!(smallest < k);
    }

    #[test]
    fn length_exceeded_when_budget_too_small() {
        let (d, l) = maps();
        let err = generate_key_between(Some("50"), Some("51"), &d, &l, 1).unwrap_err();
        assert_eq!(err, FraciError::LengthExceeded);
    }
}
