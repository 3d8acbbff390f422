//! Factory / configuration (C5): binds an algebra and its limits into an
//! immutable handle. Builders validate once at construction, the way the
//! teacher's [`Preferences`](crate) struct is a plain, documented-default
//! configuration value that is never mutated after it's built.

use std::marker::PhantomData;

use crate::alphabet::{DigitMap, LengthMap};
use crate::brand::{BinaryKey, StringKey};
use crate::error::FraciError;
use crate::generator::{KeyAlgebra, KeyCandidates};
use crate::{binary_key, string_key};

/// Hard upper bound on a produced key's symbol count, absent an explicit
/// `max_length` on the builder.
pub const DEFAULT_MAX_LENGTH: usize = 50;

/// Hard upper bound on a generator's candidate count, absent an explicit
/// `max_retries` on the builder.
pub const DEFAULT_MAX_RETRIES: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// String-keyed handle
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable, reusable handle binding a `digitBase`/`lengthBase` alphabet
/// pair and size limits, producing keys tagged with `Brand`.
///
/// Build one with [`StringFraciBuilder`]; `Brand` defaults to `()`, meaning
/// "untagged", for callers who don't need compile-time column separation.
pub struct StringFraci<Brand = ()> {
    digits: DigitMap,
    lengths: LengthMap,
    max_length: usize,
    max_retries: usize,
    _brand: PhantomData<fn() -> Brand>,
}

/// Builds a [`StringFraci`] handle, validating the alphabets once.
#[derive(Debug, Clone)]
pub struct StringFraciBuilder<Brand = ()> {
    digit_base: String,
    length_base: String,
    max_length: usize,
    max_retries: usize,
    _brand: PhantomData<fn() -> Brand>,
}

impl<Brand> StringFraciBuilder<Brand> {
    /// Starts a builder for the required `digitBase` / `lengthBase` alphabet
    /// pair, with `maxLength` and `maxRetries` at their spec defaults.
    pub fn new(digit_base: impl Into<String>, length_base: impl Into<String>) -> Self {
        Self {
            digit_base: digit_base.into(),
            length_base: length_base.into(),
            max_length: DEFAULT_MAX_LENGTH,
            max_retries: DEFAULT_MAX_RETRIES,
            _brand: PhantomData,
        }
    }

    /// Overrides the hard upper bound on a produced key's symbol count.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Overrides the hard upper bound on a generator's candidate count.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Re-tags the handle this builder produces with a different `Brand`
    /// marker type, without touching any other configuration.
    pub fn brand<NewBrand>(self) -> StringFraciBuilder<NewBrand> {
        StringFraciBuilder {
            digit_base: self.digit_base,
            length_base: self.length_base,
            max_length: self.max_length,
            max_retries: self.max_retries,
            _brand: PhantomData,
        }
    }

    /// Validates both alphabets (C1) and returns the immutable handle.
    pub fn build(self) -> Result<StringFraci<Brand>, FraciError> {
        let digits = DigitMap::new(&self.digit_base)?;
        let lengths = LengthMap::new(&self.length_base)?;
        Ok(StringFraci {
            digits,
            lengths,
            max_length: self.max_length,
            max_retries: self.max_retries,
            _brand: PhantomData,
        })
    }
}

impl<Brand> KeyAlgebra for StringFraci<Brand> {
    type Key = StringKey<Brand>;

    fn generate_key_between(
        &self,
        lo: Option<&StringKey<Brand>>,
        hi: Option<&StringKey<Brand>>,
    ) -> Result<StringKey<Brand>, FraciError> {
        let s = string_key::generate_key_between(
            lo.map(|k| k.as_raw()),
            hi.map(|k| k.as_raw()),
            &self.digits,
            &self.lengths,
            self.max_length,
        )?;
        Ok(StringKey::new(s))
    }
}

impl<Brand> StringFraci<Brand> {
    /// Configured hard upper bound on a produced key's symbol count.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Configured hard upper bound on a generator's candidate count.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Lazy, restartable retry-candidate sequence for the slot strictly
    /// between `lo` and `hi` (either may be absent). The first element is
    /// the deterministic single-shot key; callers retry with successive
    /// elements on a store unique-constraint violation (see
    /// [`crate::store`]).
    pub fn generate_key_between(
        &self,
        lo: Option<&StringKey<Brand>>,
        hi: Option<&StringKey<Brand>>,
    ) -> KeyCandidates<'_, Self> {
        KeyCandidates::new(self, lo.cloned(), hi.cloned(), self.max_retries)
    }

    /// Lazy, restartable sequence of `n`-key batches strictly between `lo`
    /// and `hi`. Each batch bisects the interval around a different
    /// top-level pivot drawn from the same retry sequence
    /// [`generate_key_between`](Self::generate_key_between) would produce,
    /// so a caller whose whole batch collides can retry with an
    /// entirely different split of the interval.
    pub fn generate_n_keys_between(
        &self,
        lo: Option<&StringKey<Brand>>,
        hi: Option<&StringKey<Brand>>,
        n: usize,
    ) -> NKeysCandidates<'_, Self> {
        NKeysCandidates::new(self, lo.cloned(), hi.cloned(), n, self.max_retries)
    }

    /// Checks that `k` parses, is canonical, and fits within `max_length`.
    pub fn is_valid(&self, k: &StringKey<Brand>) -> bool {
        string_key::is_valid(k.as_raw(), &self.digits, &self.lengths, self.max_length)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Binary-keyed handle
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable, reusable handle over the fixed 256-symbol byte alphabet and
/// size limits, producing keys tagged with `Brand`.
pub struct BinaryFraci<Brand = ()> {
    max_length: usize,
    max_retries: usize,
    _brand: PhantomData<fn() -> Brand>,
}

/// Builds a [`BinaryFraci`] handle. There is no alphabet to validate — the
/// byte algebra's "alphabet" is the full `0x00..=0xff` range, implicit.
#[derive(Debug, Clone)]
pub struct BinaryFraciBuilder<Brand = ()> {
    max_length: usize,
    max_retries: usize,
    _brand: PhantomData<fn() -> Brand>,
}

impl<Brand> Default for BinaryFraciBuilder<Brand> {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            max_retries: DEFAULT_MAX_RETRIES,
            _brand: PhantomData,
        }
    }
}

impl<Brand> BinaryFraciBuilder<Brand> {
    /// Starts a builder with `maxLength` and `maxRetries` at their spec
    /// defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the hard upper bound on a produced key's byte count.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Overrides the hard upper bound on a generator's candidate count.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Re-tags the handle this builder produces with a different `Brand`
    /// marker type.
    pub fn brand<NewBrand>(self) -> BinaryFraciBuilder<NewBrand> {
        BinaryFraciBuilder {
            max_length: self.max_length,
            max_retries: self.max_retries,
            _brand: PhantomData,
        }
    }

    /// Returns the immutable handle. Infallible — there is no alphabet to
    /// reject — kept as `Result` so callers can treat both builders
    /// uniformly.
    pub fn build(self) -> Result<BinaryFraci<Brand>, FraciError> {
        Ok(BinaryFraci {
            max_length: self.max_length,
            max_retries: self.max_retries,
            _brand: PhantomData,
        })
    }
}

impl<Brand> KeyAlgebra for BinaryFraci<Brand> {
    type Key = BinaryKey<Brand>;

    fn generate_key_between(
        &self,
        lo: Option<&BinaryKey<Brand>>,
        hi: Option<&BinaryKey<Brand>>,
    ) -> Result<BinaryKey<Brand>, FraciError> {
        let bytes = binary_key::generate_key_between(
            lo.map(|k| k.as_raw().as_slice()),
            hi.map(|k| k.as_raw().as_slice()),
            self.max_length,
        )?;
        Ok(BinaryKey::new(bytes))
    }
}

impl<Brand> BinaryFraci<Brand> {
    /// Configured hard upper bound on a produced key's byte count.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Configured hard upper bound on a generator's candidate count.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// See [`StringFraci::generate_key_between`].
    pub fn generate_key_between(
        &self,
        lo: Option<&BinaryKey<Brand>>,
        hi: Option<&BinaryKey<Brand>>,
    ) -> KeyCandidates<'_, Self> {
        KeyCandidates::new(self, lo.cloned(), hi.cloned(), self.max_retries)
    }

    /// See [`StringFraci::generate_n_keys_between`].
    pub fn generate_n_keys_between(
        &self,
        lo: Option<&BinaryKey<Brand>>,
        hi: Option<&BinaryKey<Brand>>,
        n: usize,
    ) -> NKeysCandidates<'_, Self> {
        NKeysCandidates::new(self, lo.cloned(), hi.cloned(), n, self.max_retries)
    }

    /// Checks that `k` parses, is canonical, and fits within `max_length`.
    pub fn is_valid(&self, k: &BinaryKey<Brand>) -> bool {
        binary_key::is_valid(k.as_raw(), self.max_length)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// N-key batches, retried via the same pivot sequence as `generate_key_between`
// ─────────────────────────────────────────────────────────────────────────────

/// Lazy, restartable sequence of `n`-key batches. See
/// [`StringFraci::generate_n_keys_between`] /
/// [`BinaryFraci::generate_n_keys_between`].
pub struct NKeysCandidates<'a, A: KeyAlgebra> {
    algebra: &'a A,
    lo: Option<A::Key>,
    hi: Option<A::Key>,
    n: usize,
    pivots: KeyCandidates<'a, A>,
}

impl<'a, A: KeyAlgebra> NKeysCandidates<'a, A> {
    fn new(algebra: &'a A, lo: Option<A::Key>, hi: Option<A::Key>, n: usize, max_retries: usize) -> Self {
        let pivots = KeyCandidates::new(algebra, lo.clone(), hi.clone(), max_retries);
        Self { algebra, lo, hi, n, pivots }
    }

    fn batch_around(&self, pivot: A::Key) -> Result<Vec<A::Key>, FraciError> {
        bisect(self.algebra, self.lo.as_ref(), self.hi.as_ref(), &pivot, self.n)
    }
}

/// Splits `n` keys strictly between `lo` and `hi` around the already-chosen
/// `pivot`, recursing with the algebra's plain (non-retrying)
/// `generate_key_between` on both halves — mirrors `spec.md` §4.2's
/// bisection, generalized to accept an externally supplied first split so a
/// retried top-level pivot still yields a fully deterministic batch.
fn bisect<A: KeyAlgebra>(
    algebra: &A,
    lo: Option<&A::Key>,
    hi: Option<&A::Key>,
    pivot: &A::Key,
    n: usize,
) -> Result<Vec<A::Key>, FraciError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![pivot.clone()]);
    }
    let left_n = n / 2;
    let right_n = n - left_n - 1;
    let mut left = bisect_plain(algebra, lo, Some(pivot), left_n)?;
    let right = bisect_plain(algebra, Some(pivot), hi, right_n)?;
    left.push(pivot.clone());
    left.extend(right);
    Ok(left)
}

fn bisect_plain<A: KeyAlgebra>(algebra: &A, lo: Option<&A::Key>, hi: Option<&A::Key>, n: usize) -> Result<Vec<A::Key>, FraciError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let mid = algebra.generate_key_between(lo, hi)?;
    if n == 1 {
        return Ok(vec![mid]);
    }
    let left_n = n / 2;
    let right_n = n - left_n - 1;
    let mut left = bisect_plain(algebra, lo, Some(&mid), left_n)?;
    let right = bisect_plain(algebra, Some(&mid), hi, right_n)?;
    left.push(mid);
    left.extend(right);
    Ok(left)
}

impl<'a, A: KeyAlgebra> Iterator for NKeysCandidates<'a, A> {
    type Item = Result<Vec<A::Key>, FraciError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.n == 0 {
            return None;
        }
        match self.pivots.next()? {
            Ok(pivot) => Some(self.batch_around(pivot)),
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::BASE10;

    fn handle() -> StringFraci {
        StringFraciBuilder::new(BASE10, BASE10).build().unwrap()
    }

    #[test]
    fn builder_rejects_bad_alphabet() {
        let err = StringFraciBuilder::<()>::new("ab", BASE10).build().unwrap_err();
        assert!(matches!(err, FraciError::InitializationFailed(_)));
    }

    #[test]
    fn handle_produces_zero_between_nothing() {
        let h = handle();
        let mut candidates = h.generate_key_between(None, None);
        let k = candidates.next().unwrap().unwrap();
        assert_eq!(k.as_raw(), "50");
    }

    #[test]
    fn handle_respects_configured_max_length() {
        let h = StringFraciBuilder::<()>::new(BASE10, BASE10).max_length(2).build().unwrap();
        let lo = StringKey::<()>::new("50".to_string());
        let hi = StringKey::<()>::new("51".to_string());
        let mut candidates = h.generate_key_between(Some(&lo), Some(&hi));
        assert!(candidates.next().unwrap().is_err());
    }

    #[test]
    fn is_valid_round_trips_generated_keys() {
        let h = handle();
        let k = h.generate_key_between(None, None).next().unwrap().unwrap();
        assert!(h.is_valid(&k));
    }

    #[test]
    fn n_keys_batch_is_strictly_increasing_and_within_bounds() {
        let h = handle();
        let batch = h.generate_n_keys_between(None, None, 5).next().unwrap().unwrap();
        assert_eq!(batch.len(), 5);
        for pair in batch.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn n_keys_batches_are_restartable() {
        let h = handle();
        let b1: Vec<_> = h
            .generate_n_keys_between(None, None, 3)
            .take(2)
            .map(|r| r.unwrap())
            .collect();
        let b2: Vec<_> = h
            .generate_n_keys_between(None, None, 3)
            .take(2)
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(b1, b2);
    }

    #[test]
    fn binary_handle_produces_canonical_zero() {
        let h: BinaryFraci = BinaryFraciBuilder::new().build().unwrap();
        let k = h.generate_key_between(None, None).next().unwrap().unwrap();
        assert_eq!(k.as_raw(), &[0x80, 0x80]);
    }
}
