//! Generator (C4): a lazy, restartable, deterministic sequence of retry
//! candidates for a requested insertion slot.
//!
//! Shaped as an explicit state struct driving a multi-call protocol via
//! [`Iterator`]: a small struct of state with methods that advance it one
//! call at a time, rather than building the whole sequence up front.

use std::collections::VecDeque;

use crate::error::FraciError;

/// The midpoint-producing operation a [`KeyCandidates`] sequence drives.
/// Implemented by the string-key and binary-key algebras (see
/// [`crate::factory::StringFraci`] / [`crate::factory::BinaryFraci`]) so the
/// generator itself stays representation-agnostic.
pub trait KeyAlgebra {
    type Key: Clone + Ord;

    /// Deterministic `generateKeyBetween` — the first candidate.
    fn generate_key_between(&self, lo: Option<&Self::Key>, hi: Option<&Self::Key>) -> Result<Self::Key, FraciError>;
}

/// Lazy, restartable candidate sequence for a single `(lo, hi)` slot.
///
/// The first element is the deterministic `generate_key_between(lo, hi)`.
/// Each produced candidate `k` splits its source interval `(a, b)` into two
/// fresh, non-overlapping sub-intervals `(a, k)` and `(k, b)`, which are
/// queued for later attempts (nested halving, breadth-first). Because every
/// subsequent candidate is drawn from a strictly narrower interval than any
/// previously produced key, and no two queued intervals ever overlap, the
/// sequence cannot repeat a candidate — unlike re-splitting around a single
/// rolling midpoint, which can revisit the same sub-interval. The sequence
/// is exhausted (`next` returns `None`) after `max_retries` candidates, or as
/// soon as a candidate would exceed the algebra's configured `max_length`.
///
/// Cloning an untouched [`KeyCandidates`] and calling `next` on both copies
/// reproduces the identical sequence: all state needed to resume is the
/// fields below, none of which are shared or mutated externally.
#[derive(Clone)]
pub struct KeyCandidates<'a, A: KeyAlgebra> {
    algebra: &'a A,
    /// Sub-intervals still to be split, in the order they were queued
    /// (breadth-first: the original `(lo, hi)` first, then its two halves,
    /// then their halves, ...).
    pending: VecDeque<(Option<A::Key>, Option<A::Key>)>,
    attempt: usize,
    max_retries: usize,
    exhausted: bool,
}

impl<'a, A: KeyAlgebra> KeyCandidates<'a, A> {
    /// Builds a restartable candidate sequence for `(lo, hi)` under `algebra`,
    /// bounded to at most `max_retries` candidates.
    pub fn new(algebra: &'a A, lo: Option<A::Key>, hi: Option<A::Key>, max_retries: usize) -> Self {
        let mut pending = VecDeque::with_capacity(max_retries);
        pending.push_back((lo, hi));
        Self {
            algebra,
            pending,
            attempt: 0,
            max_retries,
            exhausted: false,
        }
    }
}

impl<'a, A: KeyAlgebra> Iterator for KeyCandidates<'a, A> {
    type Item = Result<A::Key, FraciError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.attempt >= self.max_retries {
            return None;
        }
        self.attempt += 1;

        // `new` seeds `pending` with one interval and every successful
        // candidate re-queues two more, so the queue never runs dry before
        // `max_retries` is reached.
        let (lo, hi) = self.pending.pop_front().expect("pending interval queue replenished on every success");

        match self.algebra.generate_key_between(lo.as_ref(), hi.as_ref()) {
            Ok(key) => {
                self.pending.push_back((lo, Some(key.clone())));
                self.pending.push_back((Some(key.clone()), hi));
                Some(Ok(key))
            }
            Err(err) => {
                // Terminal: a length-exceeded (or any other) failure means no
                // further candidate can be trusted to lie within (lo, hi).
                self.exhausted = true;
                Some(Err(err))
            }
        }
    }
}
