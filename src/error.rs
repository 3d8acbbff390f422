//! Closed error model for the key algebra, generator, and factory.
//!
//! [`FraciError`] covers the four error codes used by the pure, in-memory
//! parts of this crate. The store-probe adapter (see [`crate::store`]) wraps
//! a caller-supplied backend error in its own [`StoreError`], since the
//! backend is an external collaborator this crate does not otherwise touch.

use std::fmt;

/// Errors raised by the key algebra, generator, and factory.
///
/// This is a closed set: no other variant is ever constructed by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FraciError {
    /// An alphabet was rejected at factory construction: fewer than four
    /// distinct symbols, or the symbols were not in strictly ascending
    /// code-point order.
    InitializationFailed(String),
    /// A produced key would exceed the configured `maxLength`.
    LengthExceeded,
    /// An externally supplied key failed validation (unknown symbol, empty
    /// integer part, non-canonical trailing digit, or excess length).
    InvalidFractionalIndex(String),
    /// An invariant was violated that should be unreachable if callers
    /// respect the algebra's contract (`lo < hi`, valid keys).
    Internal(String),
}

impl fmt::Display for FraciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FraciError::InitializationFailed(msg) => {
                write!(f, "initialization failed: {msg}")
            }
            FraciError::LengthExceeded => write!(f, "length exceeded"),
            FraciError::InvalidFractionalIndex(msg) => {
                write!(f, "invalid fractional index: {msg}")
            }
            FraciError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for FraciError {}

/// Errors surfaced by the store-probe adapter.
///
/// Distinct from [`FraciError`] because one of its variants carries an
/// opaque backend error the adapter does not interpret — only
/// [`crate::store::IndexStore::is_conflict`] is ever asked to pattern-match
/// on it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError<E: std::error::Error + 'static> {
    /// The algebra rejected an input before any store call was made.
    #[error(transparent)]
    Algebra(#[from] FraciError),
    /// The backing store returned an error. Not inspected by this crate
    /// beyond [`crate::store::IndexStore::is_conflict`].
    #[error("store error: {0}")]
    Backend(#[from] E),
}
