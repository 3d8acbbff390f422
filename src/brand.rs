//! Branded types (C8): a compile-time phantom tag attached to every key a
//! handle produces, so keys drawn from different columns/alphabets can't be
//! mixed up at the type level even though at runtime they're both just a
//! `String` or `Vec<u8>`.
//!
//! Mirrors the "thin wrapper struct with an unexported marker field" the
//! Design Notes describe for untyped targets, expressed with
//! [`PhantomData`] — Rust's idiom for a zero-size compile-time-only tag,
//! the same shape the teacher uses for its zero-sized stream markers.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A character-string key, tagged with a caller-chosen `Brand` marker type.
///
/// `Brand` carries no runtime value — it exists purely so two
/// [`StringKey<BrandA>`] / [`StringKey<BrandB>`] values are distinct types,
/// preventing a key minted for one column from being passed where a key
/// from another column is expected.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StringKey<Brand> {
    value: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    _brand: PhantomData<fn() -> Brand>,
}

/// A binary key, tagged with a caller-chosen `Brand` marker type. Same
/// purpose as [`StringKey`], over raw bytes instead of `char`s.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BinaryKey<Brand> {
    value: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip))]
    _brand: PhantomData<fn() -> Brand>,
}

macro_rules! impl_branded_key {
    ($name:ident, $inner:ty, $borrowed:ty) => {
        impl<Brand> $name<Brand> {
            pub(crate) fn new(value: $inner) -> Self {
                Self { value, _brand: PhantomData }
            }

            /// Borrows the underlying value with the brand erased.
            pub fn as_raw(&self) -> &$borrowed {
                &self.value
            }

            /// Consumes the key, discarding the brand.
            pub fn into_raw(self) -> $inner {
                self.value
            }
        }

        impl<Brand> Clone for $name<Brand> {
            fn clone(&self) -> Self {
                Self::new(self.value.clone())
            }
        }

        impl<Brand> fmt::Debug for $name<Brand> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.value).finish()
            }
        }

        impl<Brand> PartialEq for $name<Brand> {
            fn eq(&self, other: &Self) -> bool {
                self.value == other.value
            }
        }
        impl<Brand> Eq for $name<Brand> {}

        impl<Brand> PartialOrd for $name<Brand> {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }
        impl<Brand> Ord for $name<Brand> {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.value.cmp(&other.value)
            }
        }

        impl<Brand> Hash for $name<Brand> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.value.hash(state);
            }
        }

        impl<Brand> AsRef<$borrowed> for $name<Brand> {
            fn as_ref(&self) -> &$borrowed {
                &self.value
            }
        }
    };
}

impl_branded_key!(StringKey, String, str);
impl_branded_key!(BinaryKey, Vec<u8>, [u8]);
