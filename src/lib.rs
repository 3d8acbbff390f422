//! `fraci`: fractional indexing — ordered keys that can be inserted between
//! any two existing neighbors without renumbering, for collaborative
//! ordering (lists, kanban boards, tree siblings) backed by a single
//! indexed database column.
//!
//! # Layout
//!
//! - [`alphabet`] (C1) — validated digit/length lookup tables and the
//!   pre-defined alphabet constants.
//! - [`string_key`] (C2) / [`binary_key`] (C3) — the key algebra over
//!   character strings and raw bytes, respectively.
//! - [`generator`] (C4) — the lazy, restartable retry-candidate sequence.
//! - [`factory`] (C5) — [`StringFraci`](factory::StringFraci) /
//!   [`BinaryFraci`](factory::BinaryFraci) handles, built from
//!   [`StringFraciBuilder`](factory::StringFraciBuilder) /
//!   [`BinaryFraciBuilder`](factory::BinaryFraciBuilder).
//! - [`store`] (C6) — the store-probe adapter, generic over an external
//!   ordered backend.
//! - [`brand`] (C8) — phantom-tagged key newtypes.
//! - [`error`] (C7) — the closed error model.
//!
//! # Example
//!
//! ```
//! use fraci::alphabet::BASE62;
//! use fraci::factory::StringFraciBuilder;
//!
//! let fraci = StringFraciBuilder::<()>::new(BASE62, BASE62).build().unwrap();
//! let first = fraci.generate_key_between(None, None).next().unwrap().unwrap();
//! let second = fraci.generate_key_between(Some(&first), None).next().unwrap().unwrap();
//! assert!(first < second);
//! ```

pub mod alphabet;
pub mod binary_key;
pub mod brand;
pub mod error;
pub mod factory;
pub mod generator;
pub mod store;
pub mod string_key;

pub use brand::{BinaryKey, StringKey};
pub use error::{FraciError, StoreError};
pub use factory::{BinaryFraci, BinaryFraciBuilder, StringFraci, StringFraciBuilder};
pub use generator::{KeyAlgebra, KeyCandidates};
