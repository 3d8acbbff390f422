//! Store-probe adapter (C6): given a group/cursor, consult an external
//! ordered store for the pair of neighbor keys bracketing a requested
//! insertion slot, then hand that pair to the generator (C4).
//!
//! The adapter is polymorphic over the store backend — it depends only on
//! the capability set `{ordered select with predicate, sub-query,
//! unique-violation detection}` described in `spec.md` §4.6/§9, expressed
//! here as the [`IndexStore`] trait. No concrete database crate is named;
//! this module links against none. `async-trait` is used for the trait
//! definition the same way the example pack uses it for backend-abstraction
//! traits (`CheckPredicates` et al. in `fuel-vm`).

mod binding;
mod probe;

pub use binding::{FractionalIndexBinding, GroupValue};
pub use probe::{indices_for_after, indices_for_before, indices_for_first, indices_for_last};

use async_trait::async_trait;

/// Capability set this crate needs from an external ordered store: run an
/// ordered range query under a predicate, and recognise that store's
/// unique-constraint-violation signal.
///
/// Implementations live outside this crate (per `spec.md` §1's Non-goals —
/// no ORM, no SQL builder, no connection management lives here); this trait
/// is the entire seam.
#[async_trait]
pub trait IndexStore {
    /// Opaque key type as persisted by the concrete backend (typically
    /// `String` or `Vec<u8>`, matching whichever of [`crate::string_key`] /
    /// [`crate::binary_key`] the caller's column uses).
    type Key: Clone + Ord + Send + Sync;
    /// Backend-specific error type (connection failures, syntax errors,
    /// timeouts — anything that isn't the unique-violation this crate cares
    /// about).
    type Error: std::error::Error + Send + Sync + 'static;

    /// `SELECT fi FROM t WHERE <predicate> ORDER BY fi ASC|DESC LIMIT n`.
    ///
    /// `ascending` selects sort direction; `limit` bounds the row count.
    /// Returns at most `limit` keys, in the requested order.
    async fn select_ordered(
        &self,
        predicate: &Predicate,
        ascending: bool,
        limit: usize,
    ) -> Result<Vec<Self::Key>, Self::Error>;

    /// `SELECT fi FROM t WHERE <predicate> AND fi >= <bound> (or `<=` when
    /// descending) ORDER BY fi ASC|DESC LIMIT n`.
    ///
    /// Backs the `indices_for_after` / `indices_for_before` range fetch
    /// (`spec.md` §4.6 step 3), once the cursor row's own key is known.
    async fn select_ordered_from(
        &self,
        predicate: &Predicate,
        bound: &Self::Key,
        ascending: bool,
        limit: usize,
    ) -> Result<Vec<Self::Key>, Self::Error>;

    /// Recognises the backend's unique-constraint-violation signal on the
    /// `(group, fi)` composite index. Implementations must key on the
    /// store's structured error payload (code + affected constraint
    /// target), never on error-message substring matching — see `spec.md`
    /// §9.
    fn is_conflict(&self, error: &Self::Error) -> bool;
}

/// Free-function form of [`IndexStore::is_conflict`], matching the shape of
/// `is_index_conflict_error` in `spec.md` §6. The per-backend `model`/`field`
/// targeting named in the spec's shape is already captured by `S`'s own
/// `is_conflict` implementation, so it isn't threaded through here again.
pub fn is_index_conflict_error<S: IndexStore>(store: &S, error: &S::Error) -> bool {
    store.is_conflict(error)
}

/// A conjunction of column equality/is-null/false predicates, built only
/// from the binding's configuration schema — never directly from a
/// caller-supplied value map. See [`FractionalIndexBinding`] for how this
/// is assembled and why that direction matters.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    /// `(column, clause)` pairs, ANDed together. Evaluation order follows
    /// `spec.md` §9's fixed ordering: group predicates first, then cursor
    /// predicates.
    pub clauses: Vec<(String, Clause)>,
}

/// One column's contribution to a [`Predicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `column = value`.
    Equals(String),
    /// `column IS NULL`.
    IsNull,
    /// A missing field became a hard `FALSE`, not a wildcard — the security
    /// invariant from `spec.md` §4.6 step 1.
    False,
}

impl Predicate {
    pub fn is_unsatisfiable(&self) -> bool {
        self.clauses.iter().any(|(_, c)| matches!(c, Clause::False))
    }
}
