//! [`FractionalIndexBinding`]: owns a table/column/group/cursor
//! configuration once, so callers don't re-pass column names on every probe
//! call. Pure ergonomics on top of `spec.md` §4.6 — mirrors how the
//! teacher's `Preferences` struct is built once and reused (`frame/types.rs`).

use std::collections::HashMap;

use super::{Clause, Predicate};

/// A single group- or cursor-column value, as supplied by the caller for one
/// probe call.
///
/// Distinguishes an explicit SQL `NULL` (`GroupValue::Null`) from a concrete
/// value (`GroupValue::Value`). There is deliberately no "missing" variant
/// here — omission is expressed by the column's absence from the caller's
/// map, not by a variant of this enum; see [`FractionalIndexBinding::group_predicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValue {
    /// `column IS NULL`.
    Null,
    /// `column = value`.
    Value(String),
}

/// Table/column configuration for one fractional-index column, bound once
/// and reused across probe calls.
#[derive(Debug, Clone)]
pub struct FractionalIndexBinding {
    pub table: String,
    pub fi_column: String,
    /// Columns that together uniquely identify the ordered group.
    pub group_columns: Vec<String>,
    /// Columns that together uniquely identify one row within a group.
    pub cursor_columns: Vec<String>,
}

impl FractionalIndexBinding {
    pub fn new(
        table: impl Into<String>,
        fi_column: impl Into<String>,
        group_columns: impl IntoIterator<Item = impl Into<String>>,
        cursor_columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            table: table.into(),
            fi_column: fi_column.into(),
            group_columns: group_columns.into_iter().map(Into::into).collect(),
            cursor_columns: cursor_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds the group predicate from the *configured* `group_columns`,
    /// not from whatever keys happen to be in `values` — the security
    /// invariant in `spec.md` §4.6 step 1. A column configured here but
    /// absent from `values` becomes a hard `Clause::False`, never a
    /// wildcard.
    pub fn group_predicate(&self, values: &HashMap<String, GroupValue>) -> Predicate {
        predicate_for(&self.group_columns, values)
    }

    /// Same rule as [`Self::group_predicate`], applied to `cursor_columns`.
    pub fn cursor_predicate(&self, values: &HashMap<String, GroupValue>) -> Predicate {
        predicate_for(&self.cursor_columns, values)
    }

    /// The fixed conjunction order from `spec.md` §9: group predicates
    /// before cursor predicates.
    pub fn combined_predicate(
        &self,
        group: &HashMap<String, GroupValue>,
        cursor: &HashMap<String, GroupValue>,
    ) -> Predicate {
        let mut predicate = self.group_predicate(group);
        predicate.clauses.extend(self.cursor_predicate(cursor).clauses);
        predicate
    }
}

fn predicate_for(columns: &[String], values: &HashMap<String, GroupValue>) -> Predicate {
    let clauses = columns
        .iter()
        .map(|column| {
            let clause = match values.get(column) {
                None => Clause::False,
                Some(GroupValue::Null) => Clause::IsNull,
                Some(GroupValue::Value(v)) => Clause::Equals(v.clone()),
            };
            (column.clone(), clause)
        })
        .collect();
    Predicate { clauses }
}
