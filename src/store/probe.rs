//! The four probe operations from `spec.md` §4.6: given a group (and,
//! for `_after`/`_before`, a cursor row), return the pair of neighbor keys
//! bracketing the requested insertion slot.
//!
//! Instrumented with `tracing::instrument` on the two public entry points
//! that actually talk to the store — the only I/O in this crate — matching
//! the pack's database-adapter convention of annotating every query method
//! (`prospector-infra-db`'s repositories).

use std::collections::HashMap;

use tracing::instrument;

use super::{FractionalIndexBinding, GroupValue, IndexStore};

/// `(null, lo_or_null)`: the smallest existing key in the group, or
/// `(None, None)` if the group is empty.
#[instrument(skip(store, binding))]
pub async fn indices_for_first<S: IndexStore>(
    store: &S,
    binding: &FractionalIndexBinding,
    group: &HashMap<String, GroupValue>,
) -> Result<(Option<S::Key>, Option<S::Key>), S::Error> {
    let predicate = binding.group_predicate(group);
    let rows = store.select_ordered(&predicate, true, 1).await?;
    Ok((None, rows.into_iter().next()))
}

/// `(hi_or_null, null)`: the largest existing key in the group, or
/// `(None, None)` if the group is empty.
#[instrument(skip(store, binding))]
pub async fn indices_for_last<S: IndexStore>(
    store: &S,
    binding: &FractionalIndexBinding,
    group: &HashMap<String, GroupValue>,
) -> Result<(Option<S::Key>, Option<S::Key>), S::Error> {
    let predicate = binding.group_predicate(group);
    let rows = store.select_ordered(&predicate, false, 1).await?;
    Ok((rows.into_iter().next(), None))
}

/// `(cursor_key, successor_key_or_null)` if the cursor row exists in the
/// group, else `None`.
///
/// Algorithm from `spec.md` §4.6: locate the cursor's own key via
/// `group_preds AND cursor_preds` (fixed ordering, `spec.md` §9), then
/// fetch up to two rows at or after it.
#[instrument(skip(store, binding))]
pub async fn indices_for_after<S: IndexStore>(
    store: &S,
    binding: &FractionalIndexBinding,
    group: &HashMap<String, GroupValue>,
    cursor: &HashMap<String, GroupValue>,
) -> Result<Option<(Option<S::Key>, Option<S::Key>)>, S::Error> {
    let combined = binding.combined_predicate(group, cursor);
    let Some(cursor_key) = store.select_ordered(&combined, true, 1).await?.into_iter().next() else {
        return Ok(None);
    };
    let group_predicate = binding.group_predicate(group);
    let mut rows = store.select_ordered_from(&group_predicate, &cursor_key, true, 2).await?;
    if rows.is_empty() {
        return Ok(None);
    }
    let lo = rows.remove(0);
    let hi = if rows.is_empty() { None } else { Some(rows.remove(0)) };
    Ok(Some((Some(lo), hi)))
}

/// `(predecessor_key_or_null, cursor_key)` if the cursor row exists in the
/// group, else `None`. Symmetric to [`indices_for_after`]: descending order,
/// `<=`, tuple reversed so the caller always receives `(lower, upper)`.
#[instrument(skip(store, binding))]
pub async fn indices_for_before<S: IndexStore>(
    store: &S,
    binding: &FractionalIndexBinding,
    group: &HashMap<String, GroupValue>,
    cursor: &HashMap<String, GroupValue>,
) -> Result<Option<(Option<S::Key>, Option<S::Key>)>, S::Error> {
    let combined = binding.combined_predicate(group, cursor);
    let Some(cursor_key) = store.select_ordered(&combined, false, 1).await?.into_iter().next() else {
        return Ok(None);
    };
    let group_predicate = binding.group_predicate(group);
    let mut rows = store.select_ordered_from(&group_predicate, &cursor_key, false, 2).await?;
    if rows.is_empty() {
        return Ok(None);
    }
    let hi = rows.remove(0);
    let lo = if rows.is_empty() { None } else { Some(rows.remove(0)) };
    Ok(Some((lo, Some(hi))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("fake store error")]
    struct FakeError;

    /// An in-memory `IndexStore` over a single group's `(id, fi)` rows, for
    /// exercising the probe algorithms without a real database. Honors an
    /// `Equals` clause on `id` so the cursor sub-query in `indices_for_after`
    /// / `indices_for_before` actually narrows to the requested row, the way
    /// a real backend's `WHERE id = ?` would.
    struct FakeStore {
        rows: Mutex<Vec<(String, String)>>,
    }

    impl FakeStore {
        fn new(fis: Vec<&str>) -> Self {
            let rows = fis.into_iter().map(|fi| (fi.to_string(), fi.to_string())).collect();
            Self { rows: Mutex::new(rows) }
        }

        fn matching(&self, predicate: &super::super::Predicate) -> Vec<String> {
            if predicate.is_unsatisfiable() {
                return Vec::new();
            }
            let id_filter = predicate.clauses.iter().find_map(|(col, clause)| {
                if col == "id" {
                    match clause {
                        super::super::Clause::Equals(v) => Some(v.clone()),
                        _ => None,
                    }
                } else {
                    None
                }
            });
            self.rows
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, _)| id_filter.as_ref().map_or(true, |want| id == want))
                .map(|(_, fi)| fi.clone())
                .collect()
        }
    }

    #[async_trait]
    impl IndexStore for FakeStore {
        type Key = String;
        type Error = FakeError;

        async fn select_ordered(&self, predicate: &super::super::Predicate, ascending: bool, limit: usize) -> Result<Vec<String>, FakeError> {
            let mut rows = self.matching(predicate);
            rows.sort();
            if !ascending {
                rows.reverse();
            }
            rows.truncate(limit);
            Ok(rows)
        }

        async fn select_ordered_from(&self, predicate: &super::super::Predicate, bound: &String, ascending: bool, limit: usize) -> Result<Vec<String>, FakeError> {
            let mut rows = self.matching(predicate);
            rows.sort();
            let mut filtered: Vec<String> = if ascending {
                rows.into_iter().filter(|k| k >= bound).collect()
            } else {
                rows.reverse();
                rows.into_iter().filter(|k| k <= bound).collect()
            };
            filtered.truncate(limit);
            Ok(filtered)
        }

        fn is_conflict(&self, _error: &FakeError) -> bool {
            false
        }
    }

    fn binding() -> FractionalIndexBinding {
        FractionalIndexBinding::new("items", "fi", ["board_id"], ["id"])
    }

    fn group_with_board(board: &str) -> HashMap<String, GroupValue> {
        let mut g = HashMap::new();
        g.insert("board_id".to_string(), GroupValue::Value(board.to_string()));
        g
    }

    #[tokio::test]
    async fn first_on_empty_group_is_all_none() {
        let store = FakeStore::new(vec![]);
        let (lo, hi) = indices_for_first(&store, &binding(), &group_with_board("a")).await.unwrap();
        assert_eq!(lo, None);
        assert_eq!(hi, None);
    }

    #[tokio::test]
    async fn first_and_last_bracket_the_group() {
        let store = FakeStore::new(vec!["50", "60", "70"]);
        let (lo, hi) = indices_for_first(&store, &binding(), &group_with_board("a")).await.unwrap();
        assert_eq!(lo, None);
        assert_eq!(hi.as_deref(), Some("50"));

        let (lo, hi) = indices_for_last(&store, &binding(), &group_with_board("a")).await.unwrap();
        assert_eq!(lo.as_deref(), Some("70"));
        assert_eq!(hi, None);
    }

    #[tokio::test]
    async fn after_cursor_returns_cursor_and_successor() {
        let store = FakeStore::new(vec!["50", "60", "70"]);
        let mut cursor = HashMap::new();
        cursor.insert("id".to_string(), GroupValue::Value("60".to_string()));
        let (lo, hi) = indices_for_after(&store, &binding(), &group_with_board("a"), &cursor)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lo.as_deref(), Some("60"));
        assert_eq!(hi.as_deref(), Some("70"));
    }

    #[tokio::test]
    async fn after_last_row_has_no_successor() {
        let store = FakeStore::new(vec!["50", "60", "70"]);
        let mut cursor = HashMap::new();
        cursor.insert("id".to_string(), GroupValue::Value("70".to_string()));
        let (lo, hi) = indices_for_after(&store, &binding(), &group_with_board("a"), &cursor)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lo.as_deref(), Some("70"));
        assert_eq!(hi, None);
    }

    #[tokio::test]
    async fn before_cursor_returns_predecessor_and_cursor() {
        let store = FakeStore::new(vec!["50", "60", "70"]);
        let mut cursor = HashMap::new();
        cursor.insert("id".to_string(), GroupValue::Value("60".to_string()));
        let (lo, hi) = indices_for_before(&store, &binding(), &group_with_board("a"), &cursor)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lo.as_deref(), Some("50"));
        assert_eq!(hi.as_deref(), Some("60"));
    }

    #[tokio::test]
    async fn missing_cursor_row_is_none() {
        let store = FakeStore::new(vec!["50", "60"]);
        let mut cursor = HashMap::new();
        cursor.insert("id".to_string(), GroupValue::Value("999".to_string()));
        let result = indices_for_after(&store, &binding(), &group_with_board("a"), &cursor).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn missing_group_field_is_a_hard_false_not_a_wildcard() {
        let store = FakeStore::new(vec!["50", "60"]);
        let empty_group = HashMap::new();
        let (lo, hi) = indices_for_first(&store, &binding(), &empty_group).await.unwrap();
        assert_eq!((lo, hi), (None, None));
    }
}
