//! Accumulated query state and the legacy reconciliation step

use indexmap::IndexMap;

use crate::fragment::{Fragment, Join};

/// Fragment collections under their pre-rename names.
///
/// Older callers write into these directly; `add_join` still does. They are
/// merged into the current collections by [`reconcile_legacy_state`] right
/// before a statement is rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyFragments {
    pub table_list: IndexMap<String, String>,
    pub query: Vec<Fragment>,
    pub where_: Vec<Fragment>,
    pub join: Vec<Join>,
    pub group_by: Vec<String>,
    pub order_by: Vec<String>,
}

impl LegacyFragments {
    pub fn is_empty(&self) -> bool {
        self.table_list.is_empty()
            && self.query.is_empty()
            && self.where_.is_empty()
            && self.join.is_empty()
            && self.group_by.is_empty()
            && self.order_by.is_empty()
    }
}

/// Everything accumulated for one logical query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// alias -> raw table name; the first entry is the primary table
    pub tables: IndexMap<String, String>,
    pub fields: Vec<Fragment>,
    pub where_clauses: Vec<Fragment>,
    pub joins: Vec<Join>,
    pub group_by: Vec<String>,
    pub order_by: Vec<String>,
    /// 0 means unset
    pub limit: u64,
    /// field -> literal value expression, for INSERT and REPLACE
    pub value_list: IndexMap<String, String>,
    /// field -> literal value expression, for UPDATE
    pub update_list: IndexMap<String, String>,
    pub legacy: LegacyFragments,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first table added, ignoring its alias
    pub fn primary_table(&self) -> Option<&str> {
        self.tables.first().map(|(_, name)| name.as_str())
    }

    /// Reset every collection and the limit
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Merge the legacy-named collections into the current ones.
///
/// Each legacy collection moves over only when it is non-empty and its
/// current counterpart is empty. Whatever is merged is removed from
/// `legacy`, so applying this twice is the same as applying it once.
pub fn reconcile_legacy_state(mut state: QueryState) -> QueryState {
    fn merge<T>(current: &mut T, legacy: &mut T, is_empty: impl Fn(&T) -> bool)
    where
        T: Default,
    {
        if is_empty(&*current) && !is_empty(&*legacy) {
            *current = std::mem::take(legacy);
        }
    }

    let legacy = &mut state.legacy;
    merge(&mut state.tables, &mut legacy.table_list, IndexMap::is_empty);
    merge(&mut state.fields, &mut legacy.query, Vec::is_empty);
    merge(&mut state.where_clauses, &mut legacy.where_, Vec::is_empty);
    merge(&mut state.joins, &mut legacy.join, Vec::is_empty);
    merge(&mut state.group_by, &mut legacy.group_by, Vec::is_empty);
    merge(&mut state.order_by, &mut legacy.order_by, Vec::is_empty);
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_table_is_first_inserted() {
        let mut state = QueryState::new();
        state.tables.insert("o".into(), "orders".into());
        state.tables.insert("c".into(), "customers".into());
        assert_eq!(state.primary_table(), Some("orders"));
    }

    #[test]
    fn test_primary_table_empty() {
        assert_eq!(QueryState::new().primary_table(), None);
    }

    #[test]
    fn test_reconcile_copies_into_empty_collections() {
        let mut state = QueryState::new();
        state.legacy.table_list.insert("u".into(), "users".into());
        state.legacy.query.push("u.id".into());
        state.legacy.where_.push("u.active = 1".into());
        state.legacy.join.push(Join::new("roles", "r", "r.id = u.role_id", "left"));
        state.legacy.group_by.push("u.role_id".into());
        state.legacy.order_by.push("u.name".into());

        let state = reconcile_legacy_state(state);

        assert_eq!(state.tables.get("u").map(String::as_str), Some("users"));
        assert_eq!(state.fields, vec![Fragment::from("u.id")]);
        assert_eq!(state.where_clauses, vec![Fragment::from("u.active = 1")]);
        assert_eq!(state.joins.len(), 1);
        assert_eq!(state.group_by, vec!["u.role_id".to_string()]);
        assert_eq!(state.order_by, vec!["u.name".to_string()]);
        assert!(state.legacy.is_empty());
    }

    #[test]
    fn test_reconcile_keeps_populated_current_collections() {
        let mut state = QueryState::new();
        state.fields.push("new_field".into());
        state.legacy.query.push("old_field".into());
        state.legacy.order_by.push("old_order".into());

        let state = reconcile_legacy_state(state);

        assert_eq!(state.fields, vec![Fragment::from("new_field")]);
        assert_eq!(state.legacy.query, vec![Fragment::from("old_field")]);
        assert_eq!(state.order_by, vec!["old_order".to_string()]);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut state = QueryState::new();
        state.legacy.where_.push("a = 1".into());
        let once = reconcile_legacy_state(state);
        let twice = reconcile_legacy_state(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = QueryState::new();
        state.tables.insert("t".into(), "t".into());
        state.fields.push("a".into());
        state.limit = 3;
        state.value_list.insert("a".into(), "1".into());
        state.legacy.join.push(Join::new("x", "", "1=1", ""));
        state.clear();
        assert_eq!(state, QueryState::default());
    }
}
