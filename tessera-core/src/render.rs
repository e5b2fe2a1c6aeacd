//! Rendering accumulated fragments into SQL
//!
//! Every function here is a pure read of a [`QueryState`] that has already
//! been through [`reconcile_legacy_state`](crate::state::reconcile_legacy_state).
//! Fragments are concatenated verbatim with fixed separators; nothing is
//! quoted or validated.

use std::fmt;

use tracing::warn;

use crate::fragment::flatten;
use crate::state::QueryState;

/// The statement kinds a query can be rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
}

impl StatementKind {
    /// The leading SQL verb
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Replace => "REPLACE",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }

    /// Whether executing this kind yields rows
    pub fn returns_rows(&self) -> bool {
        matches!(self, StatementKind::Select)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render `state` as a statement of the given kind
pub fn render(state: &QueryState, kind: StatementKind) -> String {
    if state.tables.is_empty() {
        warn!(%kind, "rendering statement without any table");
    }
    match kind {
        StatementKind::Select => render_select(state),
        StatementKind::Insert => render_insert(state),
        StatementKind::Replace => render_replace(state),
        StatementKind::Update => render_update(state),
        StatementKind::Delete => render_delete(state),
    }
}

/// `SELECT <fields> FROM (<tables>) <joins> <where> <group> <order> <limit>`
pub fn render_select(state: &QueryState) -> String {
    format!(
        "SELECT {} FROM ({}) {} {} {} {} {}",
        field_clause(state),
        table_clause(state),
        join_clause(state),
        where_clause(state),
        group_clause(state),
        order_clause(state),
        limit_clause(state),
    )
}

/// `INSERT INTO <primary> (<fields>) VALUES (<values>)`
pub fn render_insert(state: &QueryState) -> String {
    render_value_list("INSERT", state)
}

/// `REPLACE INTO <primary> (<fields>) VALUES (<values>)`
pub fn render_replace(state: &QueryState) -> String {
    render_value_list("REPLACE", state)
}

/// `UPDATE <primary> SET <f1> = <v1>, <f2> = <v2> <where>`
pub fn render_update(state: &QueryState) -> String {
    let assignments: Vec<String> = state
        .update_list
        .iter()
        .map(|(field, value)| format!("{} = {}", field, value))
        .collect();

    format!(
        "UPDATE {} SET {} {}",
        primary_table(state),
        assignments.join(", "),
        where_clause(state),
    )
}

/// `DELETE FROM <primary> <where> <limit>`
pub fn render_delete(state: &QueryState) -> String {
    format!(
        "DELETE FROM {} {} {}",
        primary_table(state),
        where_clause(state),
        limit_clause(state),
    )
}

fn render_value_list(verb: &str, state: &QueryState) -> String {
    // Keys and values come from the same ordered map, so they stay aligned.
    let fields: Vec<&str> = state.value_list.keys().map(String::as_str).collect();
    let values: Vec<&str> = state.value_list.values().map(String::as_str).collect();

    format!(
        "{} INTO {} ({}) VALUES ({})",
        verb,
        primary_table(state),
        fields.join(","),
        values.join(","),
    )
}

fn primary_table(state: &QueryState) -> &str {
    state.primary_table().unwrap_or_default()
}

fn field_clause(state: &QueryState) -> String {
    let fields = flatten(&state.fields);
    if fields.is_empty() {
        "*".to_string()
    } else {
        fields.join(",")
    }
}

fn table_clause(state: &QueryState) -> String {
    let tables: Vec<String> = state
        .tables
        .iter()
        .map(|(alias, name)| format!("({} AS {})", name, alias))
        .collect();
    tables.join(",")
}

fn join_clause(state: &QueryState) -> String {
    state.joins.iter().map(ToString::to_string).collect()
}

fn where_clause(state: &QueryState) -> String {
    let predicates = flatten(&state.where_clauses);
    if predicates.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", predicates.join(" AND "))
    }
}

fn group_clause(state: &QueryState) -> String {
    if state.group_by.is_empty() {
        String::new()
    } else {
        format!("GROUP BY {}", state.group_by.join(","))
    }
}

fn order_clause(state: &QueryState) -> String {
    if state.order_by.is_empty() {
        String::new()
    } else {
        format!("ORDER BY {}", state.order_by.join(","))
    }
}

fn limit_clause(state: &QueryState) -> String {
    if state.limit > 0 {
        format!("LIMIT {}", state.limit)
    } else {
        String::new()
    }
}
