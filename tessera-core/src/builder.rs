//! The imperative query builder

use tracing::{debug, trace};

use crate::config::{resolve_table_prefix, ConfigLookup};
use crate::fragment::{Fragment, Join};
use crate::functions;
use crate::render::{render, StatementKind};
use crate::state::{reconcile_legacy_state, LegacyFragments, QueryState};
use crate::Value;

/// Accumulates fragments for one logical query and renders them as SQL.
///
/// Accumulators never fail. Empty strings are dropped, everything else is
/// kept verbatim and spliced into the statement unescaped. Use
/// [`add_insert`](Self::add_insert) / [`add_update`](Self::add_update) when a
/// value needs quoting.
///
/// `D` is the database handle supplied by the caller. Rendering never
/// touches it; see [`crate::executor`] for running statements through it.
///
/// # Examples
/// ```
/// use tessera_core::Query;
///
/// let mut q = Query::default();
/// q.add_table("tasks", "t");
/// q.add_query("t.task_id");
/// q.add_where("t.task_owner = 7");
/// q.set_limit(10);
///
/// let sql = q.prepare_select();
/// assert!(sql.starts_with("SELECT t.task_id FROM ((tasks AS t))"));
/// assert!(sql.contains("WHERE t.task_owner = 7"));
/// ```
#[derive(Debug, Clone)]
pub struct Query<D = ()> {
    state: QueryState,
    table_prefix: String,
    db_functions: Vec<String>,
    db: D,
}

impl Default for Query<()> {
    fn default() -> Self {
        Self::new("", &(), ())
    }
}

impl<D> Query<D> {
    /// Create an empty query.
    ///
    /// The table prefix is `prefix` when non-empty, otherwise the `dbprefix`
    /// value from `config`, otherwise empty. It is resolved once, here.
    pub fn new<C>(prefix: &str, config: &C, db: D) -> Self
    where
        C: ConfigLookup + ?Sized,
    {
        Self {
            state: QueryState::new(),
            table_prefix: resolve_table_prefix(prefix, config),
            db_functions: vec![functions::now()],
            db,
        }
    }

    /// The database handle given at construction
    pub fn db(&self) -> &D {
        &self.db
    }

    /// The prefix resolved at construction
    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// `name` with the table prefix prepended. Renders never do this on
    /// their own.
    pub fn prefixed(&self, name: &str) -> String {
        format!("{}{}", self.table_prefix, name)
    }

    /// Function tokens cached at construction
    pub fn db_functions(&self) -> &[String] {
        &self.db_functions
    }

    /// The accumulated state, before legacy reconciliation
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Direct access to the old-named collections for callers that still
    /// populate them
    pub fn legacy_mut(&mut self) -> &mut LegacyFragments {
        &mut self.state.legacy
    }

    /// Add a table. An empty alias means the table name is its own alias;
    /// re-using an alias replaces the table it points at.
    pub fn add_table(&mut self, name: &str, alias: &str) -> &mut Self {
        let alias = if alias.is_empty() { name } else { alias };
        self.state
            .tables
            .insert(alias.to_string(), name.to_string());
        self
    }

    /// Add a selected field, or a group of fields
    pub fn add_query(&mut self, field: impl Into<Fragment>) -> &mut Self {
        let field = field.into();
        if field.is_empty() {
            trace!("ignoring empty field");
        } else {
            self.state.fields.push(field);
        }
        self
    }

    /// Add a predicate, or a group of predicates; all are ANDed together
    pub fn add_where(&mut self, predicate: impl Into<Fragment>) -> &mut Self {
        let predicate = predicate.into();
        if predicate.is_empty() {
            trace!("ignoring empty predicate");
        } else {
            self.state.where_clauses.push(predicate);
        }
        self
    }

    /// Add an ORDER BY field
    pub fn add_order(&mut self, field: &str) -> &mut Self {
        if field.is_empty() {
            trace!("ignoring empty order field");
        } else {
            self.state.order_by.push(field.to_string());
        }
        self
    }

    /// Add a GROUP BY field
    pub fn add_group(&mut self, field: &str) -> &mut Self {
        if field.is_empty() {
            trace!("ignoring empty group field");
        } else {
            self.state.group_by.push(field.to_string());
        }
        self
    }

    /// Set the row limit. Only positive values are stored, so a later call
    /// with zero or a negative number leaves an existing limit in place.
    pub fn set_limit(&mut self, limit: i64) -> &mut Self {
        match u64::try_from(limit) {
            Ok(limit) if limit > 0 => self.state.limit = limit,
            _ => trace!(limit, "ignoring non-positive limit"),
        }
        self
    }

    /// Add a join. An empty `join_type` means `left`.
    ///
    /// Joins are recorded in the legacy `join` collection and only move into
    /// `joins` when the statement is prepared.
    pub fn add_join(
        &mut self,
        table: &str,
        alias: &str,
        condition: &str,
        join_type: &str,
    ) -> &mut Self {
        self.state
            .legacy
            .join
            .push(Join::new(table, alias, condition, join_type));
        self
    }

    /// Set an INSERT/REPLACE column to the quoted literal of `value`
    pub fn add_insert(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        let literal = value.into().to_sql_literal();
        self.add_insert_raw(field, &literal)
    }

    /// Set an INSERT/REPLACE column to a raw expression such as `NOW()`
    pub fn add_insert_raw(&mut self, field: &str, expr: &str) -> &mut Self {
        if field.is_empty() {
            trace!("ignoring insert value without a field");
        } else {
            self.state
                .value_list
                .insert(field.to_string(), expr.to_string());
        }
        self
    }

    /// Set an UPDATE column to the quoted literal of `value`
    pub fn add_update(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        let literal = value.into().to_sql_literal();
        self.add_update_raw(field, &literal)
    }

    /// Set an UPDATE column to a raw expression
    pub fn add_update_raw(&mut self, field: &str, expr: &str) -> &mut Self {
        if field.is_empty() {
            trace!("ignoring update value without a field");
        } else {
            self.state
                .update_list
                .insert(field.to_string(), expr.to_string());
        }
        self
    }

    /// Drop every accumulated fragment. The table prefix, cached function
    /// tokens and database handle are kept.
    pub fn clear(&mut self) -> &mut Self {
        self.state.clear();
        self
    }

    /// A copy of the state with the legacy collections merged in
    pub fn reconciled_state(&self) -> QueryState {
        reconcile_legacy_state(self.state.clone())
    }

    /// Render the accumulated fragments as `kind`
    pub fn prepare(&self, kind: StatementKind) -> String {
        let sql = render(&self.reconciled_state(), kind);
        debug!(%kind, sql = %sql, "prepared statement");
        sql
    }

    /// Render as `kind`, then clear the query for reuse
    pub fn prepare_and_clear(&mut self, kind: StatementKind) -> String {
        let sql = self.prepare(kind);
        self.clear();
        sql
    }

    /// Render as SELECT
    pub fn prepare_select(&self) -> String {
        self.prepare(StatementKind::Select)
    }

    /// Render as INSERT INTO the primary table
    pub fn prepare_insert(&self) -> String {
        self.prepare(StatementKind::Insert)
    }

    /// Same statement as [`prepare_insert`](Self::prepare_insert)
    pub fn prepare_insert_select(&self) -> String {
        self.prepare_insert()
    }

    /// Render as REPLACE INTO the primary table
    pub fn prepare_replace(&self) -> String {
        self.prepare(StatementKind::Replace)
    }

    /// Render as UPDATE of the primary table
    pub fn prepare_update(&self) -> String {
        self.prepare(StatementKind::Update)
    }

    /// Render as DELETE FROM the primary table
    pub fn prepare_delete(&self) -> String {
        self.prepare(StatementKind::Delete)
    }

    /// See [`functions::now`]
    pub fn dbfn_now(&self) -> String {
        functions::now()
    }

    /// See [`functions::now_with_time_zone`]
    pub fn dbfn_now_with_tz(&self) -> String {
        functions::now_with_time_zone()
    }

    /// See [`functions::date_diff`]
    pub fn dbfn_date_diff(&self, date1: &str, date2: &str) -> String {
        functions::date_diff(date1, date2)
    }

    /// See [`functions::date_add`]
    pub fn dbfn_date_add(&self, date: &str, interval: i64, unit: &str) -> String {
        functions::date_add(date, interval, unit)
    }
}
