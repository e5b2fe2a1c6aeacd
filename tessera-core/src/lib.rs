//! Tessera Core - a fragment-accumulating SQL statement assembler
//!
//! Tables, fields, predicates, joins, grouping, ordering, limits and value
//! assignments are collected one call at a time on a [`Query`], then
//! rendered as a SELECT, INSERT, REPLACE, UPDATE or DELETE statement.
//! Fragments are raw SQL and are not escaped; [`Value`] offers quoted
//! literals for callers that need them.

pub mod builder;
pub mod config;
pub mod error;
pub mod executor;
pub mod fragment;
pub mod functions;
pub mod render;
pub mod state;
pub mod value;

// Re-export main types
pub use builder::Query;
pub use config::{ConfigLookup, Settings};
pub use error::{Error, Result};
pub use executor::ConnectionPool;
pub use fragment::{Fragment, Join};
pub use render::StatementKind;
pub use state::{reconcile_legacy_state, LegacyFragments, QueryState};
pub use value::Value;

/// Create an empty query with no table prefix and no database handle
pub fn query() -> Query {
    Query::default()
}
