//! Running prepared statements through the query's database handle
//!
//! The builder only renders; this module is the optional layer that hands
//! the rendered SQL to a [`ConnectionPool`] supplied at construction.

use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;

use crate::render::StatementKind;
use crate::{Error, Query, Result};

/// Trait for database handles a [`Query`] can run its SQL through
pub trait ConnectionPool: Send + Sync + Clone {
    /// Execute a statement that returns no rows, yielding the affected count
    fn execute(&self, sql: &str) -> impl Future<Output = Result<u64>> + Send;

    /// Execute a statement and decode every returned row
    fn fetch_all<T>(&self, sql: &str) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;
}

impl<P: ConnectionPool> Query<P> {
    /// Render as `kind` and execute it, returning the affected row count
    pub async fn exec(&self, kind: StatementKind) -> Result<u64> {
        let sql = self.prepare(kind);
        let affected = self.db().execute(&sql).await?;
        debug!(%kind, affected, "executed statement");
        Ok(affected)
    }

    /// Render as SELECT and decode every row
    pub async fn load_list<T>(&self) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        self.load_list_as(StatementKind::Select).await
    }

    /// Render as `kind` and decode every row; only row-returning kinds are
    /// accepted
    pub async fn load_list_as<T>(&self, kind: StatementKind) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        if !kind.returns_rows() {
            return Err(Error::invalid_query(format!("{} does not return rows", kind)));
        }
        let sql = self.prepare(kind);
        let rows = self.db().fetch_all(&sql).await?;
        debug!(%kind, rows = rows.len(), "loaded rows");
        Ok(rows)
    }

    /// The first row of the SELECT, if any
    pub async fn load_first<T>(&self) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        let rows: Vec<T> = self.load_list().await?;
        Ok(rows.into_iter().next())
    }
}

/// SQLx-backed MySQL pool
#[cfg(feature = "mysql")]
pub mod mysql {
    use super::*;
    use futures::TryStreamExt;
    use sqlx::mysql::MySqlRow;
    use sqlx::{Column, Row, TypeInfo, ValueRef};

    /// MySQL connection pool wrapper
    #[derive(Clone)]
    pub struct MySqlPool {
        inner: sqlx::MySqlPool,
    }

    impl MySqlPool {
        /// Create a new MySQL pool from a connection string
        pub async fn connect(database_url: &str) -> Result<Self> {
            let pool = sqlx::MySqlPool::connect(database_url).await?;
            Ok(Self { inner: pool })
        }

        /// Create from an existing sqlx pool
        pub fn from_pool(pool: sqlx::MySqlPool) -> Self {
            Self { inner: pool }
        }
    }

    impl ConnectionPool for MySqlPool {
        async fn execute(&self, sql: &str) -> Result<u64> {
            let result = sqlx::query(sql).execute(&self.inner).await?;
            Ok(result.rows_affected())
        }

        async fn fetch_all<T>(&self, sql: &str) -> Result<Vec<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            sqlx::query(sql)
                .fetch(&self.inner)
                .map_err(Error::from)
                .and_then(|row| async move {
                    let json = row_to_json(&row)?;
                    Ok(serde_json::from_value(json)?)
                })
                .try_collect()
                .await
        }
    }

    /// Decode a row into a JSON object keyed by column name
    fn row_to_json(row: &MySqlRow) -> Result<serde_json::Value> {
        let mut object = serde_json::Map::with_capacity(row.len());

        for column in row.columns() {
            let idx = column.ordinal();
            let name = column.name();
            let decode_err = |e: sqlx::Error| Error::decode(name, e.to_string());

            if row.try_get_raw(idx)?.is_null() {
                object.insert(name.to_string(), serde_json::Value::Null);
                continue;
            }

            let value = match column.type_info().name() {
                "BOOLEAN" => row.try_get::<bool, _>(idx).map(serde_json::Value::from),
                "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                    row.try_get::<i64, _>(idx).map(serde_json::Value::from)
                }
                "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED"
                | "INT UNSIGNED" | "BIGINT UNSIGNED" => {
                    row.try_get::<u64, _>(idx).map(serde_json::Value::from)
                }
                "FLOAT" => row.try_get::<f32, _>(idx).map(serde_json::Value::from),
                "DOUBLE" => row.try_get::<f64, _>(idx).map(serde_json::Value::from),
                "DATETIME" | "TIMESTAMP" => row
                    .try_get::<chrono::NaiveDateTime, _>(idx)
                    .map(|ts| {
                        serde_json::Value::from(
                            ts.format(crate::functions::DATETIME_FORMAT).to_string(),
                        )
                    }),
                "DATE" => row
                    .try_get::<chrono::NaiveDate, _>(idx)
                    .map(|d| serde_json::Value::from(d.format("%Y-%m-%d").to_string())),
                _ => row.try_get::<String, _>(idx).map(serde_json::Value::from),
            }
            .map_err(decode_err)?;

            object.insert(name.to_string(), value);
        }

        Ok(serde_json::Value::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Project {
        project_id: i32,
        project_name: String,
    }

    // Mock connection pool that records the SQL it receives
    #[derive(Clone, Default)]
    struct MockPool {
        should_fail: bool,
        executed: Arc<Mutex<Vec<String>>>,
    }

    impl MockPool {
        fn new() -> Self {
            Self::default()
        }

        fn with_failure() -> Self {
            Self {
                should_fail: true,
                ..Self::default()
            }
        }

        fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    impl ConnectionPool for MockPool {
        async fn execute(&self, sql: &str) -> Result<u64> {
            self.executed.lock().unwrap().push(sql.to_string());
            if self.should_fail {
                Err(Error::invalid_query("Mock execute failure"))
            } else {
                Ok(1)
            }
        }

        async fn fetch_all<T>(&self, sql: &str) -> Result<Vec<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            self.executed.lock().unwrap().push(sql.to_string());
            if self.should_fail {
                return Err(Error::invalid_query("Mock fetch_all failure"));
            }
            let rows = serde_json::json!([
                {"project_id": 1, "project_name": "Website"},
                {"project_id": 2, "project_name": "Mobile app"}
            ]);
            Ok(serde_json::from_value(rows)?)
        }
    }

    fn query(pool: MockPool) -> Query<MockPool> {
        Query::new("", &(), pool)
    }

    #[tokio::test]
    async fn test_load_list() {
        let pool = MockPool::new();
        let mut q = query(pool.clone());
        q.add_table("projects", "p");
        q.add_query(vec!["p.project_id", "p.project_name"]);

        let projects: Vec<Project> = q.load_list().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1].project_name, "Mobile app");
        assert_eq!(pool.executed(), vec![q.prepare_select()]);
    }

    #[tokio::test]
    async fn test_load_first() {
        let mut q = query(MockPool::new());
        q.add_table("projects", "");
        let first: Option<Project> = q.load_first().await.unwrap();
        assert_eq!(first.map(|p| p.project_id), Some(1));
    }

    #[tokio::test]
    async fn test_exec_runs_rendered_statement() {
        let pool = MockPool::new();
        let mut q = query(pool.clone());
        q.add_table("projects", "");
        q.add_where("project_id = 4");

        let affected = q.exec(StatementKind::Delete).await.unwrap();
        assert_eq!(affected, 1);
        assert_eq!(
            pool.executed(),
            vec!["DELETE FROM projects WHERE project_id = 4 ".to_string()]
        );
    }

    #[tokio::test]
    async fn test_load_list_rejects_non_select() {
        let pool = MockPool::new();
        let mut q = query(pool.clone());
        q.add_table("projects", "");

        let result: Result<Vec<Project>> = q.load_list_as(StatementKind::Update).await;
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
        assert!(pool.executed().is_empty());
    }

    #[tokio::test]
    async fn test_exec_failure_propagates() {
        let mut q = query(MockPool::with_failure());
        q.add_table("projects", "");
        assert!(q.exec(StatementKind::Delete).await.is_err());
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let mut q = query(MockPool::with_failure());
        q.add_table("projects", "");
        let result: Result<Vec<Project>> = tokio_test::block_on(q.load_list());
        assert!(result.is_err());
    }
}
