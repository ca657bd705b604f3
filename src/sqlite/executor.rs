use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rusqlite::Connection;

use crate::error::SqlModelError;
use crate::executor::{Executor, QueryResult};
use crate::query::QueryAndParams;
use crate::query_builder::QueryBuilder;
use crate::types::RowValues;

use super::config::{SqliteOptions, SqliteOptionsBuilder};
use super::params::Params;
use super::query::build_result_set;

/// An [`Executor`] over one `rusqlite` connection.
///
/// Statements run on tokio's blocking pool; the connection is shared behind a mutex, so
/// clones of the executor serialize on it.
///
/// ```rust,no_run
/// use sql_model::prelude::*;
///
/// # async fn run() -> Result<(), SqlModelError> {
/// let mut conn = SqliteExecutor::builder(":memory:").build().await?;
/// conn.execute(&QueryAndParams::new_without_params("SELECT 1")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
    builder: QueryBuilder,
}

impl SqliteExecutor {
    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Open the database described by `opts`.
    ///
    /// # Errors
    /// Returns `SqlModelError::ExecutionError` if the database cannot be opened.
    pub async fn open(opts: SqliteOptions) -> Result<Self, SqlModelError> {
        let builder = opts.resolved_query_builder();
        let db_path = opts.db_path;
        tracing::debug!(db_path = %db_path, "opening sqlite database");
        let conn = tokio::task::spawn_blocking(move || Connection::open(db_path))
            .await
            .map_err(SqlModelError::execution)?
            .map_err(SqlModelError::execution)?;
        Ok(Self::from_connection(conn, builder))
    }

    /// Wrap an already open connection.
    #[must_use]
    pub fn from_connection(conn: Connection, builder: QueryBuilder) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            builder,
        }
    }
}

/// Skip leading whitespace and SQL comments.
fn skip_comments(mut sql: &str) -> &str {
    loop {
        sql = sql.trim_start();
        if let Some(rest) = sql.strip_prefix("--") {
            sql = rest.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(rest) = sql.strip_prefix("/*") {
            sql = rest.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            return sql;
        }
    }
}

fn is_insert(sql: &str) -> bool {
    let sql = skip_comments(sql);
    ["insert", "replace"].iter().any(|verb| {
        sql.get(..verb.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(verb))
    })
}

fn run_statement(conn: &Connection, sql: &str, params: &Params) -> Result<QueryResult, rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;
    if stmt.column_count() > 0 {
        return Ok(QueryResult::ResultSet(build_result_set(&mut stmt, params)?));
    }

    let param_refs = params.as_refs();
    let rowid_before = conn.last_insert_rowid();
    stmt.execute(&param_refs[..])?;
    let rowid = conn.last_insert_rowid();
    // the rowid only moves on a top-level insert, which also covers `WITH ... INSERT`
    if rowid != rowid_before || is_insert(sql) {
        Ok(QueryResult::Success(RowValues::Int(rowid)))
    } else {
        Ok(QueryResult::SuccessNoData)
    }
}

#[async_trait]
impl Executor for SqliteExecutor {
    fn query_builder(&self) -> &QueryBuilder {
        &self.builder
    }

    async fn execute(&mut self, query: &QueryAndParams) -> Result<QueryResult, SqlModelError> {
        let conn = Arc::clone(&self.conn);
        let sql = query.query.clone();
        let params = Params::convert(&query.params);
        tracing::debug!(sql = %sql, params = params.len(), "executing sqlite statement");

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            run_statement(&conn, &sql, &params)
        })
        .await
        .map_err(SqlModelError::execution)?
        .map_err(SqlModelError::execution)
    }
}
