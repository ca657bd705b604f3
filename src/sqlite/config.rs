use crate::error::SqlModelError;
use crate::query_builder::QueryBuilder;
use crate::types::DatabaseType;

use super::executor::SqliteExecutor;

/// Options for opening a `SQLite` executor.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    /// File path, or `:memory:` for a private in-memory database.
    pub db_path: String,
    /// Dialect override; defaults to the built-in `SQLite` dialect.
    pub query_builder: Option<QueryBuilder>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            query_builder: None,
        }
    }

    #[must_use]
    pub fn with_query_builder(mut self, query_builder: QueryBuilder) -> Self {
        self.query_builder = Some(query_builder);
        self
    }

    /// The dialect statements will be synthesized with.
    #[must_use]
    pub fn resolved_query_builder(&self) -> QueryBuilder {
        self.query_builder
            .clone()
            .unwrap_or_else(|| QueryBuilder::for_database(DatabaseType::Sqlite))
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn query_builder(mut self, query_builder: QueryBuilder) -> Self {
        self.opts.query_builder = Some(query_builder);
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open the database.
    ///
    /// # Errors
    ///
    /// Returns `SqlModelError::ExecutionError` if the database cannot be opened.
    pub async fn build(self) -> Result<SqliteExecutor, SqlModelError> {
        SqliteExecutor::open(self.finish()).await
    }
}
