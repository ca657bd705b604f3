//! Statement synthesis from derived schemas.

use std::sync::Arc;

use crate::error::SqlModelError;
use crate::query::QueryAndParams;
use crate::schema::{ColumnSpec, TableSchema};
use crate::types::{DatabaseType, RowValues};

mod columns;
mod ddl;
mod dml;
mod filter;
mod select;

pub use columns::{ColumnCreator, GenericColumns, PostgresColumns, SqliteColumns};
pub use filter::Filter;

/// Placeholder style used when numbering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// SQLite-style placeholders like `?1`.
    #[default]
    Sqlite,
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
}

/// Dialect settings for statement synthesis.
///
/// # Examples
/// ```rust
/// use sql_model::prelude::*;
///
/// let builder = QueryBuilder::for_database(DatabaseType::Postgres)
///     .with_identifier_quote('"');
/// assert_eq!(builder.placeholder(2), "$2");
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    style: PlaceholderStyle,
    identifier_quote: char,
    column_creator: Arc<dyn ColumnCreator>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(PlaceholderStyle::default(), GenericColumns)
    }
}

impl QueryBuilder {
    #[must_use]
    pub fn new(style: PlaceholderStyle, column_creator: impl ColumnCreator + 'static) -> Self {
        Self {
            style,
            identifier_quote: '"',
            column_creator: Arc::new(column_creator),
        }
    }

    /// The built-in dialect for a database type.
    #[must_use]
    pub fn for_database(db_type: DatabaseType) -> Self {
        match db_type {
            DatabaseType::Sqlite => Self::new(PlaceholderStyle::Sqlite, SqliteColumns),
            DatabaseType::Postgres => Self::new(PlaceholderStyle::Postgres, PostgresColumns),
        }
    }

    #[must_use]
    pub fn with_identifier_quote(mut self, quote: char) -> Self {
        self.identifier_quote = quote;
        self
    }

    #[must_use]
    pub fn with_placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_column_creator(mut self, column_creator: Arc<dyn ColumnCreator>) -> Self {
        self.column_creator = column_creator;
        self
    }

    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.style
    }

    #[must_use]
    pub fn identifier_quote(&self) -> char {
        self.identifier_quote
    }

    /// Quote an identifier, doubling any embedded quote characters.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        let q = self.identifier_quote;
        let mut out = String::with_capacity(name.len() + 2);
        out.push(q);
        for c in name.chars() {
            if c == q {
                out.push(q);
            }
            out.push(c);
        }
        out.push(q);
        out
    }

    /// The placeholder for the `index`-th bound parameter (1-indexed).
    #[must_use]
    pub fn placeholder(&self, index: usize) -> String {
        match self.style {
            PlaceholderStyle::Sqlite => format!("?{index}"),
            PlaceholderStyle::Postgres => format!("${index}"),
        }
    }

    fn qualified(&self, table: &str, column: &str) -> String {
        format!(
            "{}.{}",
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    /// Bind `value` through the column's coding and return its placeholder.
    fn bind(&self, column: &ColumnSpec, value: RowValues, params: &mut Vec<RowValues>) -> String {
        params.push(column.coding.encode(value));
        self.placeholder(params.len())
    }

    fn id_column<'s>(schema: &'s TableSchema) -> Result<&'s ColumnSpec, SqlModelError> {
        schema.id_spec().ok_or_else(|| {
            SqlModelError::QueryBuildFailure(format!(
                "table `{}` has no identifier column `{}`",
                schema.table_name, schema.id_column
            ))
        })
    }

    /// `"T"."id" = ?n`, binding the identifier.
    fn id_predicate(
        &self,
        schema: &TableSchema,
        id: RowValues,
        params: &mut Vec<RowValues>,
    ) -> Result<String, SqlModelError> {
        let id_column = Self::id_column(schema)?;
        let placeholder = self.bind(id_column, id, params);
        Ok(format!(
            "{} = {placeholder}",
            self.qualified(&schema.table_name, &id_column.name)
        ))
    }
}

fn finish(statement: QueryAndParams) -> QueryAndParams {
    tracing::trace!(
        sql = %statement.query,
        params = statement.params.len(),
        "synthesized statement"
    );
    statement
}
