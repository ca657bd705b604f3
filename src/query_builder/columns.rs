use std::fmt;

use crate::error::SqlModelError;
use crate::schema::ColumnSpec;
use crate::types::SqlType;

use super::QueryBuilder;

/// Renders one column clause of a CREATE TABLE statement.
///
/// All dialect variance in table creation (type spelling, auto-increment keyword, flag
/// placement) lives behind this trait.
pub trait ColumnCreator: Send + Sync + fmt::Debug {
    /// # Errors
    ///
    /// Returns `SqlModelError::QueryBuildFailure` if the dialect cannot express the column.
    fn build_column(
        &self,
        column: &ColumnSpec,
        builder: &QueryBuilder,
    ) -> Result<String, SqlModelError>;
}

/// `"<name>" <TYPE>[ AUTO_INCREMENT][ PRIMARY KEY][ NOT NULL]` with generic type tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericColumns;

impl ColumnCreator for GenericColumns {
    fn build_column(
        &self,
        column: &ColumnSpec,
        builder: &QueryBuilder,
    ) -> Result<String, SqlModelError> {
        let mut clause = format!(
            "{} {}",
            builder.quote_identifier(&column.name),
            column.sql_type.token()
        );
        if column.auto_increment {
            clause.push_str(" AUTO_INCREMENT");
        }
        if column.primary_key {
            clause.push_str(" PRIMARY KEY");
        }
        if !column.nullable {
            clause.push_str(" NOT NULL");
        }
        Ok(clause)
    }
}

/// `SQLite` column clauses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteColumns;

impl SqliteColumns {
    fn type_token(sql_type: SqlType) -> &'static str {
        match sql_type {
            SqlType::Integer | SqlType::BigInt | SqlType::Boolean => "INTEGER",
            SqlType::Double => "REAL",
            // timestamps and JSON are stored as text
            SqlType::Text | SqlType::Timestamp | SqlType::Json => "TEXT",
            SqlType::Blob => "BLOB",
            SqlType::Custom(token) => token,
        }
    }
}

impl ColumnCreator for SqliteColumns {
    fn build_column(
        &self,
        column: &ColumnSpec,
        builder: &QueryBuilder,
    ) -> Result<String, SqlModelError> {
        let mut clause = format!(
            "{} {}",
            builder.quote_identifier(&column.name),
            Self::type_token(column.sql_type)
        );
        if column.primary_key {
            clause.push_str(" PRIMARY KEY");
        }
        if column.auto_increment {
            if !(column.primary_key && column.sql_type.is_integer()) {
                return Err(SqlModelError::QueryBuildFailure(format!(
                    "SQLite AUTOINCREMENT needs an integer primary key, column `{}`",
                    column.name
                )));
            }
            clause.push_str(" AUTOINCREMENT");
        }
        if !column.nullable {
            clause.push_str(" NOT NULL");
        }
        Ok(clause)
    }
}

/// `PostgreSQL` column clauses; auto-increment columns become `SERIAL`/`BIGSERIAL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresColumns;

impl PostgresColumns {
    fn type_token(column: &ColumnSpec) -> Result<&'static str, SqlModelError> {
        if column.auto_increment {
            return match column.sql_type {
                SqlType::Integer => Ok("SERIAL"),
                SqlType::BigInt => Ok("BIGSERIAL"),
                other => Err(SqlModelError::QueryBuildFailure(format!(
                    "cannot auto-increment {} column `{}`",
                    other.token(),
                    column.name
                ))),
            };
        }
        Ok(match column.sql_type {
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Double => "DOUBLE PRECISION",
            SqlType::Text => "TEXT",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Json => "JSONB",
            SqlType::Blob => "BYTEA",
            SqlType::Custom(token) => token,
        })
    }
}

impl ColumnCreator for PostgresColumns {
    fn build_column(
        &self,
        column: &ColumnSpec,
        builder: &QueryBuilder,
    ) -> Result<String, SqlModelError> {
        let mut clause = format!(
            "{} {}",
            builder.quote_identifier(&column.name),
            Self::type_token(column)?
        );
        if column.primary_key {
            clause.push_str(" PRIMARY KEY");
        }
        if !column.nullable {
            clause.push_str(" NOT NULL");
        }
        Ok(clause)
    }
}
