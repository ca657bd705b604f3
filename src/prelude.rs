//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::impl_model;

pub use crate::coding::{BinaryCodable, ValueCoding};
pub use crate::decode::{DecodedRow, decode_row};
pub use crate::error::SqlModelError;
pub use crate::executor::{Executor, QueryResult};
pub use crate::model::Model;
pub use crate::query::QueryAndParams;
pub use crate::query_builder::{ColumnCreator, Filter, PlaceholderStyle, QueryBuilder};
pub use crate::registry::ModelRegistry;
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::schema::{ColumnSpec, TableSchema, derive_schema};
pub use crate::sensing::{FieldDecl, FieldDescriptor, FieldType, TypeSensor, sense};
pub use crate::types::{DatabaseType, RowValues, SqlType};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteExecutor, SqliteOptions};
