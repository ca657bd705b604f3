//! Derive SQL tables, statements and parameter bindings from statically declared models,
//! and rebuild typed models from result rows.
//!
//! Field types describe their column through [`FieldType::DESCRIPTOR`], so a schema is
//! derived without ever holding a value. Byte fields pick a [`ValueCoding`]: types that
//! implement [`BinaryCodable`] travel as blobs, plain `Vec<u8>` as base64 text.
//!
//! ```rust
//! use sql_model::prelude::*;
//!
//! pub struct Person {
//!     pub name: String,
//!     pub photo: Vec<u8>,
//! }
//! impl_model!(Person, "People", { name: String, photo: Vec<u8> });
//!
//! let schema = derive_schema::<Person>(&TypeSensor::new()).unwrap();
//! let create = QueryBuilder::default().create_table(&schema).unwrap();
//! assert_eq!(
//!     create.query,
//!     "CREATE TABLE \"People\" (\"name\" TEXT NOT NULL, \"photo\" TEXT NOT NULL, \"id\" BIGINT AUTO_INCREMENT PRIMARY KEY)"
//! );
//! ```

pub mod coding;
pub mod decode;
pub mod error;
pub mod executor;
pub mod model;
pub mod prelude;
pub mod query;
pub mod query_builder;
pub mod registry;
pub mod results;
pub mod schema;
pub mod sensing;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use coding::{BinaryCodable, ValueCoding};
pub use decode::{DecodedRow, decode_id, decode_row};
pub use error::{BoxError, SqlModelError};
pub use executor::{Executor, QueryResult};
pub use model::Model;
pub use query::QueryAndParams;
pub use query_builder::{
    ColumnCreator, Filter, GenericColumns, PlaceholderStyle, PostgresColumns, QueryBuilder,
    SqliteColumns,
};
pub use registry::ModelRegistry;
pub use results::{CustomDbRow, ResultSet};
pub use schema::{ColumnSpec, SchemaCache, TableSchema, derive_schema};
pub use sensing::{FieldDecl, FieldDescriptor, FieldSource, FieldType, TypeSensor, sense};
pub use types::{DatabaseType, RowValues, SqlType};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteExecutor, SqliteOptions, SqliteOptionsBuilder};
