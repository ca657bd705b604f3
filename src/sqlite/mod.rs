//! Bundled `SQLite` execution collaborator.
//!
//! - config: open options and the fluent builder
//! - params: `RowValues` to `SQLite` parameter conversion
//! - query: result-set extraction
//! - executor: the `Executor` implementation

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use executor::SqliteExecutor;
pub use params::Params;
pub use query::build_result_set;
