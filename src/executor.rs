use async_trait::async_trait;

use crate::error::SqlModelError;
use crate::query::QueryAndParams;
use crate::query_builder::QueryBuilder;
use crate::results::ResultSet;
use crate::types::RowValues;

/// What an execution collaborator hands back for one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// The statement ran and produced nothing of interest.
    SuccessNoData,
    /// The statement produced a single value, e.g. the identifier of an inserted row.
    Success(RowValues),
    /// The statement produced rows.
    ResultSet(ResultSet),
}

/// Runs synthesized statements against a database.
///
/// The collaborator owns its connection and its dialect; model operations take it
/// explicitly rather than looking up a process-wide database.
#[async_trait]
pub trait Executor: Send {
    /// Dialect used to synthesize statements for this collaborator.
    fn query_builder(&self) -> &QueryBuilder;

    /// Execute one statement with its positional parameters.
    ///
    /// # Errors
    /// Returns `SqlModelError::ExecutionError` carrying the collaborator's own error.
    async fn execute(&mut self, query: &QueryAndParams) -> Result<QueryResult, SqlModelError>;
}
