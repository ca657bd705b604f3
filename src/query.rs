use crate::types::RowValues;

/// A synthesized statement and the positional values bound to it.
///
/// Placeholder `N` (`?N` or `$N`, depending on the dialect) refers to `params[N - 1]`:
/// ```rust
/// use sql_model::prelude::*;
///
/// let qp = QueryAndParams::new(
///     "INSERT INTO \"t\" (\"id\", \"name\") VALUES (?1, ?2)",
///     vec![RowValues::Int(1), RowValues::Text("alice".into())],
/// );
/// assert_eq!(qp.params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    pub query: String,
    /// Already coded for their columns; collaborators bind them as-is.
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// A statement that binds nothing, such as `DROP TABLE` or an unfiltered `SELECT`.
    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new())
    }
}
