use thiserror::Error;

/// Boxed error payload handed back by an execution collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SqlModelError {
    #[error("Cannot sense column type for field `{field}` (type `{type_name}`)")]
    TypeNotSensable { field: String, type_name: String },

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Missing column in result row: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column `{column}`: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("Query build error: {0}")]
    QueryBuildFailure(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(#[source] BoxError),
}

impl SqlModelError {
    /// Wrap a collaborator error without altering it.
    pub fn execution(err: impl Into<BoxError>) -> Self {
        SqlModelError::ExecutionError(err.into())
    }

    pub(crate) fn mismatch(column: &str, expected: &'static str, found: impl Into<String>) -> Self {
        SqlModelError::TypeMismatch {
            column: column.to_string(),
            expected,
            found: found.into(),
        }
    }
}
