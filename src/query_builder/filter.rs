use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::SqlModelError;
use crate::types::RowValues;

/// Equality predicates for SELECT/DELETE, kept in declaration order.
///
/// ```rust
/// use serde::Serialize;
/// use sql_model::prelude::*;
///
/// #[derive(Serialize)]
/// struct ByName {
///     name: String,
///     age: Option<i32>,
/// }
///
/// let filter = Filter::from_params(&ByName { name: "Joe".into(), age: None }).unwrap();
/// // `None` members are left out
/// assert_eq!(filter.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, RowValues)>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value`; a NULL value becomes `column IS NULL`.
    #[must_use]
    pub fn equal(mut self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    /// Build a filter from a serializable struct or map of scalars.
    ///
    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` if `params` does not serialize to an object,
    /// holds a nested object or a non-byte array, or holds an integer outside `i64`.
    pub fn from_params<T: Serialize + ?Sized>(params: &T) -> Result<Self, SqlModelError> {
        let value = serde_json::to_value(params)
            .map_err(|e| SqlModelError::QueryBuildFailure(e.to_string()))?;
        let JsonValue::Object(members) = value else {
            return Err(SqlModelError::QueryBuildFailure(
                "filter parameters must serialize to a struct or map".to_string(),
            ));
        };

        let mut filter = Filter::new();
        for (column, member) in members {
            let value = match member {
                JsonValue::Null => continue,
                JsonValue::Bool(b) => RowValues::Bool(b),
                JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
                    (Some(i), _) => RowValues::Int(i),
                    (None, Some(f)) if n.is_f64() => RowValues::Float(f),
                    _ => {
                        return Err(SqlModelError::QueryBuildFailure(format!(
                            "filter member `{column}` is out of range: {n}"
                        )));
                    }
                },
                JsonValue::String(s) => RowValues::Text(s),
                // byte buffers serialize as arrays of small integers
                JsonValue::Array(items) => match bytes_of(&items) {
                    Some(bytes) => RowValues::Blob(bytes),
                    None => {
                        return Err(SqlModelError::QueryBuildFailure(format!(
                            "filter member `{column}` is neither a scalar nor bytes"
                        )));
                    }
                },
                JsonValue::Object(_) => {
                    return Err(SqlModelError::QueryBuildFailure(format!(
                        "filter member `{column}` is not a scalar"
                    )));
                }
            };
            filter.conditions.push((column, value));
        }
        Ok(filter)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.conditions.iter().map(|(c, v)| (c.as_str(), v))
    }
}

fn bytes_of(items: &[JsonValue]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
        .collect()
}
