//! Value coding: how a field's raw value travels to and from the database.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::SqlModelError;
use crate::types::{RowValues, SqlType};

/// Coding strategy for one column, fixed when the schema is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCoding {
    /// The raw value is handed to the driver unchanged.
    Native,
    /// Raw bytes are bound as a binary parameter.
    Binary,
    /// Raw bytes are stored as base64 text, for columns that predate binary parameters.
    Base64Text,
}

impl ValueCoding {
    /// Turn a field's raw value into the value bound as a parameter.
    #[must_use]
    pub fn encode(self, raw: RowValues) -> RowValues {
        match (self, raw) {
            (ValueCoding::Base64Text, RowValues::Blob(bytes)) => {
                RowValues::Text(BASE64.encode(bytes))
            }
            (_, raw) => raw,
        }
    }

    /// Turn a value read from a row back into the field's raw value.
    ///
    /// # Errors
    ///
    /// Returns `SqlModelError::TypeMismatch` if the stored value does not have the shape this
    /// strategy expects, or if base64 text fails to decode.
    pub fn decode(self, column: &str, stored: RowValues) -> Result<RowValues, SqlModelError> {
        match (self, stored) {
            (_, RowValues::Null) => Ok(RowValues::Null),
            (ValueCoding::Native, stored) => Ok(stored),
            (ValueCoding::Binary, RowValues::Blob(bytes)) => Ok(RowValues::Blob(bytes)),
            (ValueCoding::Binary, other) => {
                Err(SqlModelError::mismatch(column, "blob", other.kind_name()))
            }
            (ValueCoding::Base64Text, RowValues::Text(text)) => BASE64
                .decode(text.as_bytes())
                .map(RowValues::Blob)
                .map_err(|e| SqlModelError::mismatch(column, "base64 text", e.to_string())),
            (ValueCoding::Base64Text, other) => {
                Err(SqlModelError::mismatch(column, "base64 text", other.kind_name()))
            }
        }
    }
}

/// Types that travel to the database as raw binary.
///
/// Implementing this trait is how a field type opts into [`ValueCoding::Binary`]; every
/// `BinaryCodable` type is usable as a model field.
/// ```rust
/// use sql_model::prelude::*;
///
/// #[derive(Debug, PartialEq)]
/// struct Digest([u8; 4]);
///
/// impl BinaryCodable for Digest {
///     fn to_sql_binary(&self) -> Vec<u8> {
///         self.0.to_vec()
///     }
///
///     fn from_sql_binary(bytes: Vec<u8>) -> Self {
///         let mut out = [0u8; 4];
///         for (slot, b) in out.iter_mut().zip(bytes) {
///             *slot = b;
///         }
///         Digest(out)
///     }
/// }
///
/// assert_eq!(sense::<Digest>().coding, ValueCoding::Binary);
/// ```
pub trait BinaryCodable: Sized {
    /// Column type used when creating the table.
    const SQL_TYPE: SqlType = SqlType::Blob;

    /// Encode this value to binary data for the database.
    fn to_sql_binary(&self) -> Vec<u8>;

    /// Rebuild the value from binary data fetched from the database.
    fn from_sql_binary(bytes: Vec<u8>) -> Self;
}
