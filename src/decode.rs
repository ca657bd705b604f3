//! Row decoding: rebuilding models from result rows.

use std::collections::HashMap;

use crate::error::SqlModelError;
use crate::model::Model;
use crate::results::CustomDbRow;
use crate::schema::TableSchema;
use crate::sensing::FieldType;
use crate::types::RowValues;

/// Raw field values for one row, already passed through each column's coding.
#[derive(Debug, Clone, Default)]
pub struct DecodedRow {
    values: HashMap<String, RowValues>,
}

impl DecodedRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, raw: RowValues) {
        self.values.insert(column.into(), raw);
    }

    /// Move a field out of the row and convert it to `T`.
    ///
    /// # Errors
    ///
    /// Returns `SqlModelError::MissingColumn` if the column is absent (or already taken), and
    /// `SqlModelError::TypeMismatch` if the value does not convert to `T`.
    pub fn take<T: FieldType>(&mut self, column: &str) -> Result<T, SqlModelError> {
        let raw = self
            .values
            .remove(column)
            .ok_or_else(|| SqlModelError::MissingColumn(column.to_string()))?;
        T::from_raw(column, raw)
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RowValues> {
        self.values.get(column)
    }
}

/// Decode one row into `M`, matching values to fields by column title.
///
/// The synthetic identifier column is not needed to rebuild the model and may be absent.
///
/// # Errors
///
/// Returns `SqlModelError::MissingColumn` if a field's title is not in the row and
/// `SqlModelError::TypeMismatch` if a value fails its column's coding or type conversion.
pub fn decode_row<M: Model>(schema: &TableSchema, row: &CustomDbRow) -> Result<M, SqlModelError> {
    let mut decoded = DecodedRow::new();
    for column in schema.field_columns() {
        let stored = row
            .get(&column.name)
            .ok_or_else(|| SqlModelError::MissingColumn(column.name.clone()))?;
        let raw = column.coding.decode(&column.name, stored.clone())?;
        decoded.insert(column.name.clone(), raw);
    }
    M::from_row(&mut decoded)
}

/// Read the identifier value of a row, if the row carries one.
///
/// # Errors
///
/// Returns `SqlModelError::TypeMismatch` if the identifier fails its column's coding.
pub fn decode_id(schema: &TableSchema, row: &CustomDbRow) -> Result<Option<RowValues>, SqlModelError> {
    let Some(id) = schema.id_spec() else {
        return Ok(None);
    };
    match row.get(&id.name) {
        Some(stored) => id.coding.decode(&id.name, stored.clone()).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sensing::TypeSensor;

    #[derive(Debug, PartialEq)]
    struct Person {
        name: String,
        data: Vec<u8>,
        age: Option<i32>,
    }
    crate::impl_model!(Person, "People", { name: String, data: Vec<u8>, age: Option<i32> });

    fn schema() -> TableSchema {
        crate::schema::derive_schema::<Person>(&TypeSensor::new()).unwrap()
    }

    fn row(titles: &[&str], values: Vec<RowValues>) -> CustomDbRow {
        CustomDbRow::new(
            Arc::new(titles.iter().map(|t| t.to_string()).collect()),
            values,
        )
    }

    #[test]
    fn decodes_by_title_in_any_order() {
        let row = row(
            &["age", "data", "id", "name"],
            vec![
                RowValues::Null,
                RowValues::Text("MTIzNDU2Nzg5MA==".into()),
                RowValues::Int(1),
                RowValues::Text("Joe".into()),
            ],
        );
        let person: Person = decode_row(&schema(), &row).unwrap();
        assert_eq!(
            person,
            Person {
                name: "Joe".into(),
                data: b"1234567890".to_vec(),
                age: None,
            }
        );
        assert_eq!(decode_id(&schema(), &row).unwrap(), Some(RowValues::Int(1)));
    }

    #[test]
    fn synthetic_id_may_be_absent() {
        let row = row(
            &["name", "data", "age"],
            vec![
                RowValues::Text("Joe".into()),
                RowValues::Text(String::new()),
                RowValues::Int(38),
            ],
        );
        let person: Person = decode_row(&schema(), &row).unwrap();
        assert_eq!(person.age, Some(38));
        assert!(person.data.is_empty());
        assert_eq!(decode_id(&schema(), &row).unwrap(), None);
    }

    #[test]
    fn missing_field_title_fails() {
        let row = row(&["id", "name"], vec![RowValues::Int(1), RowValues::Text("Joe".into())]);
        let err = decode_row::<Person>(&schema(), &row).unwrap_err();
        assert!(matches!(err, SqlModelError::MissingColumn(ref c) if c == "data"));
    }

    #[test]
    fn take_moves_values_out() {
        let mut decoded = DecodedRow::new();
        decoded.insert("name", RowValues::Text("Joe".into()));
        assert_eq!(decoded.get("name"), Some(&RowValues::Text("Joe".into())));
        assert_eq!(decoded.take::<String>("name").unwrap(), "Joe");
        assert!(matches!(
            decoded.take::<String>("name"),
            Err(SqlModelError::MissingColumn(_))
        ));
    }
}
