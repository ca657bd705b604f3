//! Type sensing: learning a field's column type and coding from its type alone.
//!
//! Every field type carries a [`FieldDescriptor`] as an associated constant, so schema
//! derivation never needs a value of the type. Fields whose Rust type is only known by name
//! (for example, domain aliases declared outside the model) are resolved through a
//! [`TypeSensor`] when the model is registered.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::coding::{BinaryCodable, ValueCoding};
use crate::error::SqlModelError;
use crate::types::{RowValues, SqlType};

/// What sensing a field type yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub sql_type: SqlType,
    pub coding: ValueCoding,
    pub nullable: bool,
}

impl FieldDescriptor {
    /// A required column coded natively.
    #[must_use]
    pub const fn native(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            coding: ValueCoding::Native,
            nullable: false,
        }
    }

    /// The same column, but allowed to hold NULL.
    #[must_use]
    pub const fn optional(self) -> Self {
        Self {
            sql_type: self.sql_type,
            coding: self.coding,
            nullable: true,
        }
    }
}

/// A type usable as a model field.
///
/// `DESCRIPTOR` is read at schema-derivation time; `to_raw` and `from_raw` move values across
/// the coding boundary. The raw value is what the column's [`ValueCoding`] consumes: native
/// values as-is, and byte payloads as [`RowValues::Blob`].
pub trait FieldType: Sized {
    const DESCRIPTOR: FieldDescriptor;

    fn to_raw(&self) -> RowValues;

    /// # Errors
    ///
    /// Returns `SqlModelError::TypeMismatch` when `raw` does not have the expected shape.
    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError>;
}

/// Sense a field type without constructing a value of it.
#[must_use]
pub fn sense<T: FieldType>() -> FieldDescriptor {
    T::DESCRIPTOR
}

impl FieldType for String {
    const DESCRIPTOR: FieldDescriptor = FieldDescriptor::native(SqlType::Text);

    fn to_raw(&self) -> RowValues {
        RowValues::Text(self.clone())
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        match raw {
            RowValues::Text(s) => Ok(s),
            other => Err(SqlModelError::mismatch(column, "text", other.kind_name())),
        }
    }
}

impl FieldType for i64 {
    const DESCRIPTOR: FieldDescriptor = FieldDescriptor::native(SqlType::BigInt);

    fn to_raw(&self) -> RowValues {
        RowValues::Int(*self)
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        match raw {
            RowValues::Int(i) => Ok(i),
            other => Err(SqlModelError::mismatch(column, "integer", other.kind_name())),
        }
    }
}

impl FieldType for i32 {
    const DESCRIPTOR: FieldDescriptor = FieldDescriptor::native(SqlType::Integer);

    fn to_raw(&self) -> RowValues {
        RowValues::Int(i64::from(*self))
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        match raw {
            RowValues::Int(i) => i32::try_from(i)
                .map_err(|_| SqlModelError::mismatch(column, "32-bit integer", i.to_string())),
            other => Err(SqlModelError::mismatch(column, "integer", other.kind_name())),
        }
    }
}

impl FieldType for f64 {
    const DESCRIPTOR: FieldDescriptor = FieldDescriptor::native(SqlType::Double);

    fn to_raw(&self) -> RowValues {
        RowValues::Float(*self)
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        raw.as_float()
            .ok_or_else(|| SqlModelError::mismatch(column, "float", raw.kind_name()))
    }
}

impl FieldType for bool {
    const DESCRIPTOR: FieldDescriptor = FieldDescriptor::native(SqlType::Boolean);

    fn to_raw(&self) -> RowValues {
        RowValues::Bool(*self)
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        raw.as_bool()
            .ok_or_else(|| SqlModelError::mismatch(column, "boolean", raw.kind_name()))
    }
}

impl FieldType for NaiveDateTime {
    const DESCRIPTOR: FieldDescriptor = FieldDescriptor::native(SqlType::Timestamp);

    fn to_raw(&self) -> RowValues {
        RowValues::Timestamp(*self)
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        raw.as_timestamp()
            .ok_or_else(|| SqlModelError::mismatch(column, "timestamp", raw.kind_name()))
    }
}

impl FieldType for JsonValue {
    const DESCRIPTOR: FieldDescriptor = FieldDescriptor::native(SqlType::Json);

    fn to_raw(&self) -> RowValues {
        RowValues::JSON(self.clone())
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        match raw {
            RowValues::JSON(v) => Ok(v),
            // drivers without a JSON type hand it back as text
            RowValues::Text(s) => serde_json::from_str(&s)
                .map_err(|e| SqlModelError::mismatch(column, "json", e.to_string())),
            other => Err(SqlModelError::mismatch(column, "json", other.kind_name())),
        }
    }
}

/// Plain byte vectors keep the base64 text layout; wrap them in a [`BinaryCodable`] type to
/// get binary parameters instead.
impl FieldType for Vec<u8> {
    const DESCRIPTOR: FieldDescriptor = FieldDescriptor {
        sql_type: SqlType::Text,
        coding: ValueCoding::Base64Text,
        nullable: false,
    };

    fn to_raw(&self) -> RowValues {
        RowValues::Blob(self.clone())
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        match raw {
            RowValues::Blob(bytes) => Ok(bytes),
            other => Err(SqlModelError::mismatch(column, "bytes", other.kind_name())),
        }
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const DESCRIPTOR: FieldDescriptor = T::DESCRIPTOR.optional();

    fn to_raw(&self) -> RowValues {
        match self {
            Some(value) => value.to_raw(),
            None => RowValues::Null,
        }
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        if raw.is_null() {
            Ok(None)
        } else {
            T::from_raw(column, raw).map(Some)
        }
    }
}

impl<T: BinaryCodable> FieldType for T {
    const DESCRIPTOR: FieldDescriptor = FieldDescriptor {
        sql_type: T::SQL_TYPE,
        coding: ValueCoding::Binary,
        nullable: false,
    };

    fn to_raw(&self) -> RowValues {
        RowValues::Blob(self.to_sql_binary())
    }

    fn from_raw(column: &str, raw: RowValues) -> Result<Self, SqlModelError> {
        match raw {
            RowValues::Blob(bytes) => Ok(T::from_sql_binary(bytes)),
            other => Err(SqlModelError::mismatch(column, "blob", other.kind_name())),
        }
    }
}

/// Where a field's descriptor comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Known from the field's Rust type.
    Static(FieldDescriptor),
    /// Resolved by name through a [`TypeSensor`].
    Named(&'static str),
}

/// One declared field of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub source: FieldSource,
}

impl FieldDecl {
    #[must_use]
    pub fn of<T: FieldType>(name: &'static str) -> Self {
        Self {
            name,
            source: FieldSource::Static(sense::<T>()),
        }
    }

    #[must_use]
    pub fn named(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            source: FieldSource::Named(type_name),
        }
    }
}

/// Registration-time table of field type names.
#[derive(Debug, Clone)]
pub struct TypeSensor {
    named: HashMap<String, FieldDescriptor>,
}

impl Default for TypeSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSensor {
    /// A sensor that knows the built-in field types.
    #[must_use]
    pub fn new() -> Self {
        let mut sensor = Self {
            named: HashMap::new(),
        };
        sensor.register::<String>("String");
        sensor.register::<i32>("i32");
        sensor.register::<i64>("i64");
        sensor.register::<f64>("f64");
        sensor.register::<bool>("bool");
        sensor.register::<Vec<u8>>("Vec<u8>");
        sensor.register::<NaiveDateTime>("NaiveDateTime");
        sensor.register::<JsonValue>("Value");
        sensor
    }

    /// Make `T` resolvable under `type_name`.
    pub fn register<T: FieldType>(&mut self, type_name: impl Into<String>) {
        self.register_descriptor(type_name, sense::<T>());
    }

    /// Make a bare descriptor resolvable under `type_name`. A later registration wins.
    pub fn register_descriptor(&mut self, type_name: impl Into<String>, descriptor: FieldDescriptor) {
        self.named.insert(type_name.into(), descriptor);
    }

    /// Resolve a type name; `Option<X>` resolves to a nullable `X`.
    #[must_use]
    pub fn lookup(&self, type_name: &str) -> Option<FieldDescriptor> {
        let type_name = type_name.trim();
        if let Some(found) = self.named.get(type_name) {
            return Some(*found);
        }
        type_name
            .strip_prefix("Option<")
            .and_then(|rest| rest.strip_suffix('>'))
            .and_then(|inner| self.lookup(inner))
            .map(FieldDescriptor::optional)
    }

    /// Sense one declared field.
    ///
    /// # Errors
    ///
    /// Returns `SqlModelError::TypeNotSensable` if the field names a type this sensor does not
    /// know.
    pub fn sense(&self, decl: &FieldDecl) -> Result<FieldDescriptor, SqlModelError> {
        match &decl.source {
            FieldSource::Static(descriptor) => Ok(*descriptor),
            FieldSource::Named(type_name) => {
                self.lookup(type_name)
                    .ok_or_else(|| SqlModelError::TypeNotSensable {
                        field: decl.name.to_string(),
                        type_name: (*type_name).to_string(),
                    })
            }
        }
    }
}
