//! Schema derivation: from a model's field declarations to ordered column specs.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::coding::ValueCoding;
use crate::error::SqlModelError;
use crate::model::Model;
use crate::sensing::{FieldDescriptor, TypeSensor};
use crate::types::SqlType;

/// One derived table column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSpec {
    pub name: String,
    pub sql_type: SqlType,
    pub coding: ValueCoding,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
}

impl ColumnSpec {
    fn from_descriptor(name: &str, descriptor: FieldDescriptor) -> Self {
        Self {
            name: name.to_string(),
            sql_type: descriptor.sql_type,
            coding: descriptor.coding,
            nullable: descriptor.nullable,
            primary_key: false,
            auto_increment: false,
        }
    }
}

/// The derived schema of one model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub id_column: String,
    /// Declaration order; a synthetic identifier column, if any, is last.
    pub columns: Vec<ColumnSpec>,
    /// Whether the identifier column was added rather than declared as a field.
    pub synthetic_id: bool,
}

impl TableSchema {
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The identifier column.
    #[must_use]
    pub fn id_spec(&self) -> Option<&ColumnSpec> {
        self.column(&self.id_column)
    }

    /// Columns backed by declared fields (everything but a synthetic identifier).
    pub fn field_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        let take = if self.synthetic_id {
            self.columns.len().saturating_sub(1)
        } else {
            self.columns.len()
        };
        self.columns.iter().take(take)
    }
}

/// Derive the column specs for `M`.
///
/// # Errors
///
/// Returns `SqlModelError::TypeNotSensable` if a field's type cannot be sensed and
/// `SqlModelError::DuplicateColumnName` if two fields share a column name (compared
/// case-insensitively).
pub fn derive_schema<M: Model>(sensor: &TypeSensor) -> Result<TableSchema, SqlModelError> {
    let id_name = M::ID_COLUMN_NAME;
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    let mut has_id_field = false;

    for decl in M::fields() {
        let descriptor = sensor.sense(&decl)?;
        if !seen.insert(decl.name.to_ascii_lowercase()) {
            return Err(SqlModelError::DuplicateColumnName(decl.name.to_string()));
        }

        let mut column = ColumnSpec::from_descriptor(decl.name, descriptor);
        if decl.name == id_name {
            has_id_field = true;
            column.primary_key = true;
            column.nullable = false;
            column.auto_increment = descriptor.sql_type.is_integer();
        }
        columns.push(column);
    }

    if !has_id_field {
        if !seen.insert(id_name.to_ascii_lowercase()) {
            return Err(SqlModelError::DuplicateColumnName(id_name.to_string()));
        }
        let mut id = ColumnSpec::from_descriptor(id_name, M::ID_COLUMN_TYPE);
        id.primary_key = true;
        id.auto_increment = M::ID_COLUMN_TYPE.sql_type.is_integer();
        // an auto-increment key carries no explicit NOT NULL; any other key must be supplied
        id.nullable = id.auto_increment;
        columns.push(id);
    }

    tracing::debug!(
        table = M::TABLE_NAME,
        columns = columns.len(),
        synthetic_id = !has_id_field,
        "derived table schema"
    );

    Ok(TableSchema {
        table_name: M::TABLE_NAME.to_string(),
        id_column: id_name.to_string(),
        columns,
        synthetic_id: !has_id_field,
    })
}

/// Process-lifetime cache of derived schemas, keyed by model type.
///
/// Derivation runs outside the lock; when two callers race on the same type the last insert
/// wins, which is harmless because derivation is deterministic.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: RwLock<HashMap<TypeId, Arc<TableSchema>>>,
}

impl SchemaCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get<M: Model>(&self) -> Option<Arc<TableSchema>> {
        let schemas = match self.schemas.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        schemas.get(&TypeId::of::<M>()).cloned()
    }

    /// Return the cached schema for `M`, deriving it on first use.
    ///
    /// # Errors
    ///
    /// Propagates derivation errors; nothing is cached on failure.
    pub fn get_or_derive<M: Model>(
        &self,
        sensor: &TypeSensor,
    ) -> Result<Arc<TableSchema>, SqlModelError> {
        if let Some(schema) = self.get::<M>() {
            return Ok(schema);
        }

        let derived = Arc::new(derive_schema::<M>(sensor)?);
        let mut schemas = match self.schemas.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if schemas
            .insert(TypeId::of::<M>(), Arc::clone(&derived))
            .is_some()
        {
            tracing::warn!(table = M::TABLE_NAME, "schema derived concurrently; replaced");
        }
        Ok(derived)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self.schemas.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
