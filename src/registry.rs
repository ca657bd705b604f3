//! Model operations over an explicitly passed execution collaborator.

use std::sync::Arc;

use crate::decode::{decode_id, decode_row};
use crate::error::SqlModelError;
use crate::executor::{Executor, QueryResult};
use crate::model::Model;
use crate::query_builder::Filter;
use crate::results::ResultSet;
use crate::schema::{SchemaCache, TableSchema};
use crate::sensing::TypeSensor;
use crate::types::RowValues;

/// Registered model schemas plus the type names they may refer to.
///
/// There is no process-wide database: every operation takes the [`Executor`] to run on, and
/// statements are synthesized with that executor's [`QueryBuilder`](crate::QueryBuilder).
///
/// ```rust,no_run
/// use sql_model::prelude::*;
///
/// pub struct Person {
///     pub name: String,
///     pub age: i32,
/// }
/// impl_model!(Person, "People", { name: String, age: i32 });
///
/// # async fn run(conn: &mut impl Executor) -> Result<(), SqlModelError> {
/// let registry = ModelRegistry::new();
/// registry.register::<Person>()?;
/// registry.create_table::<Person, _>(conn).await?;
/// registry.save(conn, Person { name: "Joe".into(), age: 38 }).await?;
/// let people: Vec<Person> = registry.find_all(conn).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ModelRegistry {
    sensor: TypeSensor,
    cache: SchemaCache,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a sensor that knows extra named field types.
    #[must_use]
    pub fn with_sensor(sensor: TypeSensor) -> Self {
        Self {
            sensor,
            cache: SchemaCache::new(),
        }
    }

    #[must_use]
    pub fn sensor(&self) -> &TypeSensor {
        &self.sensor
    }

    /// Derive and cache the schema of `M` up front.
    ///
    /// # Errors
    /// Returns `SqlModelError::TypeNotSensable` or `SqlModelError::DuplicateColumnName` if
    /// the model's declaration cannot be turned into a table.
    pub fn register<M: Model>(&self) -> Result<Arc<TableSchema>, SqlModelError> {
        let schema = self.cache.get_or_derive::<M>(&self.sensor)?;
        tracing::debug!(table = %schema.table_name, "registered model");
        Ok(schema)
    }

    /// The schema of `M`, derived on first use.
    ///
    /// # Errors
    /// Same as [`register`](Self::register).
    pub fn schema<M: Model>(&self) -> Result<Arc<TableSchema>, SqlModelError> {
        self.cache.get_or_derive::<M>(&self.sensor)
    }

    /// # Errors
    /// Returns schema, statement or execution errors.
    pub async fn create_table<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
    ) -> Result<(), SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor.query_builder().create_table(&schema)?;
        executor.execute(&query).await?;
        Ok(())
    }

    /// # Errors
    /// Returns schema or execution errors.
    pub async fn drop_table<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
    ) -> Result<(), SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor.query_builder().drop_table(&schema);
        executor.execute(&query).await?;
        Ok(())
    }

    /// Insert `model` and hand it back.
    ///
    /// # Errors
    /// Returns schema, statement or execution errors.
    pub async fn save<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        model: M,
    ) -> Result<M, SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor
            .query_builder()
            .insert(&schema, model.to_values(), None)?;
        executor.execute(&query).await?;
        Ok(model)
    }

    /// Insert `model` under the identifier `id`.
    ///
    /// This is how models whose synthetic identifier does not auto-increment (e.g. a text
    /// key) get stored; for an auto-increment key it overrides the generated value. When the
    /// identifier is a declared field, the field's value is stored and `id` is ignored.
    ///
    /// # Errors
    /// Returns schema, statement or execution errors.
    pub async fn save_with_id<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        id: impl Into<RowValues> + Send,
        model: M,
    ) -> Result<M, SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor
            .query_builder()
            .insert(&schema, model.to_values(), Some(id.into()))?;
        executor.execute(&query).await?;
        Ok(model)
    }

    /// Insert `model` and return the identifier the database assigned.
    ///
    /// The identifier is taken from a single returned value or from the identifier column of
    /// the first returned row.
    ///
    /// # Errors
    /// Returns `SqlModelError::ExecutionError` if the collaborator reports no identifier, plus
    /// any schema, statement or execution error.
    pub async fn save_returning_id<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        model: M,
    ) -> Result<(RowValues, M), SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor
            .query_builder()
            .insert_returning_id(&schema, model.to_values(), None)?;
        let id = match executor.execute(&query).await? {
            QueryResult::Success(id) => Some(id),
            QueryResult::ResultSet(rs) => match rs.results.first() {
                Some(row) => decode_id(&schema, row)?,
                None => None,
            },
            QueryResult::SuccessNoData => None,
        };
        let id = id.ok_or_else(|| {
            SqlModelError::execution(format!(
                "insert into `{}` returned no identifier",
                schema.table_name
            ))
        })?;
        Ok((id, model))
    }

    /// # Errors
    /// Returns decode errors for a returned row, plus any schema, statement or execution
    /// error.
    pub async fn find<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        id: impl Into<RowValues> + Send,
    ) -> Result<Option<M>, SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor.query_builder().select_by_id(&schema, id.into())?;
        let rows = expect_rows(executor.execute(&query).await?, &schema)?;
        rows.results
            .first()
            .map(|row| decode_row::<M>(&schema, row))
            .transpose()
    }

    /// # Errors
    /// Returns the first decode error, plus any schema or execution error.
    pub async fn find_all<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
    ) -> Result<Vec<M>, SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor.query_builder().select_all(&schema);
        let rows = expect_rows(executor.execute(&query).await?, &schema)?;
        decode_all(&schema, &rows)
    }

    /// Every row with its identifier.
    ///
    /// # Errors
    /// Returns `SqlModelError::MissingColumn` if a row carries no identifier, plus any decode,
    /// schema or execution error.
    pub async fn find_all_with_ids<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
    ) -> Result<Vec<(RowValues, M)>, SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor.query_builder().select_all(&schema);
        let rows = expect_rows(executor.execute(&query).await?, &schema)?;
        rows.results
            .iter()
            .map(|row| -> Result<(RowValues, M), SqlModelError> {
                let id = decode_id(&schema, row)?
                    .ok_or_else(|| SqlModelError::MissingColumn(schema.id_column.clone()))?;
                Ok((id, decode_row::<M>(&schema, row)?))
            })
            .collect()
    }

    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` for unknown filter columns, plus any decode,
    /// schema or execution error.
    pub async fn find_all_matching<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        filter: &Filter,
    ) -> Result<Vec<M>, SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor.query_builder().select_matching(&schema, filter)?;
        let rows = expect_rows(executor.execute(&query).await?, &schema)?;
        decode_all(&schema, &rows)
    }

    /// Overwrite the row identified by `id` with `model` and hand the model back.
    ///
    /// # Errors
    /// Returns schema, statement or execution errors.
    pub async fn update<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        id: impl Into<RowValues> + Send,
        model: M,
    ) -> Result<M, SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor
            .query_builder()
            .update(&schema, id.into(), model.to_values())?;
        executor.execute(&query).await?;
        Ok(model)
    }

    /// # Errors
    /// Returns schema, statement or execution errors.
    pub async fn delete<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        id: impl Into<RowValues> + Send,
    ) -> Result<(), SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor.query_builder().delete_by_id(&schema, id.into())?;
        executor.execute(&query).await?;
        Ok(())
    }

    /// # Errors
    /// Returns schema or execution errors.
    pub async fn delete_all<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
    ) -> Result<(), SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor.query_builder().delete_all(&schema);
        executor.execute(&query).await?;
        Ok(())
    }

    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` for unknown filter columns, plus any schema
    /// or execution error.
    pub async fn delete_all_matching<M: Model, E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        filter: &Filter,
    ) -> Result<(), SqlModelError> {
        let schema = self.schema::<M>()?;
        let query = executor.query_builder().delete_matching(&schema, filter)?;
        executor.execute(&query).await?;
        Ok(())
    }
}

/// Rows of a SELECT; no data counts as no rows.
fn expect_rows(result: QueryResult, schema: &TableSchema) -> Result<ResultSet, SqlModelError> {
    match result {
        QueryResult::ResultSet(rs) => Ok(rs),
        QueryResult::SuccessNoData => Ok(ResultSet::default()),
        QueryResult::Success(value) => Err(SqlModelError::execution(format!(
            "select from `{}` returned a single {} value instead of rows",
            schema.table_name,
            value.kind_name()
        ))),
    }
}

fn decode_all<M: Model>(schema: &TableSchema, rows: &ResultSet) -> Result<Vec<M>, SqlModelError> {
    rows.results
        .iter()
        .map(|row| decode_row::<M>(schema, row))
        .collect()
}
