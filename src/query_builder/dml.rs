use std::collections::HashMap;

use crate::error::SqlModelError;
use crate::query::QueryAndParams;
use crate::schema::TableSchema;
use crate::types::RowValues;

use super::{Filter, QueryBuilder, finish};

/// Index model values by column, rejecting names the schema does not know.
fn values_by_column<'v>(
    schema: &TableSchema,
    values: Vec<(&'v str, RowValues)>,
) -> Result<HashMap<&'v str, RowValues>, SqlModelError> {
    let mut by_column = HashMap::with_capacity(values.len());
    for (name, value) in values {
        if schema.column(name).is_none() {
            return Err(SqlModelError::QueryBuildFailure(format!(
                "table `{}` has no column `{name}`",
                schema.table_name
            )));
        }
        by_column.insert(name, value);
    }
    Ok(by_column)
}

impl QueryBuilder {
    /// `INSERT INTO "T" ("a", "b") VALUES (?1, ?2)`.
    ///
    /// `values` are the model's raw field values; each goes through its column's coding. `id`
    /// fills a synthetic identifier column and is ignored when the identifier is a field. The
    /// identifier column is left out when it auto-increments and no identifier is given
    /// (`id` is `None` or the identifier field is NULL).
    ///
    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` if a value names an unknown column, a field
    /// column has no value, or a non-auto-increment synthetic identifier gets no `id`.
    pub fn insert(
        &self,
        schema: &TableSchema,
        values: Vec<(&str, RowValues)>,
        id: Option<RowValues>,
    ) -> Result<QueryAndParams, SqlModelError> {
        self.build_insert(schema, values, id, false)
    }

    /// Like [`insert`](Self::insert), with `RETURNING "<id>"` appended.
    ///
    /// # Errors
    /// Same as [`insert`](Self::insert).
    pub fn insert_returning_id(
        &self,
        schema: &TableSchema,
        values: Vec<(&str, RowValues)>,
        id: Option<RowValues>,
    ) -> Result<QueryAndParams, SqlModelError> {
        self.build_insert(schema, values, id, true)
    }

    fn build_insert(
        &self,
        schema: &TableSchema,
        values: Vec<(&str, RowValues)>,
        id: Option<RowValues>,
        returning: bool,
    ) -> Result<QueryAndParams, SqlModelError> {
        let mut by_column = values_by_column(schema, values)?;
        let mut id = id;
        let mut names = Vec::with_capacity(schema.columns.len());
        let mut placeholders = Vec::with_capacity(schema.columns.len());
        let mut params = Vec::with_capacity(schema.columns.len());

        for column in &schema.columns {
            let is_id = column.name == schema.id_column;
            let value = match by_column.remove(column.name.as_str()) {
                Some(value) => Some(value),
                None if is_id => id.take(),
                None => {
                    return Err(SqlModelError::QueryBuildFailure(format!(
                        "no value for column `{}`",
                        column.name
                    )));
                }
            };

            let value = match value {
                Some(RowValues::Null) | None if is_id && column.auto_increment => continue,
                Some(value) => value,
                None if is_id => {
                    return Err(SqlModelError::QueryBuildFailure(format!(
                        "no identifier given for `{}`, which does not auto-increment",
                        column.name
                    )));
                }
                None => RowValues::Null,
            };

            names.push(self.quote_identifier(&column.name));
            placeholders.push(self.bind(column, value, &mut params));
        }

        let table = self.quote_identifier(&schema.table_name);
        let mut query = if names.is_empty() {
            format!("INSERT INTO {table} DEFAULT VALUES")
        } else {
            format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                names.join(", "),
                placeholders.join(", ")
            )
        };
        if returning {
            query.push_str(" RETURNING ");
            query.push_str(&self.quote_identifier(&schema.id_column));
        }
        Ok(finish(QueryAndParams::new(query, params)))
    }

    /// `UPDATE "T" SET "a" = ?1, "b" = ?2 WHERE "T"."id" = ?3`; the identifier is never set.
    ///
    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` on unknown columns, when nothing is left to
    /// set, or when the schema has no identifier column.
    pub fn update(
        &self,
        schema: &TableSchema,
        id: RowValues,
        values: Vec<(&str, RowValues)>,
    ) -> Result<QueryAndParams, SqlModelError> {
        let mut by_column = values_by_column(schema, values)?;
        let mut params = Vec::new();
        let mut assignments = Vec::new();

        for column in &schema.columns {
            if column.name == schema.id_column {
                continue;
            }
            if let Some(value) = by_column.remove(column.name.as_str()) {
                let placeholder = self.bind(column, value, &mut params);
                assignments.push(format!(
                    "{} = {placeholder}",
                    self.quote_identifier(&column.name)
                ));
            }
        }

        if assignments.is_empty() {
            return Err(SqlModelError::QueryBuildFailure(format!(
                "nothing to update in `{}`",
                schema.table_name
            )));
        }

        let predicate = self.id_predicate(schema, id, &mut params)?;
        Ok(finish(QueryAndParams::new(
            format!(
                "UPDATE {} SET {} WHERE {predicate}",
                self.quote_identifier(&schema.table_name),
                assignments.join(", ")
            ),
            params,
        )))
    }

    /// `DELETE FROM "T" WHERE "T"."id" = ?1`
    ///
    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` if the schema has no identifier column.
    pub fn delete_by_id(
        &self,
        schema: &TableSchema,
        id: RowValues,
    ) -> Result<QueryAndParams, SqlModelError> {
        let mut params = Vec::with_capacity(1);
        let predicate = self.id_predicate(schema, id, &mut params)?;
        Ok(finish(QueryAndParams::new(
            format!(
                "DELETE FROM {} WHERE {predicate}",
                self.quote_identifier(&schema.table_name)
            ),
            params,
        )))
    }

    /// `DELETE FROM "T"`
    #[must_use]
    pub fn delete_all(&self, schema: &TableSchema) -> QueryAndParams {
        finish(QueryAndParams::new_without_params(format!(
            "DELETE FROM {}",
            self.quote_identifier(&schema.table_name)
        )))
    }

    /// `DELETE FROM "T" WHERE ...` with one equality per filter entry.
    ///
    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` if the filter names an unknown column.
    pub fn delete_matching(
        &self,
        schema: &TableSchema,
        filter: &Filter,
    ) -> Result<QueryAndParams, SqlModelError> {
        let mut params = Vec::with_capacity(filter.len());
        let mut query = format!("DELETE FROM {}", self.quote_identifier(&schema.table_name));
        self.push_where(&mut query, schema, filter, &mut params)?;
        Ok(finish(QueryAndParams::new(query, params)))
    }
}
