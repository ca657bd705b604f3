use crate::error::SqlModelError;
use crate::query::QueryAndParams;
use crate::schema::TableSchema;
use crate::types::RowValues;

use super::{Filter, QueryBuilder, finish};

impl QueryBuilder {
    /// `SELECT * FROM "T" WHERE "T"."id" = ?1`
    ///
    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` if the schema has no identifier column.
    pub fn select_by_id(
        &self,
        schema: &TableSchema,
        id: RowValues,
    ) -> Result<QueryAndParams, SqlModelError> {
        let mut params = Vec::with_capacity(1);
        let predicate = self.id_predicate(schema, id, &mut params)?;
        Ok(finish(QueryAndParams::new(
            format!(
                "SELECT * FROM {} WHERE {predicate}",
                self.quote_identifier(&schema.table_name)
            ),
            params,
        )))
    }

    /// `SELECT * FROM "T"`
    #[must_use]
    pub fn select_all(&self, schema: &TableSchema) -> QueryAndParams {
        finish(QueryAndParams::new_without_params(format!(
            "SELECT * FROM {}",
            self.quote_identifier(&schema.table_name)
        )))
    }

    /// `SELECT * FROM "T" WHERE "T"."a" = ?1 AND "T"."b" = ?2`, in filter order.
    ///
    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` if the filter names an unknown column.
    pub fn select_matching(
        &self,
        schema: &TableSchema,
        filter: &Filter,
    ) -> Result<QueryAndParams, SqlModelError> {
        let mut params = Vec::with_capacity(filter.len());
        let mut query = format!("SELECT * FROM {}", self.quote_identifier(&schema.table_name));
        self.push_where(&mut query, schema, filter, &mut params)?;
        Ok(finish(QueryAndParams::new(query, params)))
    }

    /// Append ` WHERE ...` for a non-empty filter.
    pub(super) fn push_where(
        &self,
        query: &mut String,
        schema: &TableSchema,
        filter: &Filter,
        params: &mut Vec<RowValues>,
    ) -> Result<(), SqlModelError> {
        let mut predicates = Vec::with_capacity(filter.len());
        for (name, value) in filter.iter() {
            let column = schema.column(name).ok_or_else(|| {
                SqlModelError::QueryBuildFailure(format!(
                    "table `{}` has no column `{name}`",
                    schema.table_name
                ))
            })?;
            let target = self.qualified(&schema.table_name, &column.name);
            if value.is_null() {
                predicates.push(format!("{target} IS NULL"));
            } else {
                let placeholder = self.bind(column, value.clone(), params);
                predicates.push(format!("{target} = {placeholder}"));
            }
        }

        if !predicates.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&predicates.join(" AND "));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::coding::ValueCoding;
    use crate::query_builder::{Filter, QueryBuilder};
    use crate::schema::{ColumnSpec, TableSchema};
    use crate::types::{DatabaseType, RowValues, SqlType};
    use crate::SqlModelError;

    fn people() -> TableSchema {
        let column = |name: &str, coding| ColumnSpec {
            name: name.into(),
            sql_type: SqlType::Text,
            coding,
            nullable: false,
            primary_key: false,
            auto_increment: false,
        };
        let mut id = column("id", ValueCoding::Native);
        id.sql_type = SqlType::BigInt;
        id.primary_key = true;
        id.auto_increment = true;
        TableSchema {
            table_name: "People".into(),
            id_column: "id".into(),
            columns: vec![
                column("name", ValueCoding::Native),
                column("nickname", ValueCoding::Native),
                column("data", ValueCoding::Base64Text),
                id,
            ],
            synthetic_id: true,
        }
    }

    #[test]
    fn select_by_id() {
        let qp = QueryBuilder::default()
            .select_by_id(&people(), RowValues::Int(1))
            .unwrap();
        assert_eq!(
            qp.query,
            "SELECT * FROM \"People\" WHERE \"People\".\"id\" = ?1"
        );
        assert_eq!(qp.params, vec![RowValues::Int(1)]);
    }

    #[test]
    fn select_all() {
        assert_eq!(
            QueryBuilder::default().select_all(&people()).query,
            "SELECT * FROM \"People\""
        );
    }

    #[test]
    fn filters_conjoin_in_order_and_number_positionally() {
        let filter = Filter::new()
            .equal("nickname", RowValues::Null)
            .equal("name", "Joe")
            .equal("data", b"12".to_vec());
        let qp = QueryBuilder::for_database(DatabaseType::Postgres)
            .select_matching(&people(), &filter)
            .unwrap();
        assert_eq!(
            qp.query,
            "SELECT * FROM \"People\" WHERE \"People\".\"nickname\" IS NULL AND \"People\".\"name\" = $1 AND \"People\".\"data\" = $2"
        );
        // filter values go through the column's coding
        assert_eq!(
            qp.params,
            vec![RowValues::Text("Joe".into()), RowValues::Text("MTI=".into())]
        );
    }

    #[test]
    fn empty_filter_selects_everything() {
        let qp = QueryBuilder::default()
            .select_matching(&people(), &Filter::new())
            .unwrap();
        assert_eq!(qp.query, "SELECT * FROM \"People\"");
    }

    #[test]
    fn unknown_filter_column_fails() {
        let err = QueryBuilder::default()
            .select_matching(&people(), &Filter::new().equal("age", 3))
            .unwrap_err();
        assert!(matches!(err, SqlModelError::QueryBuildFailure(ref m) if m.contains("age")));
    }
}
