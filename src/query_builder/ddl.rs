use crate::error::SqlModelError;
use crate::query::QueryAndParams;
use crate::schema::TableSchema;

use super::{QueryBuilder, finish};

impl QueryBuilder {
    /// `CREATE TABLE "T" (<column>, ...)`, one clause per column in schema order.
    ///
    /// # Errors
    /// Returns `SqlModelError::QueryBuildFailure` if the schema has no columns or the column
    /// creator rejects a column.
    pub fn create_table(&self, schema: &TableSchema) -> Result<QueryAndParams, SqlModelError> {
        if schema.columns.is_empty() {
            return Err(SqlModelError::QueryBuildFailure(format!(
                "table `{}` has no columns",
                schema.table_name
            )));
        }

        let clauses = schema
            .columns
            .iter()
            .map(|column| self.column_creator.build_column(column, self))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(finish(QueryAndParams::new_without_params(
            format!(
                "CREATE TABLE {} ({})",
                self.quote_identifier(&schema.table_name),
                clauses.join(", ")
            ),
        )))
    }

    /// `DROP TABLE "T"`
    #[must_use]
    pub fn drop_table(&self, schema: &TableSchema) -> QueryAndParams {
        finish(QueryAndParams::new_without_params(format!(
            "DROP TABLE {}",
            self.quote_identifier(&schema.table_name)
        )))
    }
}

#[cfg(test)]
mod tests {
    use crate::coding::ValueCoding;
    use crate::query_builder::{PostgresColumns, PlaceholderStyle, QueryBuilder, SqliteColumns};
    use crate::schema::{ColumnSpec, TableSchema};
    use crate::types::{DatabaseType, SqlType};

    fn column(name: &str, sql_type: SqlType, coding: ValueCoding) -> ColumnSpec {
        ColumnSpec {
            name: name.into(),
            sql_type,
            coding,
            nullable: false,
            primary_key: false,
            auto_increment: false,
        }
    }

    fn people() -> TableSchema {
        let mut id = column("id", SqlType::BigInt, ValueCoding::Native);
        id.primary_key = true;
        id.auto_increment = true;
        id.nullable = true;
        TableSchema {
            table_name: "People".into(),
            id_column: "id".into(),
            columns: vec![
                column("name", SqlType::Text, ValueCoding::Native),
                column("photo", SqlType::Blob, ValueCoding::Binary),
                id,
            ],
            synthetic_id: true,
        }
    }

    #[test]
    fn generic_create_table_keeps_flag_order() {
        let qp = QueryBuilder::default().create_table(&people()).unwrap();
        assert_eq!(
            qp.query,
            "CREATE TABLE \"People\" (\"name\" TEXT NOT NULL, \"photo\" BLOB NOT NULL, \"id\" BIGINT AUTO_INCREMENT PRIMARY KEY)"
        );
        assert!(qp.params.is_empty());
    }

    #[test]
    fn sqlite_create_table() {
        let qp = QueryBuilder::for_database(DatabaseType::Sqlite)
            .create_table(&people())
            .unwrap();
        assert_eq!(
            qp.query,
            "CREATE TABLE \"People\" (\"name\" TEXT NOT NULL, \"photo\" BLOB NOT NULL, \"id\" INTEGER PRIMARY KEY AUTOINCREMENT)"
        );
    }

    #[test]
    fn postgres_create_table() {
        let qp = QueryBuilder::for_database(DatabaseType::Postgres)
            .create_table(&people())
            .unwrap();
        assert_eq!(
            qp.query,
            "CREATE TABLE \"People\" (\"name\" TEXT NOT NULL, \"photo\" BYTEA NOT NULL, \"id\" BIGSERIAL PRIMARY KEY)"
        );
    }

    #[test]
    fn dialects_reject_text_auto_increment() {
        let mut schema = people();
        schema.columns[2].sql_type = SqlType::Text;
        for builder in [
            QueryBuilder::new(PlaceholderStyle::Sqlite, SqliteColumns),
            QueryBuilder::new(PlaceholderStyle::Postgres, PostgresColumns),
        ] {
            let err = builder.create_table(&schema).unwrap_err();
            assert!(matches!(err, crate::SqlModelError::QueryBuildFailure(_)));
        }
    }

    #[test]
    fn empty_schema_cannot_be_created() {
        let mut schema = people();
        schema.columns.clear();
        assert!(QueryBuilder::default().create_table(&schema).is_err());
    }

    #[test]
    fn drop_table_has_no_params() {
        let qp = QueryBuilder::default().drop_table(&people());
        assert_eq!(qp.query, "DROP TABLE \"People\"");
        assert!(qp.params.is_empty());
    }
}
