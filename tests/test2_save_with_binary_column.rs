mod common;

use common::{BinaryData, TestConnection, TestResult, verify_columns_and_values};
use sql_model::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct PersonWithBinaryColumn {
    pub name: String,
    pub binary: BinaryData,
}
impl_model!(PersonWithBinaryColumn, "PeopleWithBinaryColumn", {
    name: String,
    binary: BinaryData,
});

fn joe(len: usize) -> PersonWithBinaryColumn {
    PersonWithBinaryColumn {
        name: "Joe".into(),
        binary: BinaryData(vec![0; len]),
    }
}

#[test]
fn test2_save() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let registry = ModelRegistry::new();
        let mut conn = TestConnection::new(TestResult::ReturnEmpty);
        let person = joe(64);
        let saved = registry.save(&mut conn, person.clone()).await?;

        let query = conn.query();
        assert!(query.starts_with("INSERT INTO \"PeopleWithBinaryColumn\""));
        assert!(query.contains("VALUES"));
        verify_columns_and_values(query, &[("\"name\"", "?1,?2"), ("\"binary\"", "?1,?2")]);
        // binary-coded fields are bound as raw bytes
        assert_eq!(
            conn.params(),
            &[RowValues::Text("Joe".into()), RowValues::Blob(vec![0; 64])]
        );
        assert_eq!(saved, person);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn test2_save_with_id() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let registry = ModelRegistry::new();
        let mut conn = TestConnection::new(TestResult::ReturnOneRow);
        let person = joe(32);
        let (id, saved) = registry.save_returning_id(&mut conn, person.clone()).await?;

        let query = conn.query();
        assert!(query.starts_with("INSERT INTO \"PeopleWithBinaryColumn\""));
        assert!(query.ends_with("RETURNING \"id\""));
        verify_columns_and_values(query, &[("\"name\"", "?1,?2"), ("\"binary\"", "?1,?2")]);
        assert_eq!(id, RowValues::Int(1));
        assert_eq!(saved, person);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn test2_save_with_id_from_single_value() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let registry = ModelRegistry::new();
        let mut conn = TestConnection::new(TestResult::ReturnValue);
        let (id, _) = registry.save_returning_id(&mut conn, joe(1)).await?;
        assert_eq!(id, RowValues::Int(5));

        let mut conn = TestConnection::new(TestResult::ReturnEmpty);
        let err = registry
            .save_returning_id(&mut conn, joe(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SqlModelError::ExecutionError(_)));
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn test2_save_reports_collaborator_error() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let registry = ModelRegistry::new();
        let mut conn = TestConnection::new(TestResult::ReturnError);
        let err = registry.save(&mut conn, joe(8)).await.unwrap_err();
        match err {
            SqlModelError::ExecutionError(source) => {
                assert_eq!(source.to_string(), "Error in query execution.");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(conn.executed.len(), 1);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocWithBinaryColumn {
    pub title: String,
    pub binary: BinaryData,
}
impl_model!(DocWithBinaryColumn, "DocsWithBinaryColumn", id = "code" => String, {
    title: String,
    binary: BinaryData,
});

#[test]
fn test2_save_with_given_id() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let registry = ModelRegistry::new();
        let mut conn = TestConnection::new(TestResult::ReturnEmpty);
        registry.save_with_id(&mut conn, 7, joe(4)).await?;
        verify_columns_and_values(
            conn.query(),
            &[
                ("\"name\"", "?1,?2,?3"),
                ("\"binary\"", "?1,?2,?3"),
                ("\"id\"", "?3"),
            ],
        );
        assert_eq!(conn.params()[2], RowValues::Int(7));

        let doc = DocWithBinaryColumn {
            title: "Notes".into(),
            binary: BinaryData(vec![1, 2, 3]),
        };
        let saved = registry.save_with_id(&mut conn, "A-1", doc.clone()).await?;
        assert_eq!(saved, doc);
        verify_columns_and_values(
            conn.query(),
            &[
                ("\"title\"", "?1,?2,?3"),
                ("\"binary\"", "?1,?2,?3"),
                ("\"code\"", "?3"),
            ],
        );
        assert_eq!(
            conn.params(),
            &[
                RowValues::Text("Notes".into()),
                RowValues::Blob(vec![1, 2, 3]),
                RowValues::Text("A-1".into())
            ]
        );
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[test]
fn test2_text_id_needs_a_value() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let registry = ModelRegistry::new();
        let mut conn = TestConnection::new(TestResult::ReturnEmpty);
        registry
            .create_table::<DocWithBinaryColumn, _>(&mut conn)
            .await?;
        assert_eq!(
            conn.query(),
            "CREATE TABLE \"DocsWithBinaryColumn\" (\"title\" type NOT NULL, \"binary\" type NOT NULL, \"code\" type PRIMARY KEY NOT NULL)"
        );

        let doc = DocWithBinaryColumn {
            title: "Notes".into(),
            binary: BinaryData(Vec::new()),
        };
        let err = registry.save(&mut conn, doc).await.unwrap_err();
        assert!(matches!(err, SqlModelError::QueryBuildFailure(ref m) if m.contains("code")));
        // nothing reaches the collaborator
        assert_eq!(conn.executed.len(), 1);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
