#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use regex::Regex;
use sql_model::prelude::*;

pub const DATA_BLOB_1: &[u8] = b"1234567890";
pub const DATA_BLOB_2: &[u8] = b"0987654321";
pub const DATA_BLOB_3: &[u8] = b"nhkqn\0eofejoijflqkjfoidsflsk";

/// Byte wrapper that opts into binary parameters, so plain `Vec<u8>` keeps exercising the
/// base64 layout.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryData(pub Vec<u8>);

impl BinaryCodable for BinaryData {
    const SQL_TYPE: SqlType = SqlType::Custom("bin");

    fn to_sql_binary(&self) -> Vec<u8> {
        self.0.clone()
    }

    fn from_sql_binary(bytes: Vec<u8>) -> Self {
        BinaryData(bytes)
    }
}

/// What the test connection answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    ReturnEmpty,
    ReturnOneRow,
    ReturnThreeRows,
    ReturnError,
    ReturnValue,
}

/// Canned rows handed back for `ReturnOneRow` / `ReturnThreeRows`.
#[derive(Debug, Clone)]
pub enum Fetcher {
    IntColumn,
    BinaryColumn,
    Base64Column,
    Rows(Vec<String>, Vec<Vec<RowValues>>),
}

impl Fetcher {
    fn result_set(&self, number_of_rows: usize) -> ResultSet {
        let (titles, rows): (Vec<&str>, Vec<Vec<RowValues>>) = match self {
            Fetcher::IntColumn => (
                vec!["id", "name", "age"],
                vec![
                    vec![1.into(), "Joe".into(), 38.into()],
                    vec![2.into(), "Adam".into(), 28.into()],
                    vec![3.into(), "Chris".into(), 36.into()],
                ],
            ),
            Fetcher::BinaryColumn => (
                vec!["id", "name", "binary"],
                vec![
                    vec![1.into(), "Joe".into(), vec![0u8; 38].into()],
                    vec![2.into(), "Adam".into(), vec![0u8; 28].into()],
                    vec![3.into(), "Chris".into(), vec![0u8; 36].into()],
                ],
            ),
            Fetcher::Base64Column => (
                vec!["id", "name", "encodable"],
                vec![
                    vec![1.into(), "Joe".into(), "MTIzNDU2Nzg5MA==".into()],
                    vec![2.into(), "Adam".into(), "MDk4NzY1NDMyMQ==".into()],
                    vec![
                        3.into(),
                        "Chris".into(),
                        "bmhrcW4AZW9mZWpvaWpmbHFramZvaWRzZmxzaw==".into(),
                    ],
                ],
            ),
            Fetcher::Rows(titles, rows) => {
                return ResultSet::from_rows(
                    titles.clone(),
                    rows.iter().take(number_of_rows).cloned().collect(),
                );
            }
        };
        ResultSet::from_rows(
            titles.into_iter().map(String::from).collect(),
            rows.into_iter().take(number_of_rows).collect(),
        )
    }
}

/// Records every statement and answers with a canned result.
#[derive(Debug)]
pub struct TestConnection {
    builder: QueryBuilder,
    result: TestResult,
    fetcher: Fetcher,
    pub executed: Vec<QueryAndParams>,
}

impl TestConnection {
    pub fn new(result: TestResult) -> Self {
        Self::with_fetcher(result, Fetcher::IntColumn)
    }

    pub fn with_fetcher(result: TestResult, fetcher: Fetcher) -> Self {
        Self {
            builder: QueryBuilder::new(PlaceholderStyle::Sqlite, TestColumnCreator),
            result,
            fetcher,
            executed: Vec::new(),
        }
    }

    /// Text of the last executed statement.
    pub fn query(&self) -> &str {
        self.executed.last().map_or("", |q| q.query.as_str())
    }

    /// Parameters of the last executed statement.
    pub fn params(&self) -> &[RowValues] {
        self.executed
            .last()
            .map(|q| q.params.as_slice())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Executor for TestConnection {
    fn query_builder(&self) -> &QueryBuilder {
        &self.builder
    }

    async fn execute(&mut self, query: &QueryAndParams) -> Result<QueryResult, SqlModelError> {
        self.executed.push(query.clone());
        match self.result {
            TestResult::ReturnEmpty => Ok(QueryResult::SuccessNoData),
            TestResult::ReturnOneRow => Ok(QueryResult::ResultSet(self.fetcher.result_set(1))),
            TestResult::ReturnThreeRows => {
                Ok(QueryResult::ResultSet(self.fetcher.result_set(3)))
            }
            TestResult::ReturnError => Err(SqlModelError::execution("Error in query execution.")),
            TestResult::ReturnValue => Ok(QueryResult::Success(RowValues::Int(5))),
        }
    }
}

/// Renders every column type as `type`.
#[derive(Debug)]
pub struct TestColumnCreator;

impl ColumnCreator for TestColumnCreator {
    fn build_column(
        &self,
        column: &ColumnSpec,
        builder: &QueryBuilder,
    ) -> Result<String, SqlModelError> {
        let mut clause = format!("{} type", builder.quote_identifier(&column.name));
        if column.auto_increment {
            clause.push_str(" AUTO_INCREMENT");
        }
        if column.primary_key {
            clause.push_str(" PRIMARY KEY");
        }
        if !column.nullable {
            clause.push_str(" NOT NULL");
        }
        Ok(clause)
    }
}

/// Check the column and value lists of an INSERT.
///
/// `expected` maps a quoted column to a comma separated list of acceptable placeholders.
pub fn verify_columns_and_values(query: &str, expected: &[(&str, &str)]) {
    let re = Regex::new(r".*\((.*)\)[^()]*\((.*)\)").unwrap();
    let caps = re.captures(query).expect("INSERT with column and value lists");
    let strip = |s: &str| s.chars().filter(|c| *c != ' ' && *c != '\'').collect::<String>();
    let columns = strip(&caps[1]);
    let values = strip(&caps[2]);

    let found: HashMap<&str, &str> = columns.split(',').zip(values.split(',')).collect();
    assert_eq!(found.len(), expected.len(), "columns in {query}");
    for (column, accepted) in expected {
        let value = found
            .get(column)
            .unwrap_or_else(|| panic!("no value for {column} in {query}"));
        assert!(
            accepted.split(',').any(|a| a == *value),
            "{column} bound to {value}, expected one of {accepted}"
        );
    }
}
