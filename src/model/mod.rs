//! Storage collaborator interface.
//!
//! # Responsibilities
//! - Describe what the framework expects from a database connection
//! - Provide a base for record types (`Model`) built on that interface
//!
//! # Design Decisions
//! - No driver ships with the framework; applications implement `Database`
//! - Named parameters are an ordered `Stream`, rows are JSON objects
//! - Connection strings and credentials stay with the driver

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::pipeline::Stream;

/// One result row, keyed by column name.
pub type Row = Map<String, Value>;

/// Named query parameters (`:name` → value), in binding order.
pub type Params = Stream<String, Value>;

/// Errors surfaced by storage implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Column '{column}' of table '{table}' is missing or malformed")]
    Column { table: &'static str, column: String },
}

/// A database connection.
pub trait Database: Send + Sync {
    /// Run an INSERT and return the new row's id.
    fn insert(&self, sql: &str, params: &Params) -> Result<u64, StorageError>;

    /// Run a SELECT and return every row.
    fn select(&self, sql: &str, params: &Params) -> Result<Vec<Row>, StorageError>;

    /// Run an UPDATE and return the number of affected rows.
    fn update(&self, sql: &str, params: &Params) -> Result<u64, StorageError>;
}

/// A record stored in a table with an integer `id` primary key.
pub trait Model: Sized {
    const TABLE: &'static str;

    fn from_row(row: &Row) -> Result<Self, StorageError>;

    /// Persist a new record, returning its id.
    fn create(&self, db: &dyn Database) -> Result<u64, StorageError>;

    fn get_by_id(db: &dyn Database, id: u64) -> Result<Option<Self>, StorageError> {
        let sql = format!("SELECT * FROM {} WHERE id = :id", Self::TABLE);
        let params = Params::new().add("id".to_string(), Value::from(id));
        db.select(&sql, &params)?.first().map(Self::from_row).transpose()
    }
}

/// Read and decode column `name` of a row belonging to `table`.
pub fn column<T: DeserializeOwned>(row: &Row, table: &'static str, name: &str) -> Result<T, StorageError> {
    row.get(name)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .ok_or_else(|| StorageError::Column {
            table,
            column: name.to_string(),
        })
}
