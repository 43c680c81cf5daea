//! Table store interface.
//!
//! The storage service is reduced to the handful of capabilities the
//! bootstrap needs: idempotent table delete/create, status polling,
//! diagnostic description, and a paged unfiltered scan. The pagination
//! loop itself lives in [`crate::snapshot::SnapshotLoader`]; the trait
//! hands back one page per call.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::TableSpec;

/// Result type for table store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during table store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("table {table} does not exist")]
    TableNotFound { table: String },

    #[error("{operation} failed")]
    Service {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap a service-level failure, preserving the original cause.
    pub fn service(
        operation: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Service {
            operation,
            source: Box::new(source),
        }
    }
}

/// Lifecycle state of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    /// The table does not exist.
    Absent,
    Creating,
    Updating,
    Deleting,
    /// The table is serviceable for reads.
    Active,
    /// A state this crate has no use for (e.g. archival).
    Other,
}

/// Diagnostic metadata for a provisioned table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    pub name: String,
    pub status: TableStatus,
    /// Approximate row count, when the service reports one.
    pub item_count: Option<i64>,
}

/// A scanned row as a map of string attribute names to string values.
pub type RawItem = HashMap<String, String>;

/// One page of a paged table scan.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<RawItem>,
    /// Continuation token for the next page; `None` when the scan is
    /// exhausted.
    pub next_token: Option<String>,
}

/// Interface for the backing table service.
///
/// Implementations:
/// - `DynamoTableStore`: Amazon DynamoDB
/// - `MockTableStore`: in-memory store for testing
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Delete the table if it exists. Absence is not an error.
    async fn delete_table_if_exists(&self, table: &str) -> Result<()>;

    /// Create the table with the given spec if it does not already
    /// exist. An existing table is a no-op regardless of its shape.
    async fn create_table_if_absent(&self, spec: &TableSpec) -> Result<()>;

    /// Current lifecycle status of the table.
    async fn table_status(&self, table: &str) -> Result<TableStatus>;

    /// Fetch diagnostic metadata. Errors if the table does not exist.
    async fn describe_table(&self, table: &str) -> Result<TableDescription>;

    /// Fetch one page of an unconditional, unfiltered scan, starting
    /// from `start_token` (`None` for the first page).
    async fn scan_page(&self, table: &str, start_token: Option<String>) -> Result<ScanPage>;
}
