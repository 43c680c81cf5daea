//! Configuration table descriptor.

use serde::Deserialize;

/// Default configuration table name.
pub const DEFAULT_TABLE_NAME: &str = "dynsource-properties";
/// Default provisioned read/write capacity units.
pub const DEFAULT_PROVISIONED_THROUGHPUT: u64 = 10;

/// Descriptor for the configuration table.
///
/// Passed explicitly into the provisioner and loader so tests can target
/// ephemeral tables. The partition-key attribute is fixed by the wire
/// contract (see [`crate::schema`]) and is not configurable here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableSpec {
    /// Table name.
    pub name: String,
    /// Provisioned read capacity units declared at creation time.
    pub read_capacity: u64,
    /// Provisioned write capacity units declared at creation time.
    pub write_capacity: u64,
    /// Destroy and recreate the table during bootstrap.
    pub recreate: bool,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            name: DEFAULT_TABLE_NAME.to_string(),
            read_capacity: DEFAULT_PROVISIONED_THROUGHPUT,
            write_capacity: DEFAULT_PROVISIONED_THROUGHPUT,
            recreate: false,
        }
    }
}

impl TableSpec {
    /// Spec with a custom table name and default capacity.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
