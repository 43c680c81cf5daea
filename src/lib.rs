//! Dynsource - DynamoDB-backed bootstrap configuration
//!
//! Loads application configuration key/value pairs from a DynamoDB table
//! at process startup, provisioning the table if it does not exist yet.
//! The full table contents are flattened into an immutable snapshot and
//! exposed to the application as a named property source.

pub mod config;
pub mod interfaces;
pub mod provision;
pub mod schema;
pub mod snapshot;
pub mod source;
pub mod storage;
pub mod utils;

pub use config::{ClientSettings, Settings, SettingsError, TableSpec};
pub use interfaces::{ScanPage, StoreError, TableDescription, TableStatus, TableStore};
pub use provision::{ProvisionError, TableProvisioner};
pub use snapshot::{ConfigSnapshot, SnapshotError, SnapshotLoader};
pub use source::{BootstrapError, DynamoPropertySource};
