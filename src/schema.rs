//! Configuration table schema constants.
//!
//! Wire contract with the storage service:
//!
//! ```text
//! Table: dynsource-properties (configurable)
//!
//! Primary Key:
//!   - id (String, Partition Key): opaque unique row identifier
//!
//! Attributes:
//!   - id: String (PK)
//!   - name: String - configuration key, not guaranteed unique across rows
//!   - value: String - configuration value
//! ```
//!
//! The partition-key attribute name is part of the wire contract and is
//! not deployment configuration; the table name and capacity are (see
//! [`crate::config::TableSpec`]).

/// Partition key attribute - opaque unique row identifier.
pub const ATTR_ID: &str = "id";

/// Configuration key attribute.
pub const ATTR_NAME: &str = "name";

/// Configuration value attribute.
pub const ATTR_VALUE: &str = "value";
