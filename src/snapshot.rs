//! Configuration snapshot loading.
//!
//! Reads the entire configuration table and flattens its rows into one
//! key/value mapping. Built fresh on every bootstrap call, never
//! persisted, never mutated after construction.

use std::collections::HashMap;

use tracing::debug;

use crate::interfaces::{StoreError, TableStore};
use crate::schema::{ATTR_ID, ATTR_NAME, ATTR_VALUE};

/// Errors that can occur during snapshot loading.
///
/// Both variants are fatal: no partial snapshot is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("scan of table {table} failed")]
    Scan {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("row {id} in table {table} is missing attribute {attribute}")]
    MalformedRow {
        table: String,
        id: String,
        attribute: &'static str,
    },
}

/// Immutable mapping from configuration key to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    entries: HashMap<String, String>,
}

impl ConfigSnapshot {
    fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Look up a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all key/value entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Consume the snapshot, yielding the underlying mapping.
    pub fn into_entries(self) -> HashMap<String, String> {
        self.entries
    }
}

/// Reads the full table and produces a flat configuration snapshot.
pub struct SnapshotLoader {
    table: String,
}

impl SnapshotLoader {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Scan the whole table and flatten its rows into a snapshot.
    ///
    /// Follows continuation tokens until the scan is exhausted, so
    /// tables larger than one page are read completely. A key repeated
    /// across rows is overwritten by the later row in scan order. The
    /// caller must have provisioned the table first.
    pub async fn load_snapshot(
        &self,
        store: &dyn TableStore,
    ) -> Result<ConfigSnapshot, SnapshotError> {
        let mut entries = HashMap::new();
        let mut token = None;
        let mut pages = 0u32;
        let mut rows = 0usize;

        loop {
            let page = store
                .scan_page(&self.table, token.take())
                .await
                .map_err(|source| SnapshotError::Scan {
                    table: self.table.clone(),
                    source,
                })?;
            pages += 1;

            for item in page.items {
                let id = item.get(ATTR_ID).cloned().unwrap_or_else(|| "?".to_string());
                let name = self.required_attribute(&item, ATTR_NAME, &id)?;
                let value = self.required_attribute(&item, ATTR_VALUE, &id)?;
                entries.insert(name, value);
                rows += 1;
            }

            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        debug!(
            table = %self.table,
            pages,
            rows,
            entries = entries.len(),
            "Loaded configuration snapshot"
        );
        Ok(ConfigSnapshot::new(entries))
    }

    fn required_attribute(
        &self,
        item: &HashMap<String, String>,
        attribute: &'static str,
        id: &str,
    ) -> Result<String, SnapshotError> {
        item.get(attribute)
            .cloned()
            .ok_or_else(|| SnapshotError::MalformedRow {
                table: self.table.clone(),
                id: id.to_string(),
                attribute,
            })
    }
}
