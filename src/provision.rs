//! Configuration table provisioning.
//!
//! Guarantees the configuration table exists, is of the expected shape,
//! and is in a query-ready state before the snapshot load starts.

use std::time::Duration;

use tracing::debug;

use crate::config::TableSpec;
use crate::interfaces::{StoreError, TableDescription, TableStatus, TableStore};

/// Default interval between status polls while waiting for the table to
/// become active.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Default overall deadline for the active wait.
pub const DEFAULT_ACTIVE_DEADLINE: Duration = Duration::from_secs(60);

/// Errors that can occur during table provisioning.
///
/// Every variant is fatal: bootstrap is aborted, no partial or degraded
/// configuration loading is attempted.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("failed to delete table {table}")]
    Delete {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to create table {table}")]
    Create {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to poll status of table {table}")]
    StatusPoll {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("table {table} did not become active within {deadline:?} (last status {status:?})")]
    ActiveWaitTimeout {
        table: String,
        deadline: Duration,
        status: TableStatus,
    },

    #[error("failed to describe table {table}")]
    Describe {
        table: String,
        #[source]
        source: StoreError,
    },
}

/// Ensures the configuration table exists and is ready for reads.
pub struct TableProvisioner {
    spec: TableSpec,
    poll_interval: Duration,
    active_deadline: Duration,
}

impl TableProvisioner {
    /// Create a provisioner for the given table spec with default
    /// active-wait bounds.
    pub fn new(spec: TableSpec) -> Self {
        Self {
            spec,
            poll_interval: DEFAULT_POLL_INTERVAL,
            active_deadline: DEFAULT_ACTIVE_DEADLINE,
        }
    }

    /// Set the interval between status polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the overall deadline for the active wait.
    pub fn with_active_deadline(mut self, deadline: Duration) -> Self {
        self.active_deadline = deadline;
        self
    }

    /// Ensure the table exists and is active, returning its diagnostic
    /// metadata.
    ///
    /// With `recreate` set, the table is first deleted if it exists —
    /// the only destructive operation in this crate. Creation is
    /// idempotent: an already-existing table is left as is. The call
    /// blocks until the table reports active, so the caller may scan as
    /// soon as it returns.
    pub async fn ensure_table(
        &self,
        store: &dyn TableStore,
        recreate: bool,
    ) -> Result<TableDescription, ProvisionError> {
        let table = &self.spec.name;

        if recreate {
            debug!(table = %table, "Deleting table before recreation");
            store
                .delete_table_if_exists(table)
                .await
                .map_err(|source| ProvisionError::Delete {
                    table: table.clone(),
                    source,
                })?;
        }

        debug!(table = %table, "Creating table if absent");
        store
            .create_table_if_absent(&self.spec)
            .await
            .map_err(|source| ProvisionError::Create {
                table: table.clone(),
                source,
            })?;

        self.wait_until_active(store).await?;

        let description =
            store
                .describe_table(table)
                .await
                .map_err(|source| ProvisionError::Describe {
                    table: table.clone(),
                    source,
                })?;
        debug!(table = %table, ?description, "Table is ready");
        Ok(description)
    }

    /// Poll the table status until it reports active or the deadline
    /// elapses.
    async fn wait_until_active(&self, store: &dyn TableStore) -> Result<(), ProvisionError> {
        let table = &self.spec.name;
        let started = tokio::time::Instant::now();

        loop {
            let status =
                store
                    .table_status(table)
                    .await
                    .map_err(|source| ProvisionError::StatusPoll {
                        table: table.clone(),
                        source,
                    })?;

            if status == TableStatus::Active {
                return Ok(());
            }

            if started.elapsed() >= self.active_deadline {
                return Err(ProvisionError::ActiveWaitTimeout {
                    table: table.clone(),
                    deadline: self.active_deadline,
                    status,
                });
            }

            debug!(table = %table, ?status, "Waiting for table to become active");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MockTableStore;

    fn provisioner(name: &str) -> TableProvisioner {
        TableProvisioner::new(TableSpec::named(name))
            .with_poll_interval(Duration::from_millis(1))
            .with_active_deadline(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_ensure_creates_absent_table() {
        let store = MockTableStore::new().with_creation_polls(2);

        let description = provisioner("settings")
            .ensure_table(&store, false)
            .await
            .unwrap();

        assert_eq!(description.name, "settings");
        assert_eq!(description.status, TableStatus::Active);
    }

    #[tokio::test]
    async fn test_ensure_is_noop_on_active_table() {
        let store = MockTableStore::new();
        store.make_active().await;
        store.seed_row("1", "a", "x").await;

        let description = provisioner("settings")
            .ensure_table(&store, false)
            .await
            .unwrap();

        assert_eq!(description.status, TableStatus::Active);
        assert_eq!(description.item_count, Some(1));
    }

    #[tokio::test]
    async fn test_recreate_then_ensure_yields_active_empty_table() {
        let store = MockTableStore::new();
        store.make_active().await;
        store.seed_row("1", "a", "x").await;

        let prov = provisioner("settings");
        prov.ensure_table(&store, true).await.unwrap();
        let description = prov.ensure_table(&store, false).await.unwrap();

        assert_eq!(description.status, TableStatus::Active);
        assert_eq!(description.item_count, Some(0));
    }

    #[tokio::test]
    async fn test_recreate_on_absent_table_is_not_an_error() {
        let store = MockTableStore::new();

        let description = provisioner("settings")
            .ensure_table(&store, true)
            .await
            .unwrap();

        assert_eq!(description.status, TableStatus::Active);
    }

    #[tokio::test]
    async fn test_active_wait_times_out() {
        let store = MockTableStore::new();
        store.set_stuck_in_creating(true).await;

        let err = provisioner("settings")
            .ensure_table(&store, false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProvisionError::ActiveWaitTimeout {
                status: TableStatus::Creating,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_failure_is_fatal() {
        let store = MockTableStore::new();
        store.set_fail_on_create(true).await;

        let err = provisioner("settings")
            .ensure_table(&store, false)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::Create { .. }));
    }

    #[tokio::test]
    async fn test_delete_failure_is_fatal() {
        let store = MockTableStore::new();
        store.set_fail_on_delete(true).await;

        let err = provisioner("settings")
            .ensure_table(&store, true)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::Delete { .. }));
    }
}
