//! Bootstrap property source.
//!
//! The composed bootstrap operation: build the client from settings,
//! provision the configuration table, load the snapshot, and expose it
//! as a named property source for the surrounding configuration chain.

use tracing::info;

use crate::config::{Settings, SettingsError, TableSpec};
use crate::interfaces::TableStore;
use crate::provision::{ProvisionError, TableProvisioner};
use crate::snapshot::{ConfigSnapshot, SnapshotError, SnapshotLoader};
use crate::storage::dynamo::DynamoTableStore;

/// Errors that can abort bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Property source backed by the DynamoDB configuration table.
///
/// Reported under its own type name so consumers of the resolution
/// chain can trace where a value came from.
#[derive(Debug, Clone)]
pub struct DynamoPropertySource {
    snapshot: ConfigSnapshot,
}

impl DynamoPropertySource {
    /// Provision the configuration table and load its contents.
    ///
    /// Builds the DynamoDB client from `settings.client`, then runs the
    /// full provision, wait, scan, flatten sequence against
    /// `settings.table`. Any failure past the client settings aborts
    /// bootstrap; the caller is expected to fail process startup rather
    /// than continue with partial configuration.
    pub async fn locate(settings: &Settings) -> Result<Self, BootstrapError> {
        let store = DynamoTableStore::from_settings(&settings.client).await?;
        Self::from_store(&store, &settings.table).await
    }

    /// Bootstrap against an already-constructed store.
    pub async fn from_store(
        store: &dyn TableStore,
        spec: &TableSpec,
    ) -> Result<Self, BootstrapError> {
        let description = TableProvisioner::new(spec.clone())
            .ensure_table(store, spec.recreate)
            .await?;
        info!(
            table = %description.name,
            status = ?description.status,
            "Configuration table ready"
        );

        let snapshot = SnapshotLoader::new(&spec.name).load_snapshot(store).await?;
        info!(
            source = Self::NAME,
            entries = snapshot.len(),
            "Configuration snapshot loaded"
        );
        Ok(Self { snapshot })
    }

    /// Diagnostic name of this property source.
    pub const NAME: &'static str = "DynamoPropertySource";

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Look up a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.snapshot.get(key)
    }

    /// The underlying snapshot.
    pub fn snapshot(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    /// Consume the source, yielding the snapshot.
    pub fn into_snapshot(self) -> ConfigSnapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MockTableStore;

    #[tokio::test]
    async fn test_from_store_provisions_and_loads() {
        let store = MockTableStore::new();
        store.make_active().await;
        store.seed_row("1", "cache.ttl", "30").await;

        let spec = TableSpec::named("settings");
        let source = DynamoPropertySource::from_store(&store, &spec)
            .await
            .unwrap();

        assert_eq!(source.name(), "DynamoPropertySource");
        assert_eq!(source.get("cache.ttl"), Some("30"));
        assert_eq!(source.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_from_store_with_recreate_discards_rows() {
        let store = MockTableStore::new();
        store.make_active().await;
        store.seed_row("1", "stale", "true").await;

        let spec = TableSpec {
            recreate: true,
            ..TableSpec::named("settings")
        };
        let source = DynamoPropertySource::from_store(&store, &spec)
            .await
            .unwrap();

        assert!(source.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_failure_propagates() {
        let store = MockTableStore::new();
        store.make_active().await;
        store.set_fail_on_scan(true).await;

        let err = DynamoPropertySource::from_store(&store, &TableSpec::named("settings"))
            .await
            .unwrap_err();

        assert!(matches!(err, BootstrapError::Snapshot(_)));
    }
}
