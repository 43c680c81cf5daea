//! Mock table store for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::TableSpec;
use crate::interfaces::{
    RawItem, Result, ScanPage, StoreError, TableDescription, TableStatus, TableStore,
};
use crate::schema::{ATTR_ID, ATTR_NAME, ATTR_VALUE};

/// Lifecycle state of the mock table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockState {
    Absent,
    Creating { polls_remaining: u32 },
    Active,
}

/// In-memory table store with configurable paging and failure injection.
///
/// Rows are served in insertion order. A scan is split into pages of
/// `page_size` rows, with the row index as continuation token.
pub struct MockTableStore {
    state: RwLock<MockState>,
    rows: RwLock<Vec<RawItem>>,
    page_size: usize,
    creation_polls: u32,
    stuck_in_creating: RwLock<bool>,
    fail_on_create: RwLock<bool>,
    fail_on_delete: RwLock<bool>,
    fail_on_scan: RwLock<bool>,
    scan_pages_served: RwLock<u32>,
}

impl Default for MockTableStore {
    fn default() -> Self {
        Self {
            state: RwLock::new(MockState::Absent),
            rows: RwLock::new(Vec::new()),
            page_size: 100,
            creation_polls: 1,
            stuck_in_creating: RwLock::new(false),
            fail_on_create: RwLock::new(false),
            fail_on_delete: RwLock::new(false),
            fail_on_scan: RwLock::new(false),
            scan_pages_served: RwLock::new(0),
        }
    }
}

impl MockTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve scans in pages of `page_size` rows.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Report `creating` for this many status polls after creation.
    pub fn with_creation_polls(mut self, polls: u32) -> Self {
        self.creation_polls = polls;
        self
    }

    /// Put the table directly into the active state, as if it had been
    /// provisioned by an earlier bootstrap.
    pub async fn make_active(&self) {
        *self.state.write().await = MockState::Active;
    }

    /// Append a well-formed configuration row.
    pub async fn seed_row(&self, id: &str, name: &str, value: &str) {
        let mut item = RawItem::new();
        item.insert(ATTR_ID.to_string(), id.to_string());
        item.insert(ATTR_NAME.to_string(), name.to_string());
        item.insert(ATTR_VALUE.to_string(), value.to_string());
        self.rows.write().await.push(item);
    }

    /// Append a raw item as is, e.g. one missing required attributes.
    pub async fn seed_raw(&self, item: RawItem) {
        self.rows.write().await.push(item);
    }

    /// Keep reporting `creating` forever, never becoming active.
    pub async fn set_stuck_in_creating(&self, stuck: bool) {
        *self.stuck_in_creating.write().await = stuck;
    }

    pub async fn set_fail_on_create(&self, fail: bool) {
        *self.fail_on_create.write().await = fail;
    }

    pub async fn set_fail_on_delete(&self, fail: bool) {
        *self.fail_on_delete.write().await = fail;
    }

    pub async fn set_fail_on_scan(&self, fail: bool) {
        *self.fail_on_scan.write().await = fail;
    }

    /// Number of scan pages served so far.
    pub async fn scan_pages_served(&self) -> u32 {
        *self.scan_pages_served.read().await
    }

    fn injected(operation: &'static str) -> StoreError {
        StoreError::service(operation, std::io::Error::other("injected failure"))
    }
}

#[async_trait]
impl TableStore for MockTableStore {
    async fn delete_table_if_exists(&self, _table: &str) -> Result<()> {
        if *self.fail_on_delete.read().await {
            return Err(Self::injected("DeleteTable"));
        }
        *self.state.write().await = MockState::Absent;
        self.rows.write().await.clear();
        Ok(())
    }

    async fn create_table_if_absent(&self, _spec: &TableSpec) -> Result<()> {
        if *self.fail_on_create.read().await {
            return Err(Self::injected("CreateTable"));
        }
        let mut state = self.state.write().await;
        if *state == MockState::Absent {
            *state = MockState::Creating {
                polls_remaining: self.creation_polls,
            };
        }
        Ok(())
    }

    async fn table_status(&self, _table: &str) -> Result<TableStatus> {
        let mut state = self.state.write().await;
        match *state {
            MockState::Absent => Ok(TableStatus::Absent),
            MockState::Active => Ok(TableStatus::Active),
            MockState::Creating { polls_remaining } => {
                if *self.stuck_in_creating.read().await {
                    return Ok(TableStatus::Creating);
                }
                if polls_remaining == 0 {
                    *state = MockState::Active;
                    Ok(TableStatus::Active)
                } else {
                    *state = MockState::Creating {
                        polls_remaining: polls_remaining - 1,
                    };
                    Ok(TableStatus::Creating)
                }
            }
        }
    }

    async fn describe_table(&self, table: &str) -> Result<TableDescription> {
        let status = match *self.state.read().await {
            MockState::Absent => {
                return Err(StoreError::TableNotFound {
                    table: table.to_string(),
                })
            }
            MockState::Creating { .. } => TableStatus::Creating,
            MockState::Active => TableStatus::Active,
        };
        Ok(TableDescription {
            name: table.to_string(),
            status,
            item_count: Some(self.rows.read().await.len() as i64),
        })
    }

    async fn scan_page(&self, table: &str, start_token: Option<String>) -> Result<ScanPage> {
        if *self.fail_on_scan.read().await {
            return Err(Self::injected("Scan"));
        }
        if *self.state.read().await == MockState::Absent {
            return Err(StoreError::TableNotFound {
                table: table.to_string(),
            });
        }

        let rows = self.rows.read().await;
        let start = start_token
            .and_then(|token| token.parse::<usize>().ok())
            .unwrap_or(0);
        let end = (start + self.page_size).min(rows.len());
        let items = rows[start.min(rows.len())..end].to_vec();
        let next_token = (end < rows.len()).then(|| end.to_string());

        *self.scan_pages_served.write().await += 1;
        Ok(ScanPage { items, next_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_lifecycle() {
        let store = MockTableStore::new().with_creation_polls(1);
        assert_eq!(store.table_status("t").await.unwrap(), TableStatus::Absent);

        store.create_table_if_absent(&TableSpec::named("t")).await.unwrap();
        assert_eq!(
            store.table_status("t").await.unwrap(),
            TableStatus::Creating
        );
        assert_eq!(store.table_status("t").await.unwrap(), TableStatus::Active);
    }

    #[tokio::test]
    async fn test_mock_scan_pagination() {
        let store = MockTableStore::new().with_page_size(2);
        store.make_active().await;
        store.seed_row("1", "a", "x").await;
        store.seed_row("2", "b", "y").await;
        store.seed_row("3", "c", "z").await;

        let first = store.scan_page("t", None).await.unwrap();
        assert_eq!(first.items.len(), 2);
        let token = first.next_token.clone().unwrap();

        let second = store.scan_page("t", Some(token)).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.next_token.is_none());
        assert_eq!(store.scan_pages_served().await, 2);
    }

    #[tokio::test]
    async fn test_mock_scan_on_absent_table_errors() {
        let store = MockTableStore::new();
        assert!(matches!(
            store.scan_page("t", None).await,
            Err(StoreError::TableNotFound { .. })
        ));
    }
}
