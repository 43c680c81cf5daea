//! DynamoDB TableStore implementation.
//!
//! Table schema:
//! - PK: `id` (String)
//! - `name`: configuration key (String)
//! - `value`: configuration value (String)

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

use super::client::build_client;
use crate::config::{ClientSettings, SettingsError, TableSpec};
use crate::interfaces::{
    RawItem, Result, ScanPage, StoreError, TableDescription, TableStatus, TableStore,
};
use crate::schema::ATTR_ID;

/// DynamoDB implementation of TableStore.
pub struct DynamoTableStore {
    client: Client,
}

impl DynamoTableStore {
    /// Wrap a pre-built client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the client from settings and wrap it.
    pub async fn from_settings(settings: &ClientSettings) -> std::result::Result<Self, SettingsError> {
        let client = build_client(settings).await?;
        info!("Connected to DynamoDB for configuration bootstrap");
        Ok(Self::new(client))
    }

    fn map_status(status: &aws_sdk_dynamodb::types::TableStatus) -> TableStatus {
        use aws_sdk_dynamodb::types::TableStatus as Remote;
        match status {
            Remote::Creating => TableStatus::Creating,
            Remote::Updating => TableStatus::Updating,
            Remote::Deleting => TableStatus::Deleting,
            Remote::Active => TableStatus::Active,
            _ => TableStatus::Other,
        }
    }

    /// Keep the string attributes of a scanned item; rows in this table
    /// are string-typed end to end.
    fn item_to_raw(item: &HashMap<String, AttributeValue>) -> RawItem {
        item.iter()
            .filter_map(|(name, value)| value.as_s().ok().map(|s| (name.clone(), s.clone())))
            .collect()
    }

    fn is_delete_not_found(err: &SdkError<DeleteTableError>) -> bool {
        match err {
            SdkError::ServiceError(service_err) => matches!(
                service_err.err(),
                DeleteTableError::ResourceNotFoundException(_)
            ),
            _ => false,
        }
    }

    fn is_create_already_exists(err: &SdkError<CreateTableError>) -> bool {
        match err {
            SdkError::ServiceError(service_err) => matches!(
                service_err.err(),
                CreateTableError::ResourceInUseException(_)
            ),
            _ => false,
        }
    }

    fn is_describe_not_found(err: &SdkError<DescribeTableError>) -> bool {
        match err {
            SdkError::ServiceError(service_err) => matches!(
                service_err.err(),
                DescribeTableError::ResourceNotFoundException(_)
            ),
            _ => false,
        }
    }
}

#[async_trait]
impl TableStore for DynamoTableStore {
    async fn delete_table_if_exists(&self, table: &str) -> Result<()> {
        match self.client.delete_table().table_name(table).send().await {
            Ok(_) => {
                debug!(table = %table, "Deleted existing table");
                Ok(())
            }
            Err(e) if Self::is_delete_not_found(&e) => Ok(()),
            Err(e) => Err(StoreError::service("DeleteTable", e)),
        }
    }

    async fn create_table_if_absent(&self, spec: &TableSpec) -> Result<()> {
        let key_attribute = AttributeDefinition::builder()
            .attribute_name(ATTR_ID)
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| StoreError::service("CreateTable", e))?;
        let key_schema = KeySchemaElement::builder()
            .attribute_name(ATTR_ID)
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| StoreError::service("CreateTable", e))?;
        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(spec.read_capacity as i64)
            .write_capacity_units(spec.write_capacity as i64)
            .build()
            .map_err(|e| StoreError::service("CreateTable", e))?;

        let result = self
            .client
            .create_table()
            .table_name(&spec.name)
            .attribute_definitions(key_attribute)
            .key_schema(key_schema)
            .provisioned_throughput(throughput)
            .send()
            .await;

        match result {
            Ok(_) => {
                debug!(table = %spec.name, "Created table");
                Ok(())
            }
            Err(e) if Self::is_create_already_exists(&e) => Ok(()),
            Err(e) => Err(StoreError::service("CreateTable", e)),
        }
    }

    async fn table_status(&self, table: &str) -> Result<TableStatus> {
        match self.client.describe_table().table_name(table).send().await {
            Ok(response) => Ok(response
                .table()
                .and_then(|t| t.table_status())
                .map(Self::map_status)
                .unwrap_or(TableStatus::Other)),
            Err(e) if Self::is_describe_not_found(&e) => Ok(TableStatus::Absent),
            Err(e) => Err(StoreError::service("DescribeTable", e)),
        }
    }

    async fn describe_table(&self, table: &str) -> Result<TableDescription> {
        let response = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| {
                if Self::is_describe_not_found(&e) {
                    StoreError::TableNotFound {
                        table: table.to_string(),
                    }
                } else {
                    StoreError::service("DescribeTable", e)
                }
            })?;

        let remote = response.table().ok_or_else(|| StoreError::TableNotFound {
            table: table.to_string(),
        })?;

        Ok(TableDescription {
            name: remote.table_name().unwrap_or(table).to_string(),
            status: remote
                .table_status()
                .map(Self::map_status)
                .unwrap_or(TableStatus::Other),
            item_count: remote.item_count(),
        })
    }

    async fn scan_page(&self, table: &str, start_token: Option<String>) -> Result<ScanPage> {
        let mut request = self.client.scan().table_name(table);

        if let Some(token) = start_token {
            request = request.exclusive_start_key(ATTR_ID, AttributeValue::S(token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::service("Scan", e))?;

        let items = response.items().iter().map(Self::item_to_raw).collect();

        // The continuation token is the partition key of the last
        // evaluated row; the table's key schema is the single `id`
        // attribute.
        let next_token = response
            .last_evaluated_key()
            .filter(|key| !key.is_empty())
            .and_then(|key| key.get(ATTR_ID))
            .and_then(|value| value.as_s().ok())
            .cloned();

        Ok(ScanPage { items, next_token })
    }
}
