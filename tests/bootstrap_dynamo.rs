//! DynamoDB bootstrap integration tests.
//!
//! Run with: cargo test --test bootstrap_dynamo -- --ignored --nocapture
//!
//! Requires: DYNSOURCE_TEST_ENDPOINT env var or DynamoDB Local on
//! localhost:8000
//!
//! Note: Tests use unique table names to avoid data conflicts between runs.

use std::time::Duration;

use aws_sdk_dynamodb::types::AttributeValue;

use dynsource::config::{ClientSettings, TableSpec};
use dynsource::provision::TableProvisioner;
use dynsource::snapshot::SnapshotLoader;
use dynsource::storage::dynamo::{build_client, DynamoTableStore};
use dynsource::TableStore;

fn endpoint() -> String {
    std::env::var("DYNSOURCE_TEST_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn test_settings() -> ClientSettings {
    ClientSettings {
        credential_access_key: "test".to_string(),
        credential_secret_key: "test".to_string(),
        endpoint: Some(endpoint()),
        region: Some("us-east-1".to_string()),
        ..ClientSettings::default()
    }
}

fn test_table() -> String {
    format!(
        "dynsource-test-{}",
        &uuid::Uuid::new_v4().to_string().replace('-', "")[..8]
    )
}

async fn put_row(client: &aws_sdk_dynamodb::Client, table: &str, id: &str, name: &str, value: &str) {
    client
        .put_item()
        .table_name(table)
        .item("id", AttributeValue::S(id.to_string()))
        .item("name", AttributeValue::S(name.to_string()))
        .item("value", AttributeValue::S(value.to_string()))
        .send()
        .await
        .expect("Failed to put row");
}

#[tokio::test]
#[ignore = "requires running DynamoDB Local instance"]
async fn test_bootstrap_round_trip() {
    println!("=== DynamoDB bootstrap round trip ===");
    println!("Connecting to: {}", endpoint());

    let client = build_client(&test_settings())
        .await
        .expect("Failed to build client");
    let store = DynamoTableStore::new(client.clone());

    let table = test_table();
    println!("Using table: {}", table);
    let spec = TableSpec::named(&table);

    let provisioner = TableProvisioner::new(spec.clone())
        .with_poll_interval(Duration::from_millis(200))
        .with_active_deadline(Duration::from_secs(30));

    let description = provisioner
        .ensure_table(&store, false)
        .await
        .expect("Failed to provision table");
    assert_eq!(description.name, table);

    // Idempotent re-ensure on the live table.
    provisioner
        .ensure_table(&store, false)
        .await
        .expect("Re-ensure failed");

    put_row(&client, &table, "1", "server.port", "8443").await;
    put_row(&client, &table, "2", "server.host", "0.0.0.0").await;
    put_row(&client, &table, "3", "server.port", "9090").await;

    let snapshot = SnapshotLoader::new(&table)
        .load_snapshot(&store)
        .await
        .expect("Failed to load snapshot");

    // Rows 1 and 3 share a key; one of them wins by scan order.
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.get("server.host"), Some("0.0.0.0"));
    assert!(matches!(
        snapshot.get("server.port"),
        Some("8443") | Some("9090")
    ));

    store
        .delete_table_if_exists(&table)
        .await
        .expect("Cleanup failed");

    println!("=== DynamoDB bootstrap round trip PASSED ===");
}

#[tokio::test]
#[ignore = "requires running DynamoDB Local instance"]
async fn test_recreate_discards_existing_rows() {
    println!("=== DynamoDB recreate ===");

    let client = build_client(&test_settings())
        .await
        .expect("Failed to build client");
    let store = DynamoTableStore::new(client.clone());

    let table = test_table();
    println!("Using table: {}", table);
    let spec = TableSpec::named(&table);

    let provisioner = TableProvisioner::new(spec.clone())
        .with_poll_interval(Duration::from_millis(200))
        .with_active_deadline(Duration::from_secs(30));

    provisioner
        .ensure_table(&store, false)
        .await
        .expect("Failed to provision table");
    put_row(&client, &table, "1", "stale", "true").await;

    provisioner
        .ensure_table(&store, true)
        .await
        .expect("Failed to recreate table");

    let snapshot = SnapshotLoader::new(&table)
        .load_snapshot(&store)
        .await
        .expect("Failed to load snapshot");
    assert!(snapshot.is_empty());

    store
        .delete_table_if_exists(&table)
        .await
        .expect("Cleanup failed");

    println!("=== DynamoDB recreate PASSED ===");
}
