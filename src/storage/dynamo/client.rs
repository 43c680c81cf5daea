//! DynamoDB client construction from settings.

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::Client;
use tracing::debug;

use crate::config::{ClientSettings, SettingsError};

/// Build a DynamoDB client from the configured settings.
///
/// Starts from the SDK's default configuration chain and applies the
/// static credential pair plus whichever optional overrides are set and
/// non-blank. A signing-region override takes effect on the service
/// config only, leaving the shared config's region untouched.
pub async fn build_client(settings: &ClientSettings) -> Result<Client, SettingsError> {
    let (access_key, secret_key) = settings.credentials()?;
    let credentials = Credentials::new(access_key, secret_key, None, None, "dynsource");

    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).credentials_provider(credentials);

    if let Some(region) = settings.validated_region()? {
        loader = loader.region(Region::new(region.to_string()));
    }

    if let Some(endpoint) = settings.endpoint_override() {
        loader = loader.endpoint_url(endpoint);
    }

    if let Some(local_address) = settings.resolved_local_address() {
        // Socket binding belongs to the transport; record the resolved
        // address for diagnostics.
        debug!(local_address = %local_address, "Resolved local bind address");
    }

    let sdk_config = loader.load().await;
    let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

    if let Some(sign_region) = settings.signing_region_override() {
        builder = builder.region(Region::new(sign_region.to_string()));
    }

    debug!(
        region = ?settings.region,
        endpoint = ?settings.endpoint,
        "Built DynamoDB client"
    );
    Ok(Client::from_conf(builder.build()))
}
