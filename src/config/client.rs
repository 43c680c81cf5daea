//! Storage client settings.

use std::net::{IpAddr, ToSocketAddrs};

use serde::Deserialize;
use tracing::warn;

use super::SettingsError;

/// Region identifiers the region selector is validated against.
pub const KNOWN_REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ca-central-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "me-central-1",
    "me-south-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-gov-east-1",
    "us-gov-west-1",
    "us-west-1",
    "us-west-2",
];

/// Settings for the DynamoDB client.
///
/// The credential pair is required; every other setting is optional and
/// a blank value is treated the same as an absent one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Static credential access key.
    pub credential_access_key: String,
    /// Static credential secret key.
    pub credential_secret_key: String,
    /// Service endpoint override (e.g. DynamoDB Local).
    pub endpoint: Option<String>,
    /// Region selector, validated against [`KNOWN_REGIONS`].
    pub region: Option<String>,
    /// Region used for request signing, when different from `region`.
    pub sign_region_override: Option<String>,
    /// Local network address to bind client sockets to.
    pub local_address: Option<String>,
}

impl ClientSettings {
    /// The required credential pair.
    ///
    /// A blank key or secret counts as missing.
    pub fn credentials(&self) -> Result<(&str, &str), SettingsError> {
        let access = self.credential_access_key.trim();
        if access.is_empty() {
            return Err(SettingsError::MissingCredential(
                "client.credential_access_key",
            ));
        }
        let secret = self.credential_secret_key.trim();
        if secret.is_empty() {
            return Err(SettingsError::MissingCredential(
                "client.credential_secret_key",
            ));
        }
        Ok((access, secret))
    }

    /// The region selector, if set and non-blank.
    ///
    /// An identifier outside [`KNOWN_REGIONS`] is a settings error.
    pub fn validated_region(&self) -> Result<Option<&str>, SettingsError> {
        match non_blank(&self.region) {
            Some(region) if KNOWN_REGIONS.contains(&region) => Ok(Some(region)),
            Some(region) => Err(SettingsError::UnknownRegion(region.to_string())),
            None => Ok(None),
        }
    }

    /// The endpoint override, if set and non-blank.
    pub fn endpoint_override(&self) -> Option<&str> {
        non_blank(&self.endpoint)
    }

    /// The signing-region override, if set and non-blank.
    pub fn signing_region_override(&self) -> Option<&str> {
        non_blank(&self.sign_region_override)
    }

    /// The resolved local bind address, if one is configured.
    ///
    /// A resolution failure is logged and ignored; the setting is then
    /// left unset rather than failing bootstrap.
    pub fn resolved_local_address(&self) -> Option<IpAddr> {
        non_blank(&self.local_address).and_then(resolve_local_address)
    }
}

/// Resolve a local address given as an IP literal or a hostname.
pub fn resolve_local_address(raw: &str) -> Option<IpAddr> {
    if let Ok(addr) = raw.parse::<IpAddr>() {
        return Some(addr);
    }
    match (raw, 0u16).to_socket_addrs() {
        Ok(mut addrs) => addrs.next().map(|addr| addr.ip()),
        Err(e) => {
            warn!(address = %raw, error = %e, "Failed to resolve local address, leaving unset");
            None
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}
