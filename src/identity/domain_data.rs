/// Domain-data client - name-service records (address, avatar, socials)
use crate::{
    config::SourceConfig,
    error::{ResolverError, ResolverResult},
    identity::address::is_valid_address,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub(crate) const SOURCE_NAME: &str = "domain data";

/// Name-service record as served by the domain-data service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainRecord {
    pub address: Option<String>,
    pub avatar: Option<String>,
    pub avatar_small: Option<String>,
    pub avatar_url: Option<String>,
    pub converse: Option<String>,
    #[serde(rename = "contentHash")]
    pub content_hash: Option<String>,
    pub description: Option<String>,
    /// Resolved domain name
    pub ens: Option<String>,
    pub ens_primary: Option<String>,
    pub github: Option<String>,
    #[serde(rename = "resolverAddress")]
    pub resolver_address: Option<String>,
    pub twitter: Option<String>,
    pub url: Option<String>,
    pub wallets: Option<Wallets>,
}

/// Per-chain wallet addresses attached to a domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wallets {
    pub eth: Option<String>,
}

impl DomainRecord {
    /// Lower-cased address, if the upstream value is well-formed.
    ///
    /// Mixed-case values must carry a valid EIP-55 checksum.
    pub fn valid_address(&self) -> Option<String> {
        let address = self.address.as_deref()?;
        if is_valid_address(address) {
            Some(address.to_lowercase())
        } else {
            debug!("Ignoring malformed domain record address: {}", address);
            None
        }
    }
}

/// HTTP client for `GET {base}/{lookupKey}`
#[derive(Clone)]
pub struct DomainDataClient {
    http_client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl DomainDataClient {
    /// Create a client sharing the given HTTP connection pool
    pub fn new(http_client: Client, config: &SourceConfig) -> Self {
        Self {
            http_client,
            base_url: config.domain_data_url.trim_end_matches('/').to_string(),
            timeout: config.domain_timeout,
        }
    }

    /// URL queried for a lookup key
    pub fn endpoint_for(&self, lookup_key: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(lookup_key))
    }

    /// Fetch the record for `lookup_key`.
    ///
    /// Anything but `200 OK` is reported as `UpstreamStatus`; a body that does
    /// not fit `DomainRecord` is `MalformedResponse`.
    pub async fn lookup(&self, lookup_key: &str) -> ResolverResult<DomainRecord> {
        let url = self.endpoint_for(lookup_key);
        debug!("Domain data GET {}", url);

        let mut request = self.http_client.get(&url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.map_transport_error(e))?;

        if response.status() != StatusCode::OK {
            return Err(ResolverError::UpstreamStatus {
                source_name: SOURCE_NAME,
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_transport_error(e))?;

        serde_json::from_slice(&body).map_err(|e| ResolverError::MalformedResponse {
            source_name: SOURCE_NAME,
            message: e.to_string(),
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ResolverError {
        match self.timeout {
            Some(timeout) if e.is_timeout() => ResolverError::Timeout {
                source_name: SOURCE_NAME,
                timeout_ms: timeout.as_millis() as u64,
            },
            _ => ResolverError::Http(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parses_service_fields() {
        let json = r#"{
            "address": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "avatar_url": "https://ensdata.net/media/avatar/vitalik.eth",
            "contentHash": "ipfs://bafy",
            "ens": "vitalik.eth",
            "ens_primary": "vitalik.eth",
            "resolverAddress": "0x231b0Ee14048e9dCcD1d247744d114a4EB5E8E63",
            "twitter": "VitalikButerin",
            "wallets": { "eth": "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045" },
            "unknown_field": 7
        }"#;

        let record: DomainRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.ens.as_deref(), Some("vitalik.eth"));
        assert_eq!(record.content_hash.as_deref(), Some("ipfs://bafy"));
        assert_eq!(
            record.valid_address().as_deref(),
            Some("0xd8da6bf26964af9d7eed9e03e53415d37aa96045")
        );
        assert!(record.wallets.unwrap().eth.is_some());
    }

    #[test]
    fn test_record_bad_checksum_ignored() {
        let record = DomainRecord {
            address: Some("0xd8Da6BF26964aF9D7eEd9e03E53415D37aA96045".to_string()),
            ..Default::default()
        };
        assert!(record.valid_address().is_none());
    }

    #[test]
    fn test_record_rejects_wrong_types() {
        let parsed: Result<DomainRecord, _> = serde_json::from_str(r#"{"address": 12}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = SourceConfig {
            domain_data_url: "https://ensdata.net/".to_string(),
            ..Default::default()
        };
        let client = DomainDataClient::new(Client::new(), &config);
        assert_eq!(client.endpoint_for("vitalik.eth"), "https://ensdata.net/vitalik.eth");
        assert_eq!(client.endpoint_for("@saul"), "https://ensdata.net/%40saul");
    }
}
