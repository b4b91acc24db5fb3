/// Profile-directory client - messaging handles, addresses and avatars
use crate::{
    config::SourceConfig,
    error::{ResolverError, ResolverResult},
    identity::address::is_valid_address,
};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub(crate) const SOURCE_NAME: &str = "profile directory";

/// Directory profile as served by the messaging-profile service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectoryProfile {
    pub address: Option<String>,
    pub on_xmtp: Option<bool>,
    pub avatar: Option<String>,
    pub formatted_name: Option<String>,
    pub name: Option<String>,
}

impl DirectoryProfile {
    /// Lower-cased address, if the upstream value is well-formed.
    ///
    /// Mixed-case values must carry a valid EIP-55 checksum.
    pub fn valid_address(&self) -> Option<String> {
        let address = self.address.as_deref()?;
        if is_valid_address(address) {
            Some(address.to_lowercase())
        } else {
            debug!("Ignoring malformed directory address: {}", address);
            None
        }
    }
}

#[derive(Serialize)]
struct PeerRequest<'a> {
    peer: &'a str,
}

/// HTTP client for `POST {base}/{handle}`
#[derive(Clone)]
pub struct DirectoryClient {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl DirectoryClient {
    /// Create a client sharing the given HTTP connection pool
    pub fn new(http_client: Client, config: &SourceConfig) -> Self {
        Self {
            http_client,
            base_url: config.profile_directory_url.trim_end_matches('/').to_string(),
            timeout: config.directory_timeout,
        }
    }

    /// URL queried for a lookup key
    pub fn endpoint_for(&self, lookup_key: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(directory_username(lookup_key))
        )
    }

    /// Fetch the directory profile for `lookup_key`, abandoning the request
    /// once the configured deadline passes. No retries.
    pub async fn lookup(&self, lookup_key: &str) -> ResolverResult<DirectoryProfile> {
        let url = self.endpoint_for(lookup_key);
        let username = directory_username(lookup_key);

        match tokio::time::timeout(self.timeout, self.fetch(&url, username)).await {
            Ok(result) => result,
            Err(_) => Err(ResolverError::Timeout {
                source_name: SOURCE_NAME,
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }

    async fn fetch(&self, url: &str, username: &str) -> ResolverResult<DirectoryProfile> {
        debug!("Profile directory POST {}", url);

        let response = self
            .http_client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(&PeerRequest { peer: username })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolverError::UpstreamStatus {
                source_name: SOURCE_NAME,
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| ResolverError::MalformedResponse {
            source_name: SOURCE_NAME,
            message: e.to_string(),
        })
    }
}

/// Directory usernames never carry the leading `@`
pub fn directory_username(lookup_key: &str) -> &str {
    lookup_key.trim_start_matches('@')
}
