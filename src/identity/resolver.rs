/// Profile Resolver - Orchestrates classification, source lookups and caching
use crate::{
    config::{ResolverConfig, SourceConfig},
    error::{ResolverError, ResolverResult},
    identity::{
        classify, directory, domain_data, DirectoryClient, DomainDataClient, Profile, ProfileCache,
    },
    metrics,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// What a single source lookup did for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Source answered and its data was merged
    Contributed,
    /// Source answered with a non-success status
    NoData,
    /// Network error, timeout or malformed body
    Failed,
}

impl SourceOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceOutcome::Contributed => "contributed",
            SourceOutcome::NoData => "no_data",
            SourceOutcome::Failed => "failed",
        }
    }
}

/// Main profile resolver - combines caching with the two identity sources
#[derive(Clone)]
pub struct ProfileResolver {
    cache: ProfileCache,
    domain_data: DomainDataClient,
    directory: DirectoryClient,
}

impl ProfileResolver {
    /// Create a new profile resolver around an injected cache
    pub fn new(cache: ProfileCache, config: &SourceConfig) -> ResolverResult<Self> {
        // Build HTTP client
        let http_client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ResolverError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_clients(
            cache,
            DomainDataClient::new(http_client.clone(), config),
            DirectoryClient::new(http_client, config),
        ))
    }

    /// Create a resolver and a fresh cache from full configuration
    pub fn from_config(config: &ResolverConfig) -> ResolverResult<Self> {
        config.validate()?;
        Self::new(ProfileCache::new(config.cache.clone()), &config.sources)
    }

    /// Assemble a resolver from prebuilt source clients
    pub fn with_clients(
        cache: ProfileCache,
        domain_data: DomainDataClient,
        directory: DirectoryClient,
    ) -> Self {
        Self {
            cache,
            domain_data,
            directory,
        }
    }

    /// Shared cache handle
    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    /// Resolve an identity key into a profile.
    ///
    /// Resolution order:
    /// 1. Check cache on the raw key (fast path)
    /// 2. Classify the key, seed a profile and check cache on its lookup key
    /// 3. Domain-data lookup, then directory lookup
    /// 4. Cache under the canonical lookup key
    ///
    /// Never fails: a source that errors simply contributes nothing.
    pub async fn resolve(&self, key: &str, known_actor_address: Option<&str>) -> Profile {
        if let Some(cached) = self.cache.get(key).await {
            metrics::record_cache_access(true);
            return cached;
        }

        let intent = classify(key, known_actor_address);
        debug!("Classified {:?} as {:?}", key, intent);

        let mut profile = Profile::seed(&intent);

        let Some(lookup_key) = profile.lookup_key() else {
            metrics::record_cache_access(false);
            info!("Unable to determine a valid key for fetching profile of {:?}", key);
            return profile;
        };

        // Aliases are stored under the key they resolved to, never the alias itself
        if let Some(cached) = self.cache.get(&lookup_key).await {
            metrics::record_cache_access(true);
            return cached;
        }
        metrics::record_cache_access(false);

        // Order matters: the directory runs second so its address wins, while
        // the domain record's avatar is kept.
        let domain_outcome = self.apply_domain_data(&lookup_key, &mut profile).await;
        let directory_outcome = self.apply_directory(&lookup_key, &mut profile).await;

        profile.refresh_display_name();

        let partial = domain_outcome == SourceOutcome::Failed
            || directory_outcome == SourceOutcome::Failed;
        if partial && !self.cache.policy().cache_partial_results {
            info!("Not caching partial profile for {}", lookup_key);
        } else {
            self.cache.set(&lookup_key, profile.clone()).await;
        }

        profile
    }

    /// Resolve a key that arrived as untyped JSON.
    ///
    /// Non-string keys yield an empty default profile.
    pub async fn resolve_value(
        &self,
        key: &serde_json::Value,
        known_actor_address: Option<&str>,
    ) -> Profile {
        match key.as_str() {
            Some(key) => self.resolve(key, known_actor_address).await,
            None => {
                error!("Identity key must be a string, got {}", key);
                Profile::default()
            }
        }
    }

    /// Invalidate a cached profile (force re-resolution)
    pub async fn invalidate(&self, key: &str) {
        self.cache.clear(Some(key)).await
    }

    /// Drop every cached profile
    pub async fn clear_cache(&self) {
        self.cache.clear(None).await
    }

    async fn apply_domain_data(&self, lookup_key: &str, profile: &mut Profile) -> SourceOutcome {
        let started = Instant::now();

        let outcome = match self.domain_data.lookup(lookup_key).await {
            Ok(record) => {
                profile.merge_domain_record(record);
                SourceOutcome::Contributed
            }
            Err(ResolverError::UpstreamStatus { status, .. }) => {
                info!("Domain data request failed for {} (status {})", lookup_key, status);
                SourceOutcome::NoData
            }
            Err(e) => {
                warn!(error_kind = e.kind(), "Failed to fetch domain data for {}: {}", lookup_key, e);
                SourceOutcome::Failed
            }
        };

        metrics::record_source_lookup(
            domain_data::SOURCE_NAME,
            outcome.as_str(),
            started.elapsed().as_secs_f64(),
        );
        outcome
    }

    async fn apply_directory(&self, lookup_key: &str, profile: &mut Profile) -> SourceOutcome {
        let started = Instant::now();

        profile.directory_endpoint = Some(self.directory.endpoint_for(lookup_key));

        let outcome = match self.directory.lookup(lookup_key).await {
            Ok(directory_profile) => {
                profile.merge_directory_profile(directory_profile);
                SourceOutcome::Contributed
            }
            Err(ResolverError::UpstreamStatus { status, .. }) => {
                warn!("Profile directory request failed with status {}", status);
                SourceOutcome::NoData
            }
            Err(e) => {
                warn!(error_kind = e.kind(), "Failed to fetch directory profile for {}: {}", lookup_key, e);
                SourceOutcome::Failed
            }
        };

        metrics::record_source_lookup(
            directory::SOURCE_NAME,
            outcome.as_str(),
            started.elapsed().as_secs_f64(),
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> SourceConfig {
        // Port 9 (discard) on loopback refuses connections quickly
        SourceConfig {
            domain_data_url: "http://127.0.0.1:9".to_string(),
            profile_directory_url: "http://127.0.0.1:9/profile".to_string(),
            ..Default::default()
        }
    }

    fn create_test_resolver() -> ProfileResolver {
        ProfileResolver::new(ProfileCache::default(), &unreachable_config()).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_uses_cache() {
        let resolver = create_test_resolver();

        let cached = Profile {
            domain_name: Some("alice.eth".to_string()),
            preferred_display_name: Some("alice.eth".to_string()),
            ..Default::default()
        };
        resolver.cache().set("alice.eth", cached.clone()).await;

        assert_eq!(resolver.resolve("alice.eth", None).await, cached);
        // Case-insensitive lookup
        assert_eq!(resolver.resolve("ALICE.ETH", None).await, cached);
    }

    #[tokio::test]
    async fn test_alias_served_from_lookup_key_entry() {
        let resolver = create_test_resolver();

        let cached = Profile {
            address: Some("0x3a044b218bae80e5b9e16609443a192129a67bea".to_string()),
            directory_handle: Some("Alix".to_string()),
            preferred_display_name: Some("Alix".to_string()),
            ..Default::default()
        };
        resolver
            .cache()
            .set("0x3a044b218bae80e5b9e16609443a192129a67bea", cached.clone())
            .await;

        assert_eq!(resolver.resolve("@alix", None).await, cached);
        assert!(resolver.cache().get("@alix").await.is_none());
    }

    #[tokio::test]
    async fn test_non_string_key_returns_default() {
        let resolver = create_test_resolver();

        let profile = resolver.resolve_value(&serde_json::json!(42), None).await;
        assert_eq!(profile, Profile::default());
        assert!(profile.preferred_display_name.is_none());
        assert!(resolver.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_key_skips_sources() {
        let resolver = create_test_resolver();

        let profile = resolver.resolve("", None).await;
        assert_eq!(profile.preferred_display_name.as_deref(), Some("Friend"));
        assert!(profile.directory_endpoint.is_none());
        assert!(resolver.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_unreachable_sources_degrade() {
        let resolver = create_test_resolver();

        let profile = resolver.resolve("@alix", None).await;
        assert_eq!(
            profile.address.as_deref(),
            Some("0x3a044b218bae80e5b9e16609443a192129a67bea")
        );
        assert_eq!(profile.directory_handle.as_deref(), Some("alix"));
        assert_eq!(profile.preferred_display_name.as_deref(), Some("alix"));
        assert!(profile.directory_endpoint.is_some());

        // Partial results are cached by default
        assert!(resolver
            .cache()
            .get("0x3a044b218bae80e5b9e16609443a192129a67bea")
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_partial_results_not_cached_when_disabled() {
        let cache = ProfileCache::new(crate::config::CachePolicy {
            ttl: None,
            cache_partial_results: false,
        });
        let resolver = ProfileResolver::new(cache, &unreachable_config()).unwrap();

        let profile = resolver.resolve("saul", None).await;
        assert_eq!(profile.directory_handle.as_deref(), Some("saul"));
        assert!(resolver.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let resolver = create_test_resolver();

        resolver.cache().set("charlie", Profile::default()).await;
        resolver.invalidate("CHARLIE").await;
        assert!(resolver.cache().get("charlie").await.is_none());

        resolver.cache().set("dave", Profile::default()).await;
        resolver.clear_cache().await;
        assert!(resolver.cache().is_empty().await);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(SourceOutcome::Contributed.as_str(), "contributed");
        assert_eq!(SourceOutcome::NoData.as_str(), "no_data");
        assert_eq!(SourceOutcome::Failed.as_str(), "failed");
    }
}
