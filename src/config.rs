/// Configuration management for the concierge resolver
use crate::error::{ResolverError, ResolverResult};
use std::env;
use std::time::Duration;

/// Default domain-data service (name-service records)
pub const DEFAULT_DOMAIN_DATA_URL: &str = "https://ensdata.net";

/// Default messaging-profile directory service
pub const DEFAULT_PROFILE_DIRECTORY_URL: &str = "https://converse.xyz/profile";

/// Hard deadline for the directory lookup
pub const DEFAULT_DIRECTORY_TIMEOUT_MS: u64 = 5000;

/// Main resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub sources: SourceConfig,
    pub cache: CachePolicy,
    pub logging: LoggingConfig,
}

/// External identity source configuration
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Base URL for `GET {base}/{lookupKey}`
    pub domain_data_url: String,
    /// Base URL for `POST {base}/{handle}`
    pub profile_directory_url: String,
    /// User-Agent header for HTTP requests
    pub user_agent: String,
    /// Deadline for the directory lookup
    pub directory_timeout: Duration,
    /// Optional deadline for the domain-data lookup (transport default when unset)
    pub domain_timeout: Option<Duration>,
}

/// Staleness policy for cached profiles
#[derive(Debug, Clone)]
pub struct CachePolicy {
    /// Entry lifetime; `None` keeps entries for the life of the process
    pub ttl: Option<chrono::Duration>,
    /// Cache profiles even when a source failed during resolution
    pub cache_partial_results: bool,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            domain_data_url: DEFAULT_DOMAIN_DATA_URL.to_string(),
            profile_directory_url: DEFAULT_PROFILE_DIRECTORY_URL.to_string(),
            user_agent: format!("concierge-resolver/{}", env!("CARGO_PKG_VERSION")),
            directory_timeout: Duration::from_millis(DEFAULT_DIRECTORY_TIMEOUT_MS),
            domain_timeout: None,
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: None,
            cache_partial_results: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            sources: SourceConfig::default(),
            cache: CachePolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ResolverResult<Self> {
        dotenv::dotenv().ok();

        let defaults = SourceConfig::default();

        let domain_data_url = env::var("RESOLVER_DOMAIN_DATA_URL")
            .unwrap_or_else(|_| defaults.domain_data_url.clone());
        let profile_directory_url = env::var("RESOLVER_PROFILE_DIRECTORY_URL")
            .unwrap_or_else(|_| defaults.profile_directory_url.clone());
        let user_agent =
            env::var("RESOLVER_USER_AGENT").unwrap_or_else(|_| defaults.user_agent.clone());

        let directory_timeout_ms: u64 = env::var("RESOLVER_DIRECTORY_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_DIRECTORY_TIMEOUT_MS.to_string())
            .parse()
            .map_err(|_| ResolverError::Validation("Invalid directory timeout".to_string()))?;

        let domain_timeout = match env::var("RESOLVER_DOMAIN_TIMEOUT_MS") {
            Ok(ms) => Some(Duration::from_millis(ms.parse().map_err(|_| {
                ResolverError::Validation("Invalid domain-data timeout".to_string())
            })?)),
            Err(_) => None,
        };

        let ttl = match env::var("RESOLVER_CACHE_TTL_SECS") {
            Ok(secs) => Some(chrono::Duration::seconds(secs.parse().map_err(|_| {
                ResolverError::Validation("Invalid cache TTL".to_string())
            })?)),
            Err(_) => None,
        };
        let cache_partial_results = match env::var("RESOLVER_CACHE_PARTIAL") {
            Ok(flag) => parse_cache_partial(&flag)?,
            Err(_) => true,
        };

        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let config = ResolverConfig {
            sources: SourceConfig {
                domain_data_url,
                profile_directory_url,
                user_agent,
                directory_timeout: Duration::from_millis(directory_timeout_ms),
                domain_timeout,
            },
            cache: CachePolicy {
                ttl,
                cache_partial_results,
            },
            logging: LoggingConfig { level },
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ResolverResult<()> {
        for (name, url) in [
            ("domain data URL", &self.sources.domain_data_url),
            ("profile directory URL", &self.sources.profile_directory_url),
        ] {
            if url.is_empty() {
                return Err(ResolverError::Validation(format!("{} cannot be empty", name)));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ResolverError::Validation(format!(
                    "{} must be an http(s) URL: {}",
                    name, url
                )));
            }
        }

        if self.sources.directory_timeout.is_zero() {
            return Err(ResolverError::Validation(
                "Directory timeout must be greater than zero".to_string(),
            ));
        }

        if let Some(ttl) = self.cache.ttl {
            if ttl <= chrono::Duration::zero() {
                return Err(ResolverError::Validation(
                    "Cache TTL must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn parse_cache_partial(flag: &str) -> ResolverResult<bool> {
    flag.trim()
        .parse()
        .map_err(|_| ResolverError::Validation(format!("Invalid cache partial flag: {}", flag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sources.directory_timeout, Duration::from_millis(5000));
        assert!(config.sources.domain_timeout.is_none());
        assert!(config.cache.ttl.is_none());
        assert!(config.cache.cache_partial_results);
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = ResolverConfig::default();
        config.sources.domain_data_url = "ftp://ensdata.net".to_string();
        assert!(matches!(config.validate(), Err(ResolverError::Validation(_))));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = ResolverConfig::default();
        config.sources.directory_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_ttl() {
        let mut config = ResolverConfig::default();
        config.cache.ttl = Some(chrono::Duration::seconds(-1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cache_partial_flag() {
        assert!(parse_cache_partial("true").unwrap());
        assert!(!parse_cache_partial("false").unwrap());
        assert!(matches!(
            parse_cache_partial("yes"),
            Err(ResolverError::Validation(_))
        ));
    }
}
