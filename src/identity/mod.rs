/// Identity Resolution System
///
/// Classifies caller-supplied identity keys, consults the domain-data and
/// profile-directory services, merges their answers into one `Profile` and
/// memoizes the result.

pub mod address;
pub mod cache;
pub mod classifier;
pub mod directory;
pub mod domain_data;
pub mod resolver;

pub use cache::ProfileCache;
pub use classifier::{classify, ClassifiedIntent};
pub use directory::{DirectoryClient, DirectoryProfile};
pub use domain_data::{DomainDataClient, DomainRecord};
pub use resolver::ProfileResolver;

use classifier::alias_handle;
use serde::{Deserialize, Serialize};

/// Display name used when neither a domain nor a handle resolved
pub const FALLBACK_DISPLAY_NAME: &str = "Friend";

/// Canonical resolved identity record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub domain_name: Option<String>,
    /// Always lower-cased
    pub address: Option<String>,
    pub preferred_display_name: Option<String>,
    pub directory_handle: Option<String>,
    pub directory_info: Option<DomainRecord>,
    pub avatar_url: Option<String>,
    /// Directory URL that was queried, kept whether or not it answered
    pub directory_endpoint: Option<String>,
}

impl Profile {
    /// Build the starting profile for a classified key
    pub fn seed(intent: &ClassifiedIntent) -> Self {
        let mut profile = Profile::default();

        match intent {
            ClassifiedIntent::AddressKey(address) => {
                profile.address = Some(address.to_lowercase());
            }
            ClassifiedIntent::DomainKey(domain) => {
                profile.domain_name = Some(domain.clone());
            }
            ClassifiedIntent::SelfAlias {
                alias,
                known_address,
            } => {
                profile.address = known_address.as_ref().map(|a| a.to_lowercase());
                profile.domain_name = Some(ClassifiedIntent::alias_domain(alias));
                profile.directory_handle = Some(alias_handle(alias).to_string());
            }
            ClassifiedIntent::ReservedAlias { name, address } => {
                profile.address = Some(address.to_lowercase());
                profile.directory_handle = Some(alias_handle(name).to_string());
            }
            ClassifiedIntent::HandleKey(handle) => {
                profile.directory_handle = non_empty(Some(handle.clone()));
            }
        }

        profile.refresh_display_name();
        profile
    }

    /// Key used for external queries and as the cache key: address, then
    /// domain, then handle.
    pub fn lookup_key(&self) -> Option<String> {
        self.address
            .as_deref()
            .map(str::to_lowercase)
            .or_else(|| self.domain_name.clone())
            .or_else(|| self.directory_handle.clone())
            .filter(|k| !k.is_empty())
    }

    /// Domain name, else directory handle, else the fallback constant
    pub fn refresh_display_name(&mut self) {
        let name = self
            .domain_name
            .as_ref()
            .filter(|n| !n.is_empty())
            .or(self.directory_handle.as_ref().filter(|n| !n.is_empty()))
            .cloned()
            .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());
        self.preferred_display_name = Some(name);
    }

    /// Fold in a domain-data record. Runs first, so its avatar wins.
    pub fn merge_domain_record(&mut self, record: DomainRecord) {
        if let Some(address) = record.valid_address() {
            self.address = Some(address);
        }
        if let Some(ens) = non_empty(record.ens.clone()) {
            self.domain_name = Some(ens);
        }
        if self.avatar_url.is_none() {
            self.avatar_url = non_empty(record.avatar_url.clone());
        }
        self.directory_info = Some(record);
    }

    /// Fold in a directory profile. Its address overrides; its avatar only
    /// fills a gap.
    pub fn merge_directory_profile(&mut self, directory: DirectoryProfile) {
        if let Some(name) =
            non_empty(directory.formatted_name.clone()).or_else(|| non_empty(directory.name.clone()))
        {
            self.directory_handle = Some(name);
        }
        if let Some(address) = directory.valid_address() {
            self.address = Some(address);
        }
        if self.avatar_url.is_none() {
            self.avatar_url = non_empty(directory.avatar);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
