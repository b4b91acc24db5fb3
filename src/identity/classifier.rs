/// Key Classifier - turns a raw identity key into a typed lookup intent
use crate::identity::address::is_valid_address;

/// Recognized name-service suffix
pub const NAME_SERVICE_SUFFIX: &str = ".eth";

/// Relative aliases that refer to the asking actor
pub const SELF_ALIASES: [&str; 3] = ["@user", "@me", "@bot"];

/// Named demo identities with fixed addresses
pub const RESERVED_IDENTITIES: [(&str, &str); 2] = [
    ("@alix", "0x3a044b218BaE80E5b9E16609443A192129A67BeA"),
    ("@bo", "0xbc3246461ab5e1682baE48fa95172CDf0689201a"),
];

/// What kind of lookup a key calls for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedIntent {
    /// Key (or the known actor address) is already a wallet address
    AddressKey(String),
    /// Key names a name-service domain
    DomainKey(String),
    /// Key is a relative alias such as `@me`
    SelfAlias {
        alias: String,
        known_address: Option<String>,
    },
    /// Key is one of the reserved demo identities
    ReservedAlias { name: String, address: String },
    /// Anything else: an opaque directory handle
    HandleKey(String),
}

impl ClassifiedIntent {
    /// Domain guess synthesized from a self alias (`@me` -> `me.eth`)
    pub fn alias_domain(alias: &str) -> String {
        format!("{}{}", alias_handle(alias), NAME_SERVICE_SUFFIX)
    }
}

/// Handle text of an alias (`@me` -> `me`)
pub fn alias_handle(alias: &str) -> &str {
    alias.strip_prefix('@').unwrap_or(alias)
}

/// Classify `key`, optionally in the context of the asking actor's address.
///
/// Both inputs are lower-cased first. Self aliases are recognized ahead of the
/// known-address rule so that `@me` keeps its synthesized domain and handle
/// while still carrying the actor's address.
pub fn classify(key: &str, known_actor_address: Option<&str>) -> ClassifiedIntent {
    let key = key.to_lowercase();
    let known = known_actor_address.map(str::to_lowercase);

    if SELF_ALIASES.contains(&key.as_str()) {
        return ClassifiedIntent::SelfAlias {
            alias: key,
            known_address: known.filter(|a| is_valid_address(a)),
        };
    }

    if let Some(address) = known.filter(|a| is_valid_address(a)) {
        return ClassifiedIntent::AddressKey(address);
    }

    if is_valid_address(&key) {
        return ClassifiedIntent::AddressKey(key);
    }

    if key.contains(NAME_SERVICE_SUFFIX) {
        return ClassifiedIntent::DomainKey(key);
    }

    if let Some((name, address)) = RESERVED_IDENTITIES.iter().find(|(name, _)| *name == key) {
        return ClassifiedIntent::ReservedAlias {
            name: name.to_string(),
            address: address.to_lowercase(),
        };
    }

    ClassifiedIntent::HandleKey(key)
}
