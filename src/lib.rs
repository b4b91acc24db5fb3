//! Concierge Resolver - identity profile resolution for agent runtime plugins
//!
//! Turns wallet addresses, name-service domains, directory handles and
//! relative aliases such as `@me` into a single canonical `Profile`, backed by
//! a process-lifetime cache.

pub mod config;
pub mod error;
pub mod identity;
pub mod metrics;

pub use config::{CachePolicy, ResolverConfig, SourceConfig};
pub use error::{ResolverError, ResolverResult};
pub use identity::{Profile, ProfileCache, ProfileResolver};
