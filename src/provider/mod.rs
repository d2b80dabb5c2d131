//! Slow external lookups consumed by the resolver's cache.

pub mod aws;

pub use aws::AwsCliProvider;

use anyhow::Result;
use async_trait::async_trait;

/// Result of creating a remote resource
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedResource {
    pub location: String,
}

/// Source of externally enumerable choices and existence checks.
///
/// Implementations may fail freely; the resolver never sees these errors
/// directly because every call goes through the external data cache.
#[async_trait]
pub trait ExternalDataProvider: Send + Sync {
    /// Names of the locally configured credential profiles
    async fn list_profiles(&self) -> Result<Vec<String>>;

    /// Regions visible to `profile`
    async fn list_regions(&self, profile: &str) -> Result<Vec<String>>;

    /// Whether the named resource (a deployment bucket) already exists
    async fn check_resource_exists(&self, name: &str, profile: &str) -> Result<bool>;

    /// Create the named resource; used by the scaffolding flow, not the resolver
    async fn create_resource(&self, name: &str, profile: &str) -> Result<CreatedResource>;
}
