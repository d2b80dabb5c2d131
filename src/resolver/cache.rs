//! Process-lifetime memoization of slow external lookups.
//!
//! Every distinct [`LookupKey`] is loaded at most once. The pending load is
//! registered before it settles, so concurrent callers share it. Failures
//! settle to a typed [`LookupResult::Degraded`] holding the safe empty value
//! for the key, and are never retried.

use crate::provider::ExternalDataProvider;
use anyhow::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Escape-hatch entry appended to the profile list
pub const CUSTOM_PROFILE_CHOICE: &str = "-- type in a profile --";

/// Escape-hatch entry appended to the region list
pub const CUSTOM_REGION_CHOICE: &str = "-- type in a region --";

/// Lookup kind plus its discriminating arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    Profiles,
    Regions { profile: String },
    ResourceExists { name: String, profile: String },
}

impl LookupKey {
    /// Safe value substituted when the lookup fails
    pub fn empty_value(&self) -> LookupValue {
        match self {
            LookupKey::Profiles | LookupKey::Regions { .. } => LookupValue::List(Vec::new()),
            LookupKey::ResourceExists { .. } => LookupValue::Exists(false),
        }
    }

    /// Escape-hatch entry for list lookups
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            LookupKey::Profiles => Some(CUSTOM_PROFILE_CHOICE),
            LookupKey::Regions { .. } => Some(CUSTOM_REGION_CHOICE),
            LookupKey::ResourceExists { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupValue {
    List(Vec<String>),
    Exists(bool),
}

/// Settled outcome of a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Loaded(LookupValue),
    /// The loader failed; `value` is the key's empty value
    Degraded { value: LookupValue, reason: String },
}

impl LookupResult {
    pub fn value(&self) -> &LookupValue {
        match self {
            LookupResult::Loaded(value) => value,
            LookupResult::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, LookupResult::Degraded { .. })
    }

    fn list(&self) -> Vec<String> {
        match self.value() {
            LookupValue::List(items) => items.clone(),
            LookupValue::Exists(_) => Vec::new(),
        }
    }

    fn exists(&self) -> bool {
        matches!(self.value(), LookupValue::Exists(true))
    }
}

/// Cache of external lookups, owned by the resolution run
pub struct ExternalDataCache {
    provider: Arc<dyn ExternalDataProvider>,
    entries: Mutex<HashMap<LookupKey, Arc<OnceCell<LookupResult>>>>,
}

impl ExternalDataCache {
    pub fn new(provider: Arc<dyn ExternalDataProvider>) -> Self {
        Self {
            provider,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the settled result for `key`, invoking `loader` only if no
    /// load for that key was ever started
    pub async fn fetch<F, Fut>(&self, key: LookupKey, loader: F) -> LookupResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<LookupValue>>,
    {
        let cell = {
            let mut entries = self.entries.lock().unwrap();
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        if let Some(result) = cell.get() {
            debug!(?key, "lookup cache hit");
            return result.clone();
        }

        cell.get_or_init(move || async move {
            debug!(?key, "lookup cache miss, loading");
            match loader().await {
                Ok(value) => LookupResult::Loaded(value),
                Err(err) => {
                    warn!(?key, error = %err, "external lookup failed, using empty default");
                    LookupResult::Degraded {
                        value: key.empty_value(),
                        reason: format!("{:#}", err),
                    }
                }
            }
        })
        .await
        .clone()
    }

    /// Settled result for `key`, loaded through the provider
    pub async fn lookup(&self, key: &LookupKey) -> LookupResult {
        let provider = Arc::clone(&self.provider);
        let request = key.clone();
        self.fetch(key.clone(), move || async move {
            match request {
                LookupKey::Profiles => provider.list_profiles().await.map(LookupValue::List),
                LookupKey::Regions { profile } => {
                    provider.list_regions(&profile).await.map(LookupValue::List)
                }
                LookupKey::ResourceExists { name, profile } => provider
                    .check_resource_exists(&name, &profile)
                    .await
                    .map(LookupValue::Exists),
            }
        })
        .await
    }

    /// Choice list for a list lookup, with its escape-hatch entry appended
    pub async fn choices(&self, key: &LookupKey) -> Vec<String> {
        let result = self.lookup(key).await;
        if result.is_degraded() {
            debug!(?key, "lookup degraded, offering only the escape hatch");
        }
        let mut choices = result.list();
        if let Some(sentinel) = key.sentinel() {
            choices.push(sentinel.to_string());
        }
        choices
    }

    /// Existence check; `false` when the check itself failed
    pub async fn exists(&self, key: &LookupKey) -> bool {
        self.lookup(key).await.exists()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::provider::{CreatedResource, ExternalDataProvider};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider returning canned data and counting calls
    #[derive(Default)]
    pub struct FakeProvider {
        pub profiles: Option<Vec<String>>,
        pub regions: Option<Vec<String>>,
        pub buckets: HashSet<String>,
        pub profile_calls: AtomicUsize,
        pub region_calls: AtomicUsize,
        pub exists_calls: AtomicUsize,
        pub created: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_profiles(mut self, profiles: &[&str]) -> Self {
            self.profiles = Some(profiles.iter().map(|s| s.to_string()).collect());
            self
        }

        pub fn with_regions(mut self, regions: &[&str]) -> Self {
            self.regions = Some(regions.iter().map(|s| s.to_string()).collect());
            self
        }

        pub fn with_bucket(mut self, bucket: &str) -> Self {
            self.buckets.insert(bucket.to_string());
            self
        }

        pub fn calls(&self, counter: &AtomicUsize) -> usize {
            counter.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExternalDataProvider for FakeProvider {
        async fn list_profiles(&self) -> Result<Vec<String>> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            self.profiles
                .clone()
                .ok_or_else(|| anyhow::anyhow!("credentials file not found"))
        }

        async fn list_regions(&self, _profile: &str) -> Result<Vec<String>> {
            self.region_calls.fetch_add(1, Ordering::SeqCst);
            self.regions
                .clone()
                .ok_or_else(|| anyhow::anyhow!("describe-regions failed"))
        }

        async fn check_resource_exists(&self, name: &str, _profile: &str) -> Result<bool> {
            self.exists_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.buckets.contains(name))
        }

        async fn create_resource(&self, name: &str, _profile: &str) -> Result<CreatedResource> {
            self.created.lock().unwrap().push(name.to_string());
            Ok(CreatedResource {
                location: format!("/{}", name),
            })
        }
    }
}
