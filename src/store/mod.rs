//! Durable key-value store for previously resolved answers.
//!
//! The store is a flat JSON object kept next to the generated project, so a
//! second run can skip every question that already has an answer.

use crate::traits::FileSystem;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// File name of the store inside the project directory
pub const STORE_FILE: &str = ".aws-scaffold.json";

/// Key-value map from field name to its last resolved value
pub trait ConfigStore: Send + Sync {
    /// Get the stored value for a key, if any
    fn get(&self, key: &str) -> Option<Value>;

    /// Store a value, durably, before returning
    fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Config store persisted as pretty-printed JSON through the [`FileSystem`] trait
pub struct JsonConfigStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl JsonConfigStore {
    /// Open the store in `project_dir`, starting empty when no file exists yet
    pub fn open(fs: Arc<dyn FileSystem>, project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(STORE_FILE);

        let values = if fs.exists(&path) {
            let content = fs.read_to_string(&path)?;
            serde_json::from_str::<Map<String, Value>>(&content)
                .with_context(|| format!("Failed to parse config store: {:?}", path))?
        } else {
            Map::new()
        };

        debug!(path = %path.display(), entries = values.len(), "opened config store");

        Ok(Self {
            fs,
            path,
            values: RwLock::new(values),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonConfigStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.write().unwrap();
        let mut updated = values.clone();
        updated.insert(key.to_string(), value);

        // Whole document is rewritten so the file never holds a partial entry
        let content = serde_json::to_string_pretty(&updated)
            .context("Failed to serialize config store")?;
        self.fs
            .write(&self.path, &content)
            .with_context(|| format!("Failed to write config store: {:?}", self.path))?;

        // Memory only follows the file once the write has landed
        *values = updated;
        Ok(())
    }
}

/// In-memory config store for tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryConfigStore {
    values: RwLock<std::collections::HashMap<String, Value>>,
    writes: RwLock<Vec<String>>,
}

#[cfg(test)]
impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: Value) -> Self {
        self.values.write().unwrap().insert(key.to_string(), value);
        self
    }

    /// Keys written through `set`, in order
    pub fn writes(&self) -> Vec<String> {
        self.writes.read().unwrap().clone()
    }
}

#[cfg(test)]
impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.writes.write().unwrap().push(key.to_string());
        self.values.write().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}
