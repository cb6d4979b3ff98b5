//! Local cache of remote tags, one entry per package

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hpm_fs::{JsonStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::{Result, TagSet};

const APP_DIR: &str = "houdini-package-manager";
const CACHE_FILE: &str = "package_repo_data.json";

/// Cached remote data of one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCacheEntry {
    #[serde(default)]
    pub local_config_path: String,

    #[serde(default)]
    pub tags: TagSet,

    /// When the tags were last stored from a fetch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<DateTime<Utc>>,
}

type Entries = BTreeMap<String, TagCacheEntry>;

/// JSON file mapping package names to [`TagCacheEntry`].
///
/// Every write replaces the whole file. Concurrent writers are not
/// coordinated, so one process should own the cache at a time.
#[derive(Debug, Clone)]
pub struct TagCache {
    path: NormalizedPath,
    store: JsonStore,
}

impl TagCache {
    pub fn new(path: NormalizedPath) -> Self {
        Self {
            path,
            store: JsonStore::new(),
        }
    }

    /// `<data dir>/houdini-package-manager/package_repo_data.json`
    pub fn default_path() -> Option<NormalizedPath> {
        dirs::data_dir().map(|dir| NormalizedPath::new(dir.join(APP_DIR).join(CACHE_FILE)))
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Every entry. A missing cache file is created empty.
    pub fn entries(&self) -> Result<Entries> {
        Ok(self.store.load_or_init(&self.path)?)
    }

    pub fn get(&self, name: &str) -> Result<Option<TagCacheEntry>> {
        Ok(self.entries()?.remove(name))
    }

    /// Newest cached tag of `name`.
    pub fn latest(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .get(name)?
            .and_then(|entry| entry.tags.latest().map(str::to_string)))
    }

    /// Overwrite the tags of `name`, creating the entry if needed, and stamp
    /// the sync time.
    pub fn update(&self, name: &str, tags: &TagSet) -> Result<TagCacheEntry> {
        let mut entries = self.entries()?;
        let entry = entries.entry(name.to_string()).or_default();
        entry.tags = tags.clone();
        entry.last_synced = Some(Utc::now());
        let updated = entry.clone();

        self.store.save(&self.path, &entries)?;
        tracing::debug!(package = name, tags = tags.len(), "Updated cached tags");
        Ok(updated)
    }

    /// Record which config file the entry belongs to.
    pub fn set_local_config_path(&self, name: &str, config_path: &NormalizedPath) -> Result<()> {
        let mut entries = self.entries()?;
        let entry = entries.entry(name.to_string()).or_default();
        if entry.local_config_path == config_path.as_str() {
            return Ok(());
        }
        entry.local_config_path = config_path.to_string();
        self.store.save(&self.path, &entries)?;
        Ok(())
    }
}
