//! Settings Storage for desktop hosts

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SettingsStore,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const APP_DIR: &str = "musiczone";
const SETTINGS_FILE: &str = "settings.json";

/// Default location of the settings file (`<data dir>/musiczone/settings.json`).
pub fn default_settings_path() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
        .ok_or_else(|| BridgeError::NotAvailable("user data directory".to_string()))
}

/// Volatile settings store
///
/// Everything lives in a map and disappears with the process. Used as the
/// default store when no other is configured, and throughout the tests.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.values.write().remove(key);
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.values.read().keys().cloned().collect())
    }
}

/// JSON-file backed settings store
///
/// Keeps a copy of the document in memory and rewrites the whole file on every
/// mutation (write to a sibling temp file, then rename). A file that cannot be
/// parsed is treated as empty rather than failing startup.
pub struct JsonFileSettingsStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileSettingsStore {
    /// Open (or lazily create) the store at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, String>>(&bytes) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = ?path, error = %e, "Discarding unreadable settings file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(BridgeError::Io(e)),
        };

        debug!(path = ?path, entries = values.len(), "Opened settings file");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Open the store at [`default_settings_path`].
    pub async fn open_default() -> Result<Self> {
        Self::open(default_settings_path()?).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let document = serde_json::to_vec_pretty(values).map_err(|e| {
            BridgeError::OperationFailed(format!("Failed to encode settings: {}", e))
        })?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, document)
            .await
            .map_err(BridgeError::Io)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(BridgeError::Io)?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().await;
        let previous = values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&values).await {
            match previous {
                Some(previous) => values.insert(key.to_string(), previous),
                None => values.remove(key),
            };
            return Err(e);
        }
        debug!(key = key, "Stored setting");
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().await;
        if let Some(previous) = values.remove(key) {
            if let Err(e) = self.flush(&values).await {
                values.insert(key.to_string(), previous);
                return Err(e);
            }
        }
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.values.lock().await.keys().cloned().collect())
    }
}
