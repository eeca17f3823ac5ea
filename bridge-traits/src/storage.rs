//! Key-value storage abstraction
//!
//! The playback core persists two small JSON records (player preferences and
//! the last playback position). Hosts decide where they live:
//! - Web: `localStorage`
//! - Desktop: a JSON file in the user's data directory, or memory for tests

use crate::{error::Result, platform::PlatformSendSync};

/// Key-value settings storage trait
///
/// Values are opaque strings; callers are responsible for their encoding
/// (the playback core stores JSON documents).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn remember_volume(store: &dyn SettingsStore) -> Result<()> {
///     store.set_string("musiczone-player-preferences", r#"{"volume":0.5}"#).await?;
///     Ok(())
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait SettingsStore: PlatformSendSync {
    /// Store a string value, replacing any previous value for `key`.
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value. Returns `Ok(None)` if the key doesn't exist.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Delete a setting. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key).await?.is_some())
    }

    /// List all setting keys
    async fn list_keys(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use mockall::mock;

    mock! {
        Store {}

        #[async_trait::async_trait]
        impl SettingsStore for Store {
            async fn set_string(&self, key: &str, value: &str) -> Result<()>;
            async fn get_string(&self, key: &str) -> Result<Option<String>>;
            async fn delete(&self, key: &str) -> Result<()>;
            async fn list_keys(&self) -> Result<Vec<String>>;
        }
    }

    #[tokio::test]
    async fn has_key_delegates_to_get_string() {
        let mut store = MockStore::new();
        store.expect_get_string().returning(|key| {
            if key == "present" {
                Ok(Some("{}".to_string()))
            } else {
                Ok(None)
            }
        });

        assert!(store.has_key("present").await.unwrap());
        assert!(!store.has_key("absent").await.unwrap());
    }

    #[tokio::test]
    async fn has_key_propagates_read_errors() {
        let mut store = MockStore::new();
        store
            .expect_get_string()
            .returning(|_| Err(BridgeError::NotAvailable("localStorage".into())));

        assert!(matches!(
            store.has_key("anything").await,
            Err(BridgeError::NotAvailable(_))
        ));
    }
}
