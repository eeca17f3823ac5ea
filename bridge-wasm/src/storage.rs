//! `localStorage`-backed settings store.
//!
//! Keys are optionally prefixed with a namespace so several shells can share
//! one origin. Without a namespace the keys are written verbatim, which keeps
//! the player's `musiczone-*` entries readable from devtools and compatible
//! with data written by earlier builds of the site.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    storage::SettingsStore,
};

use crate::error::js_error;

fn local_storage() -> BridgeResult<web_sys::Storage> {
    let window = web_sys::window().ok_or_else(|| BridgeError::NotAvailable("window".into()))?;
    window
        .local_storage()
        .map_err(|err| js_error("localStorage", err))?
        .ok_or_else(|| BridgeError::NotAvailable("localStorage".into()))
}

#[derive(Clone)]
/// Browser-backed settings store (plain-text key/value pairs).
pub struct WasmSettingsStore {
    storage: web_sys::Storage,
    prefix: String,
}

impl WasmSettingsStore {
    /// Store writing keys verbatim into `localStorage`.
    pub fn new() -> BridgeResult<Self> {
        Ok(Self {
            storage: local_storage()?,
            prefix: String::new(),
        })
    }

    /// Store scoping every key under `<namespace>::`.
    pub fn namespaced(namespace: impl AsRef<str>) -> BridgeResult<Self> {
        Ok(Self {
            storage: local_storage()?,
            prefix: format!("{}::", namespace.as_ref()),
        })
    }

    fn key_for(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait(?Send)]
impl SettingsStore for WasmSettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.storage
            .set_item(&self.key_for(key), value)
            .map_err(|err| js_error("set setting", err))
    }

    async fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
        self.storage
            .get_item(&self.key_for(key))
            .map_err(|err| js_error("get setting", err))
    }

    async fn delete(&self, key: &str) -> BridgeResult<()> {
        self.storage
            .remove_item(&self.key_for(key))
            .map_err(|err| js_error("remove setting", err))
    }

    async fn list_keys(&self) -> BridgeResult<Vec<String>> {
        let len = self
            .storage
            .length()
            .map_err(|err| js_error("storage length", err))?;
        let mut keys = Vec::new();
        for idx in 0..len {
            if let Some(entry) = self
                .storage
                .key(idx)
                .map_err(|err| js_error("storage key", err))?
            {
                if let Some(stripped) = entry.strip_prefix(self.prefix.as_str()) {
                    keys.push(stripped.to_string());
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    fn unique_namespace(prefix: &str) -> String {
        format!("{prefix}-{}", js_sys::Date::now())
    }

    #[wasm_bindgen_test]
    async fn settings_roundtrip() {
        console_error_panic_hook::set_once();
        let store = WasmSettingsStore::namespaced(unique_namespace("settings")).unwrap();

        store
            .set_string("musiczone-player-preferences", r#"{"volume":0.4}"#)
            .await
            .unwrap();
        assert_eq!(
            store
                .get_string("musiczone-player-preferences")
                .await
                .unwrap()
                .as_deref(),
            Some(r#"{"volume":0.4}"#)
        );
        assert!(store.has_key("musiczone-player-preferences").await.unwrap());

        let keys = store.list_keys().await.unwrap();
        assert_eq!(keys, vec!["musiczone-player-preferences".to_string()]);

        store.delete("musiczone-player-preferences").await.unwrap();
        assert!(store.list_keys().await.unwrap().is_empty());
    }
}
