//! Convenience helpers for wiring the wasm bridges together.
//!
//! [`build_wasm_bridges`] plays the role `bridge-desktop` plays on native
//! targets: one call that returns every trait object the playback core needs.

use std::sync::Arc;

use bridge_traits::{error::Result as BridgeResult, playback::MediaBackend, storage::SettingsStore};

use crate::{EmbedPlayerBackend, EmbedPlayerHandle, EmbedPlayerVars, HtmlAudioBackend, WasmSettingsStore};

/// Configuration for [`build_wasm_bridges`].
#[derive(Debug, Clone, Default)]
pub struct WasmBridgeConfig {
    /// Optional `localStorage` namespace. `None` writes keys verbatim.
    pub namespace: Option<String>,
    /// Parameters forwarded to the embed on every load.
    pub embed_vars: EmbedPlayerVars,
}

impl WasmBridgeConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Fully constructed wasm bridge objects ready for injection into the core.
pub struct WasmBridgeSet {
    /// Settings store layered on `localStorage`.
    pub settings_store: Arc<dyn SettingsStore>,
    /// `<audio>` backend for local files.
    pub local_backend: Arc<dyn MediaBackend>,
    /// Hidden embed backend for URL sources.
    pub embed_backend: Arc<dyn MediaBackend>,
}

/// Build the default wasm bridge stack around the page's embed player.
pub fn build_wasm_bridges(
    config: WasmBridgeConfig,
    embed: EmbedPlayerHandle,
) -> BridgeResult<WasmBridgeSet> {
    let settings_store: Arc<dyn SettingsStore> = match &config.namespace {
        Some(namespace) => Arc::new(WasmSettingsStore::namespaced(namespace)?),
        None => Arc::new(WasmSettingsStore::new()?),
    };
    let local_backend: Arc<dyn MediaBackend> = Arc::new(HtmlAudioBackend::new()?);
    let embed_backend: Arc<dyn MediaBackend> =
        Arc::new(EmbedPlayerBackend::with_vars(embed, config.embed_vars));

    tracing::debug!(namespace = ?config.namespace, "Built wasm bridges");

    Ok(WasmBridgeSet {
        settings_store,
        local_backend,
        embed_backend,
    })
}
