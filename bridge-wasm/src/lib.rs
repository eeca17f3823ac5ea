//! WebAssembly Bridge Implementations
//!
//! Browser implementations of the `bridge-traits` capabilities, built on
//! `web-sys` and `wasm-bindgen`.
//!
//! # Platform Support
//!
//! This crate targets `wasm32-unknown-unknown` only and compiles to nothing
//! elsewhere.
//!
//! # Implementations
//!
//! - [`WasmSettingsStore`]: `localStorage` key-value store
//! - [`HtmlAudioBackend`]: detached `<audio>` element for local files
//! - [`EmbedPlayerBackend`]: hidden third-party embed for URL sources
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::{build_wasm_bridges, EmbedPlayerHandle, WasmBridgeConfig};
//!
//! #[wasm_bindgen]
//! pub async fn start(embed: EmbedPlayerHandle) -> Result<(), JsValue> {
//!     let bridges = build_wasm_bridges(WasmBridgeConfig::default(), embed)?;
//!     // CoreConfig::builder().settings_store(bridges.settings_store) ...
//!     Ok(())
//! }
//! ```

#![cfg(target_arch = "wasm32")]

pub mod bootstrap;
pub mod embed;
pub mod error;
pub mod media;
pub mod storage;

pub use bootstrap::{build_wasm_bridges, WasmBridgeConfig, WasmBridgeSet};
pub use embed::{EmbedPlayerBackend, EmbedPlayerHandle, EmbedPlayerVars};
pub use error::{WasmError, WasmResult};
pub use media::HtmlAudioBackend;
pub use storage::WasmSettingsStore;
