//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for native hosts (desktop shells,
//! CLIs, tests).
//!
//! ## Overview
//!
//! - [`MemorySettingsStore`]: volatile `SettingsStore`, injected by
//!   `core-runtime` when the `desktop-shims` feature is on and no store is
//!   configured
//! - [`JsonFileSettingsStore`]: `SettingsStore` persisted as a JSON document
//!   under the user's data directory
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::JsonFileSettingsStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(JsonFileSettingsStore::open_default().await.unwrap());
//!     // Hand it to CoreConfig::builder().settings_store(store)
//! }
//! ```

mod settings;

pub use settings::{default_settings_path, JsonFileSettingsStore, MemorySettingsStore};
