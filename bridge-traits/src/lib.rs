//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback core and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that must be implemented differently per platform
//! (browser, desktop shell, tests).
//!
//! ## Traits
//!
//! - [`SettingsStore`](storage::SettingsStore) - Key-value preferences storage
//! - [`MediaBackend`](playback::MediaBackend) - Something that can play a track
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Provides |
//! |----------|---------------------|----------|
//! | Desktop  | `bridge-desktop`    | In-memory and JSON-file settings stores |
//! | Web      | `bridge-wasm`       | `localStorage` store, `<audio>` and embed backends |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Implementations should convert host errors (JS exceptions, I/O errors) into
//! it with enough context to tell which operation failed.
//!
//! ## Thread Safety
//!
//! On native targets all bridge traits require `Send + Sync`. On `wasm32` the
//! bounds are dropped, see [`platform`].

pub mod error;
pub mod platform;
pub mod playback;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use playback::{
    BackendKind, MediaBackend, MediaEvent, MediaEventSink, MediaRequest, MediaSource,
    PlaybackMetadata, Preload, SessionId,
};
pub use storage::SettingsStore;
pub use time::{Clock, FixedClock, LogLevel, SystemClock};
