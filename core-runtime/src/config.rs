//! # Core Configuration Module
//!
//! Builder-based dependency injection for the playback core.
//!
//! ## Overview
//!
//! `CoreConfig` holds the host capabilities every core crate needs. The
//! builder fails fast when a required capability is missing so misconfigured
//! hosts error at startup instead of on the first preference write.
//!
//! ## Required Dependencies
//!
//! - `SettingsStore` - Persisted player preferences and resume position
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `Clock` - Timestamps for recorded errors (default: [`SystemClock`])
//!
//! When the `desktop-shims` feature is enabled, an in-memory settings store
//! from `bridge-desktop` is injected if none is provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .settings_store(Arc::new(MyLocalStorage))
//!     .event_buffer_size(256)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::{EventBus, DEFAULT_EVENT_BUFFER_SIZE};
use bridge_traits::{Clock, SettingsStore, SystemClock};
use std::sync::Arc;

/// Largest accepted event buffer. Beyond this a lagging subscriber is a bug,
/// not a burst.
const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration shared by the playback crates.
#[derive(Clone)]
pub struct CoreConfig {
    /// User preferences storage (required)
    pub settings_store: Arc<dyn SettingsStore>,

    /// Time source for error timestamps
    pub clock: Arc<dyn Clock>,

    /// Per-subscriber buffer of the event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("settings_store", &"SettingsStore { ... }")
            .field("clock", &"Clock { ... }")
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }

    /// Create an event bus sized according to this configuration.
    pub fn event_bus(&self) -> EventBus {
        EventBus::new(self.event_buffer_size)
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required for player preferences. \
                 Desktop: enable the 'desktop-shims' feature or inject JsonFileSettingsStore. \
                 Web: inject the localStorage-backed WasmSettingsStore."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_settings_store() -> Result<Arc<dyn SettingsStore>> {
    use bridge_desktop::MemorySettingsStore;

    tracing::debug!("No SettingsStore configured, using in-memory store");
    let store: Arc<dyn SettingsStore> = Arc::new(MemorySettingsStore::new());
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_settings_store() -> Result<Arc<dyn SettingsStore>> {
    Err(settings_store_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    settings_store: Option<Arc<dyn SettingsStore>>,
    clock: Option<Arc<dyn Clock>>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the settings store implementation (required).
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Sets the clock. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the event bus buffer size.
    ///
    /// Default: 100 events
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no settings store was provided and
    ///   no default is available
    /// - [`Error::Config`] when a value is out of range
    pub fn build(self) -> Result<CoreConfig> {
        let settings_store = match self.settings_store {
            Some(store) => store,
            None => provide_default_settings_store()?,
        };

        let config = CoreConfig {
            settings_store,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::FixedClock;
    use chrono::{TimeZone, Utc};

    struct NullSettingsStore;

    #[async_trait]
    impl SettingsStore for NullSettingsStore {
        async fn set_string(&self, _key: &str, _value: &str) -> BridgeResult<()> {
            Ok(())
        }

        async fn get_string(&self, _key: &str) -> BridgeResult<Option<String>> {
            Ok(None)
        }

        async fn delete(&self, _key: &str) -> BridgeResult<()> {
            Ok(())
        }

        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_builder_with_required_fields() {
        let config = CoreConfig::builder()
            .settings_store(Arc::new(NullSettingsStore))
            .build()
            .unwrap();

        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_settings_store() {
        let result = CoreConfig::builder().build();
        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "SettingsStore")
            }
            other => panic!("expected CapabilityMissing, got {:?}", other.map(|_| ())),
        }
    }

    #[cfg(feature = "desktop-shims")]
    #[tokio::test]
    async fn test_build_with_desktop_defaults() {
        let config = CoreConfig::builder().build().unwrap();

        config
            .settings_store
            .set_string("probe", "value")
            .await
            .unwrap();
        assert_eq!(
            config.settings_store.get_string("probe").await.unwrap(),
            Some("value".to_string())
        );
    }

    #[test]
    fn test_validate_rejects_zero_buffer() {
        let result = CoreConfig::builder()
            .settings_store(Arc::new(NullSettingsStore))
            .event_buffer_size(0)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_excessive_buffer() {
        let result = CoreConfig::builder()
            .settings_store(Arc::new(NullSettingsStore))
            .event_buffer_size(MAX_EVENT_BUFFER_SIZE + 1)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_clock_is_used() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let config = CoreConfig::builder()
            .settings_store(Arc::new(NullSettingsStore))
            .clock(Arc::new(FixedClock(instant)))
            .build()
            .unwrap();

        assert_eq!(config.clock.now(), instant);
    }

    #[test]
    fn test_event_bus_uses_configured_size() {
        let config = CoreConfig::builder()
            .settings_store(Arc::new(NullSettingsStore))
            .event_buffer_size(8)
            .build()
            .unwrap();

        let bus = config.event_bus();
        let _rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = CoreConfig::builder()
            .settings_store(Arc::new(NullSettingsStore))
            .build()
            .unwrap();

        let cloned = config.clone();
        assert!(Arc::ptr_eq(&config.settings_store, &cloned.settings_store));
        assert!(format!("{:?}", cloned).contains("event_buffer_size"));
    }
}
