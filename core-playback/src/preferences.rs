//! # Preference Persistence
//!
//! Two JSON records live in the settings store:
//!
//! ```text
//! musiczone-player-preferences -> {"volume":0.8,"isShuffled":false,"repeatMode":"off","showWaveform":false}
//! musiczone-playback-position  -> {"trackId":7,"currentTimeSeconds":120}
//! ```
//!
//! Both are best effort. Reads that fail or do not parse fall back to
//! defaults; writes that fail are logged and otherwise ignored.

use bridge_traits::SettingsStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::PlayerConfig;
use crate::state::RepeatMode;
use crate::track::TrackId;

/// Persisted player preferences.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPreferences {
    pub volume: f32,
    pub is_shuffled: bool,
    pub repeat_mode: RepeatMode,
    pub show_waveform: bool,
}

impl PlayerPreferences {
    pub fn with_volume(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            is_shuffled: false,
            repeat_mode: RepeatMode::Off,
            show_waveform: false,
        }
    }

    /// Parse a stored record, defaulting each missing field individually.
    pub fn from_json(raw: &str, default_volume: f32) -> serde_json::Result<Self> {
        let stored: StoredPreferences = serde_json::from_str(raw)?;
        let volume = stored
            .volume
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0) as f32)
            .unwrap_or(default_volume);
        Ok(Self {
            volume,
            is_shuffled: stored.is_shuffled.unwrap_or(false),
            repeat_mode: stored.repeat_mode.unwrap_or_default(),
            show_waveform: stored.show_waveform.unwrap_or(false),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPreferences {
    volume: Option<f64>,
    is_shuffled: Option<bool>,
    repeat_mode: Option<RepeatMode>,
    show_waveform: Option<bool>,
}

/// Persisted resume position for one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackPosition {
    pub track_id: TrackId,
    #[serde(alias = "currentTime")]
    pub current_time_seconds: f64,
}

/// Reads and writes the preference and position records.
#[derive(Clone)]
pub struct PreferenceStore {
    store: Arc<dyn SettingsStore>,
    preferences_key: String,
    position_key: String,
    persist_position: bool,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn SettingsStore>, config: &PlayerConfig) -> Self {
        Self {
            store,
            preferences_key: config.preferences_key.clone(),
            position_key: config.position_key.clone(),
            persist_position: config.persist_position,
        }
    }

    /// Load preferences, or defaults built from `default_volume`.
    pub async fn load_preferences(&self, default_volume: f32) -> PlayerPreferences {
        let raw = match self.store.get_string(&self.preferences_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return PlayerPreferences::with_volume(default_volume),
            Err(e) => {
                warn!(key = %self.preferences_key, error = %e, "Failed to read preferences");
                return PlayerPreferences::with_volume(default_volume);
            }
        };

        match PlayerPreferences::from_json(&raw, default_volume) {
            Ok(preferences) => {
                debug!(?preferences, "Loaded player preferences");
                preferences
            }
            Err(e) => {
                warn!(key = %self.preferences_key, error = %e, "Discarding malformed preferences");
                PlayerPreferences::with_volume(default_volume)
            }
        }
    }

    pub async fn save_preferences(&self, preferences: &PlayerPreferences) {
        self.write(&self.preferences_key, preferences).await;
    }

    /// Saved position for `track_id`, if the stored record belongs to it.
    pub async fn load_position(&self, track_id: &TrackId) -> Option<f64> {
        let raw = match self.store.get_string(&self.position_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %self.position_key, error = %e, "Failed to read playback position");
                return None;
            }
        };

        match serde_json::from_str::<PlaybackPosition>(&raw) {
            Ok(position) if &position.track_id == track_id => {
                let seconds = position.current_time_seconds;
                (seconds.is_finite() && seconds > 0.0).then_some(seconds)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(key = %self.position_key, error = %e, "Discarding malformed playback position");
                None
            }
        }
    }

    pub async fn save_position(&self, position: &PlaybackPosition) {
        if self.persist_position {
            self.write(&self.position_key, position).await;
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode setting");
                return;
            }
        };
        if let Err(e) = self.store.set_string(key, &json).await {
            warn!(key, error = %e, "Failed to persist setting");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;
    use std::sync::Mutex;

    mock! {
        Store {}

        #[async_trait::async_trait]
        impl SettingsStore for Store {
            async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()>;
            async fn get_string(&self, key: &str) -> BridgeResult<Option<String>>;
            async fn delete(&self, key: &str) -> BridgeResult<()>;
            async fn list_keys(&self) -> BridgeResult<Vec<String>>;
        }
    }

    fn store_with(raw: Option<&'static str>) -> PreferenceStore {
        let mut store = MockStore::new();
        store
            .expect_get_string()
            .returning(move |_| Ok(raw.map(str::to_string)));
        PreferenceStore::new(Arc::new(store), &PlayerConfig::default())
    }

    #[test]
    fn test_missing_fields_default_individually() {
        let prefs = PlayerPreferences::from_json(r#"{"repeatMode":"one"}"#, 0.8).unwrap();
        assert_eq!(prefs.volume, 0.8);
        assert_eq!(prefs.repeat_mode, RepeatMode::One);
        assert!(!prefs.is_shuffled);
    }

    #[test]
    fn test_out_of_range_volume_is_clamped() {
        let loud = PlayerPreferences::from_json(r#"{"volume":3}"#, 0.8).unwrap();
        assert_eq!(loud.volume, 1.0);
        let negative = PlayerPreferences::from_json(r#"{"volume":-1}"#, 0.8).unwrap();
        assert_eq!(negative.volume, 0.0);
    }

    #[test]
    fn test_preferences_json_shape() {
        let json = serde_json::to_string(&PlayerPreferences {
            volume: 0.5,
            is_shuffled: true,
            repeat_mode: RepeatMode::All,
            show_waveform: true,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"volume":0.5,"isShuffled":true,"repeatMode":"all","showWaveform":true}"#
        );
    }

    #[test]
    fn test_position_accepts_legacy_field() {
        let legacy: PlaybackPosition =
            serde_json::from_str(r#"{"trackId":7,"currentTime":120}"#).unwrap();
        assert_eq!(legacy.current_time_seconds, 120.0);
        assert_eq!(legacy.track_id, TrackId::Numeric(7));
    }

    #[tokio::test]
    async fn test_malformed_preferences_fall_back() {
        let store = store_with(Some("{not json"));
        let prefs = store.load_preferences(0.8).await;
        assert_eq!(prefs, PlayerPreferences::with_volume(0.8));
    }

    #[tokio::test]
    async fn test_read_failure_falls_back() {
        let mut mock = MockStore::new();
        mock.expect_get_string()
            .returning(|_| Err(BridgeError::NotAvailable("localStorage".into())));
        let store = PreferenceStore::new(Arc::new(mock), &PlayerConfig::default());

        assert_eq!(store.load_preferences(0.6).await.volume, 0.6);
        assert_eq!(store.load_position(&TrackId::Numeric(7)).await, None);
    }

    #[tokio::test]
    async fn test_position_only_for_matching_track() {
        let store = store_with(Some(r#"{"trackId":7,"currentTimeSeconds":120}"#));
        assert_eq!(store.load_position(&TrackId::Numeric(7)).await, Some(120.0));
        assert_eq!(store.load_position(&TrackId::Numeric(8)).await, None);
        assert_eq!(store.load_position(&TrackId::from("7")).await, None);
    }

    #[tokio::test]
    async fn test_write_failures_are_swallowed() {
        let mut mock = MockStore::new();
        mock.expect_set_string()
            .times(1)
            .returning(|_, _| Err(BridgeError::OperationFailed("quota exceeded".into())));
        let store = PreferenceStore::new(Arc::new(mock), &PlayerConfig::default());

        store
            .save_preferences(&PlayerPreferences::with_volume(0.3))
            .await;
    }

    #[tokio::test]
    async fn test_position_not_written_when_disabled() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let mut mock = MockStore::new();
        {
            let written = Arc::clone(&written);
            mock.expect_set_string().returning(move |key, _| {
                written.lock().unwrap().push(key.to_string());
                Ok(())
            });
        }
        let config = PlayerConfig {
            persist_position: false,
            ..Default::default()
        };
        let store = PreferenceStore::new(Arc::new(mock), &config);

        store
            .save_position(&PlaybackPosition {
                track_id: TrackId::Numeric(1),
                current_time_seconds: 10.0,
            })
            .await;
        store
            .save_preferences(&PlayerPreferences::with_volume(0.5))
            .await;

        assert_eq!(
            *written.lock().unwrap(),
            vec!["musiczone-player-preferences".to_string()]
        );
    }
}
