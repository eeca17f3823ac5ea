//! # Player Configuration
//!
//! Tunables for the playback controller. Every field has a serde default so a
//! partial JSON document (or none at all) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PlaybackError, Result};

/// Playback controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Volume used when no preference has been persisted yet.
    ///
    /// Default: 0.8.
    #[serde(default = "default_volume")]
    pub default_volume: f32,

    /// Settings key holding the preference record.
    #[serde(default = "default_preferences_key")]
    pub preferences_key: String,

    /// Settings key holding the resume-position record.
    #[serde(default = "default_position_key")]
    pub position_key: String,

    /// Artwork shown when a track has none, or its artwork fails to load.
    #[serde(default = "default_placeholder_artwork")]
    pub placeholder_artwork: String,

    /// Whether position updates are written to the settings store.
    ///
    /// Default: true.
    #[serde(default = "default_persist_position")]
    pub persist_position: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            preferences_key: default_preferences_key(),
            position_key: default_position_key(),
            placeholder_artwork: default_placeholder_artwork(),
            persist_position: default_persist_position(),
        }
    }
}

impl PlayerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_volume) {
            return Err(PlaybackError::InvalidConfig(format!(
                "default_volume must be between 0.0 and 1.0, got {}",
                self.default_volume
            )));
        }

        if self.preferences_key.trim().is_empty() {
            return Err(PlaybackError::InvalidConfig(
                "preferences_key cannot be empty".to_string(),
            ));
        }

        if self.position_key.trim().is_empty() {
            return Err(PlaybackError::InvalidConfig(
                "position_key cannot be empty".to_string(),
            ));
        }

        if self.preferences_key == self.position_key {
            return Err(PlaybackError::InvalidConfig(
                "preferences_key and position_key must differ".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_volume() -> f32 {
    0.8
}

fn default_preferences_key() -> String {
    "musiczone-player-preferences".to_string()
}

fn default_position_key() -> String {
    "musiczone-playback-position".to_string()
}

fn default_placeholder_artwork() -> String {
    "/assets/images/no_image.png".to_string()
}

fn default_persist_position() -> bool {
    true
}
