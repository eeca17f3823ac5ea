//! # Playback State
//!
//! The controller's mutable state and the read-only snapshot handed to
//! observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::track::Track;

/// Repeat behaviour when a track ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    /// Next mode in the `off -> all -> one -> off` cycle.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse state-machine phase derived from the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    /// No track loaded yet.
    Idle,
    /// A play or pause request is in flight.
    Loading,
    Playing,
    Paused,
    /// The last operation failed and nothing has succeeded since.
    Error,
}

/// The most recent failure, kept until the next successful load or play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Operation that failed ("play", "load", "pause", ...).
    pub context: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Mutable playback state owned by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub is_loading: bool,
    pub current_time: f64,
    pub duration: f64,
    /// Stored volume in `0.0..=1.0`; independent of `is_muted`.
    pub volume: f32,
    pub is_muted: bool,
    pub is_shuffled: bool,
    pub repeat_mode: RepeatMode,
    pub is_liked: bool,
    pub show_waveform: bool,
    pub last_error: Option<ErrorRecord>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_loading: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 0.8,
            is_muted: false,
            is_shuffled: false,
            repeat_mode: RepeatMode::Off,
            is_liked: false,
            show_waveform: false,
            last_error: None,
        }
    }
}

impl PlaybackState {
    /// Volume actually sent to the backend: 0 while muted.
    pub fn audible_volume(&self) -> f32 {
        if self.is_muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Clamp a position into `[0, duration]`.
    ///
    /// While the duration is unknown (0) every position collapses to 0.
    pub fn clamp_position(&self, seconds: f64) -> f64 {
        if !seconds.is_finite() || seconds < 0.0 {
            return 0.0;
        }
        seconds.min(self.duration.max(0.0))
    }
}

/// Immutable copy of the state plus the current track.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub track: Option<Track>,
}

impl PlaybackSnapshot {
    pub fn phase(&self) -> PlayerPhase {
        if self.track.is_none() {
            PlayerPhase::Idle
        } else if self.state.is_loading {
            PlayerPhase::Loading
        } else if self.state.is_playing {
            PlayerPhase::Playing
        } else if self.state.last_error.is_some() {
            PlayerPhase::Error
        } else {
            PlayerPhase::Paused
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;

    #[test]
    fn test_repeat_cycle() {
        assert_eq!(RepeatMode::Off.cycle(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycle(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycle(), RepeatMode::Off);
        assert_eq!(RepeatMode::All.cycle().cycle().cycle(), RepeatMode::All);
    }

    #[test]
    fn test_repeat_serde() {
        assert_eq!(serde_json::to_string(&RepeatMode::One).unwrap(), "\"one\"");
        let mode: RepeatMode = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(mode, RepeatMode::All);
    }

    #[test]
    fn test_audible_volume() {
        let mut state = PlaybackState::default();
        assert_eq!(state.audible_volume(), 0.8);
        state.is_muted = true;
        assert_eq!(state.audible_volume(), 0.0);
        assert_eq!(state.volume, 0.8);
    }

    #[test]
    fn test_clamp_position() {
        let mut state = PlaybackState::default();
        assert_eq!(state.clamp_position(42.0), 0.0);
        state.duration = 30.0;
        assert_eq!(state.clamp_position(42.0), 30.0);
        assert_eq!(state.clamp_position(-1.0), 0.0);
        assert_eq!(state.clamp_position(f64::NAN), 0.0);
    }

    #[test]
    fn test_phase() {
        let mut snapshot = PlaybackSnapshot {
            state: PlaybackState::default(),
            track: None,
        };
        assert_eq!(snapshot.phase(), PlayerPhase::Idle);

        snapshot.track = Some(Track::new(1, "a", "b", SourceKind::Local, "/a.mp3"));
        assert_eq!(snapshot.phase(), PlayerPhase::Paused);

        snapshot.state.is_loading = true;
        assert_eq!(snapshot.phase(), PlayerPhase::Loading);

        snapshot.state.is_loading = false;
        snapshot.state.is_playing = true;
        assert_eq!(snapshot.phase(), PlayerPhase::Playing);

        snapshot.state.is_playing = false;
        snapshot.state.last_error = Some(ErrorRecord {
            context: "play".into(),
            message: "blocked".into(),
            at: Utc::now(),
        });
        assert_eq!(snapshot.phase(), PlayerPhase::Error);
    }
}
