//! # Playback Control Module
//!
//! Coordinates playback of the single current track across two host
//! backends.
//!
//! ## Overview
//!
//! This module handles:
//! - Routing tracks to the local media element or the hidden embed player
//! - Play/pause transitions with pending-request settlement
//! - Seek, volume, mute, shuffle, repeat and like state
//! - Repeat and queue behaviour when a track ends
//! - Persisting preferences and the resume position
//! - Classifying pasted URLs into playable sources

pub mod backend;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod preferences;
pub mod queue;
pub mod report;
pub mod source;
pub mod state;
pub mod track;

pub use backend::BackendSet;
pub use config::PlayerConfig;
pub use controller::{PlaybackController, PlaybackControllerBuilder};
pub use display::{format_time, progress_percent};
pub use error::{PlaybackError, Result};
pub use preferences::{PlaybackPosition, PlayerPreferences, PreferenceStore};
pub use queue::TrackQueue;
pub use report::{ErrorReporter, TracingErrorReporter};
pub use source::{SourceKind, YouTubeRef};
pub use state::{ErrorRecord, PlaybackSnapshot, PlaybackState, PlayerPhase, RepeatMode};
pub use track::{Track, TrackId};
