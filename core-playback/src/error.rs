//! # Playback Error Types
//!
//! Errors surfaced by the playback core. Control operations on the
//! controller absorb these (see [`crate::controller`]); they reach callers only
//! from construction, configuration and source classification.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// A pasted URL is malformed or points at nothing either backend plays.
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// The backend could not resolve the media reference.
    #[error("Failed to load track: {0}")]
    LoadFailed(String),

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// The host refused to start playback (autoplay policy, decode error).
    #[error("Play request rejected: {0}")]
    PlayRejected(String),

    /// Attempted operation when no track is loaded.
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Any other failure reported by a backend or the settings store.
    #[error("Backend error: {0}")]
    Backend(#[from] BridgeError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl PlaybackError {
    /// Returns `true` for failures the user can recover from by trying again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlaybackError::PlayRejected(_) | PlaybackError::Backend(BridgeError::Rejected(_))
        )
    }

    /// Returns `true` if the media reference itself could not be resolved.
    pub fn is_load_error(&self) -> bool {
        matches!(self, PlaybackError::LoadFailed(_))
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
