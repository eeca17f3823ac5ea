//! # Track Model
//!
//! Read-only description of something the player can play. Tracks come from
//! the library screens or from a pasted URL; the controller never mutates them.

use bridge_traits::{MediaRequest, MediaSource, PlaybackMetadata};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::error::Result;
use crate::source::{SourceKind, YouTubeRef};

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_ARTIST: &str = "Unknown Artist";
const YOUTUBE_TITLE: &str = "YouTube Video";

/// Opaque track identifier. Library tracks use numbers, uploads use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Numeric(id) => write!(f, "{}", id),
            TrackId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for TrackId {
    fn from(id: u64) -> Self {
        TrackId::Numeric(id)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        TrackId::Text(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        TrackId::Text(id)
    }
}

/// A playable track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    id: TrackId,
    title: String,
    artist: String,
    #[serde(default)]
    album: String,
    #[serde(default)]
    artwork_url: Option<String>,
    #[serde(default)]
    duration_seconds: f64,
    source_kind: SourceKind,
    media_ref: String,
}

impl Track {
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        source_kind: SourceKind,
        media_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: String::new(),
            artwork_url: None,
            duration_seconds: 0.0,
            source_kind,
            media_ref: media_ref.into(),
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    pub fn with_artwork(mut self, artwork_url: impl Into<String>) -> Self {
        self.artwork_url = Some(artwork_url.into());
        self
    }

    /// Nominal duration; negative or non-finite values become 0.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
        self
    }

    /// Build a track for a URL pasted into the upload screen.
    ///
    /// Direct files are titled after their file name; hosted video gets a
    /// generic title and the video thumbnail as artwork.
    pub fn from_url(id: impl Into<TrackId>, url: &str) -> Result<Self> {
        let kind = SourceKind::classify_url(url)?;
        let track = match kind {
            SourceKind::YouTube => {
                let video = YouTubeRef::parse(url)?;
                Track::new(id, YOUTUBE_TITLE, UNKNOWN_ARTIST, kind, url)
                    .with_artwork(video.thumbnail_url())
            }
            _ => Track::new(id, title_from_url(url), UNKNOWN_ARTIST, kind, url),
        };
        Ok(track)
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn artwork_url(&self) -> Option<&str> {
        self.artwork_url.as_deref()
    }

    /// Artwork to display, falling back to `placeholder` when absent.
    pub fn artwork_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.artwork_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => placeholder,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn media_ref(&self) -> &str {
        &self.media_ref
    }

    /// Locator handed to the backend.
    pub fn media_source(&self) -> MediaSource {
        match self.source_kind {
            SourceKind::Local => MediaSource::LocalFile {
                path: PathBuf::from(&self.media_ref),
            },
            SourceKind::DirectUrl => MediaSource::DirectUrl {
                url: self.media_ref.clone(),
            },
            SourceKind::YouTube => MediaSource::YouTube {
                url: self.media_ref.clone(),
            },
        }
    }

    /// Load request for this track, metadata preload only.
    pub fn media_request(&self) -> MediaRequest {
        let mut metadata = PlaybackMetadata {
            track_id: Some(self.id.to_string()),
            title: Some(self.title.clone()),
            artist: Some(self.artist.clone()),
            album: (!self.album.is_empty()).then(|| self.album.clone()),
            ..Default::default()
        };
        if let Some(artwork) = &self.artwork_url {
            metadata.extra.insert("artwork".to_string(), artwork.clone());
        }
        MediaRequest::new(self.media_source()).with_metadata(metadata)
    }
}

fn title_from_url(input: &str) -> String {
    Url::parse(input)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .and_then(|segment| segment.split('.').next())
                .filter(|stem| !stem.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}
