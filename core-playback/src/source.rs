//! # Source Classification
//!
//! Decides which backend a track plays on and validates URLs pasted into the
//! upload screen.

use bridge_traits::BackendKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::{PlaybackError, Result};

const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
];

const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".wav", ".flac", ".m4a", ".aac", ".ogg", ".wma"];

const STREAMING_DOMAINS: &[&str] = &[
    "soundcloud.com",
    "spotify.com",
    "apple.com",
    "bandcamp.com",
    "mixcloud.com",
];

/// Where a track's media lives. Fully determines backend routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Uploaded file or blob, played by the local media element.
    #[serde(rename = "local")]
    Local,
    /// Direct audio URL or streaming page, played by the embed.
    #[serde(rename = "directUrl")]
    DirectUrl,
    /// Hosted video, played audio-only by the embed.
    #[serde(rename = "youtube")]
    YouTube,
}

impl SourceKind {
    /// Backend family that plays this kind of source.
    pub fn backend(&self) -> BackendKind {
        match self {
            SourceKind::Local => BackendKind::Local,
            SourceKind::DirectUrl | SourceKind::YouTube => BackendKind::Embed,
        }
    }

    /// Classify a pasted URL.
    ///
    /// Video-hosting URLs win over the audio-extension and streaming-domain
    /// checks, and must carry a video id.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::UnsupportedSource`] for malformed URLs, video URLs
    /// without an id, and anything neither backend can play.
    pub fn classify_url(input: &str) -> Result<SourceKind> {
        let url = parse_url(input)?;
        let host = host_of(&url);

        if is_youtube_host(&host) {
            YouTubeRef::from_url(&url)?;
            return Ok(SourceKind::YouTube);
        }

        let path = url.path().to_ascii_lowercase();
        let has_audio_extension = AUDIO_EXTENSIONS.iter().any(|ext| path.contains(ext));
        let is_streaming = STREAMING_DOMAINS
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)));

        if has_audio_extension || is_streaming {
            Ok(SourceKind::DirectUrl)
        } else {
            Err(PlaybackError::UnsupportedSource(format!(
                "{} is neither an audio file nor a supported streaming site",
                input
            )))
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Local => f.write_str("local"),
            SourceKind::DirectUrl => f.write_str("directUrl"),
            SourceKind::YouTube => f.write_str("youtube"),
        }
    }
}

/// A validated video-hosting reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeRef {
    video_id: String,
}

impl YouTubeRef {
    /// Extract the video id from `youtu.be/<id>` or `...?v=<id>`.
    pub fn parse(input: &str) -> Result<Self> {
        let url = parse_url(input)?;
        if !is_youtube_host(&host_of(&url)) {
            return Err(PlaybackError::UnsupportedSource(format!(
                "{} is not a YouTube URL",
                input
            )));
        }
        Self::from_url(&url)
    }

    fn from_url(url: &Url) -> Result<Self> {
        let video_id = if host_of(url) == "youtu.be" {
            url.path_segments()
                .and_then(|mut segments| segments.next())
                .map(str::to_string)
        } else {
            url.query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
        };

        match video_id {
            Some(video_id) if !video_id.is_empty() => Ok(Self { video_id }),
            _ => Err(PlaybackError::UnsupportedSource(format!(
                "could not extract a video id from {}",
                url
            ))),
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.video_id)
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", self.video_id)
    }
}

fn parse_url(input: &str) -> Result<Url> {
    Url::parse(input.trim())
        .map_err(|e| PlaybackError::UnsupportedSource(format!("invalid URL {}: {}", input, e)))
}

fn host_of(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_ascii_lowercase()
}

fn is_youtube_host(host: &str) -> bool {
    YOUTUBE_HOSTS.contains(&host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_urls() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
        ] {
            assert_eq!(SourceKind::classify_url(url).unwrap(), SourceKind::YouTube, "{url}");
            assert_eq!(YouTubeRef::parse(url).unwrap().video_id(), "dQw4w9WgXcQ");
        }
    }

    #[test]
    fn test_youtube_without_id_is_rejected() {
        assert!(matches!(
            SourceKind::classify_url("https://www.youtube.com/feed/trending"),
            Err(PlaybackError::UnsupportedSource(_))
        ));
        assert!(YouTubeRef::parse("https://youtu.be/").is_err());
    }

    #[test]
    fn test_youtube_derived_urls() {
        let yt = YouTubeRef::parse("https://youtu.be/abc123").unwrap();
        assert_eq!(yt.embed_url(), "https://www.youtube.com/embed/abc123");
        assert_eq!(
            yt.thumbnail_url(),
            "https://img.youtube.com/vi/abc123/maxresdefault.jpg"
        );
    }

    #[test]
    fn test_direct_audio_urls() {
        assert_eq!(
            SourceKind::classify_url("https://cdn.example.com/music/Song.MP3").unwrap(),
            SourceKind::DirectUrl
        );
        assert_eq!(
            SourceKind::classify_url("https://example.com/a.flac?token=1").unwrap(),
            SourceKind::DirectUrl
        );
    }

    #[test]
    fn test_streaming_domains() {
        assert_eq!(
            SourceKind::classify_url("https://soundcloud.com/artist/track").unwrap(),
            SourceKind::DirectUrl
        );
        assert_eq!(
            SourceKind::classify_url("https://open.spotify.com/track/xyz").unwrap(),
            SourceKind::DirectUrl
        );
    }

    #[test]
    fn test_unsupported_and_malformed() {
        assert!(SourceKind::classify_url("https://example.com/page.html").is_err());
        assert!(SourceKind::classify_url("not a url").is_err());
        assert!(YouTubeRef::parse("https://vimeo.com/123").is_err());
    }

    #[test]
    fn test_backend_routing() {
        assert_eq!(SourceKind::Local.backend(), BackendKind::Local);
        assert_eq!(SourceKind::DirectUrl.backend(), BackendKind::Embed);
        assert_eq!(SourceKind::YouTube.backend(), BackendKind::Embed);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&SourceKind::DirectUrl).unwrap(), "\"directUrl\"");
        let kind: SourceKind = serde_json::from_str("\"youtube\"").unwrap();
        assert_eq!(kind, SourceKind::YouTube);
    }
}
