//! Media backend bridge traits and supporting types.
//!
//! These abstractions let the playback core drive whatever actually produces
//! sound on the host (a browser `<audio>` element, an embedded third-party
//! player, a test double) through one async control surface. Backends report
//! progress back through a [`MediaEventSink`] handed to them on
//! [`MediaBackend::attach`]; every event is tagged with the [`SessionId`] of the
//! load it belongs to so the core can discard late events from a previous
//! track.

use crate::{error::Result, platform::PlatformSendSync};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Which family of backend a session runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Native media element playing a local file or blob.
    Local,
    /// Hidden embeddable player for direct URLs and hosted video audio.
    Embed,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => f.write_str("local"),
            BackendKind::Embed => f.write_str("embed"),
        }
    }
}

/// Media locator handed to a backend on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// File path or blob reference resolvable by the local media element.
    LocalFile { path: PathBuf },
    /// Direct audio URL or a streaming page the embed understands.
    DirectUrl { url: String },
    /// Video-hosting URL whose audio the embed plays.
    YouTube { url: String },
}

impl MediaSource {
    /// The raw locator string, as a media element `src` would take it.
    pub fn locator(&self) -> String {
        match self {
            MediaSource::LocalFile { path } => path.to_string_lossy().into_owned(),
            MediaSource::DirectUrl { url } | MediaSource::YouTube { url } => url.clone(),
        }
    }

    /// Determine whether the source represents remote content.
    pub fn is_remote(&self) -> bool {
        !matches!(self, MediaSource::LocalFile { .. })
    }
}

/// How much a backend should fetch on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preload {
    /// Fetch nothing until playback is requested.
    None,
    /// Fetch enough to learn the duration (the default).
    #[default]
    Metadata,
    /// Buffer the whole resource.
    Auto,
}

impl Preload {
    /// Value for the HTML `preload` attribute.
    pub fn as_attribute(&self) -> &'static str {
        match self {
            Preload::None => "none",
            Preload::Metadata => "metadata",
            Preload::Auto => "auto",
        }
    }
}

/// Metadata associated with a load request. Backends may use this to enrich
/// platform media sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackMetadata {
    /// Opaque track identifier.
    pub track_id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Arbitrary extra fields (e.g., artwork URI).
    pub extra: HashMap<String, String>,
}

/// Request describing what a backend should load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub source: MediaSource,
    pub preload: Preload,
    pub metadata: PlaybackMetadata,
}

impl MediaRequest {
    /// Construct a request that preloads metadata only.
    pub fn new(source: MediaSource) -> Self {
        Self {
            source,
            preload: Preload::default(),
            metadata: PlaybackMetadata::default(),
        }
    }

    /// Attach metadata to the request.
    pub fn with_metadata(mut self, metadata: PlaybackMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Override the preload hint.
    pub fn with_preload(mut self, preload: Preload) -> Self {
        self.preload = preload;
        self
    }
}

/// Unique identifier for one attachment of a backend to one loaded track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a new session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Notifications a backend raises while a session is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position advanced, in seconds.
    TimeUpdate(f64),
    /// Authoritative duration became known, in seconds.
    DurationKnown(f64),
    /// Enough metadata is loaded for seeking to be meaningful.
    Ready,
    /// Playback reached the end of the media.
    Ended,
    /// The backend failed; the string is a human-readable cause.
    Error(String),
}

type Deliver = dyn Fn(SessionId, MediaEvent) + Send + Sync;

/// Session-tagged callback a backend uses to report [`MediaEvent`]s.
///
/// Cheap to clone; backends typically move a clone into each native listener
/// they register.
#[derive(Clone)]
pub struct MediaEventSink {
    session: SessionId,
    deliver: Arc<Deliver>,
}

impl MediaEventSink {
    pub fn new<F>(session: SessionId, deliver: F) -> Self
    where
        F: Fn(SessionId, MediaEvent) + Send + Sync + 'static,
    {
        Self {
            session,
            deliver: Arc::new(deliver),
        }
    }

    /// Session this sink reports for.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Forward an event to the owner of the sink.
    pub fn emit(&self, event: MediaEvent) {
        (self.deliver)(self.session, event);
    }
}

impl fmt::Debug for MediaEventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaEventSink")
            .field("session", &self.session)
            .finish()
    }
}

/// Trait for host backends that actually render audio.
///
/// Implementations must stop invoking a sink once [`MediaBackend::detach`] has
/// been called or another sink has been attached.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait MediaBackend: PlatformSendSync {
    /// Backend family, used for routing and diagnostics.
    fn kind(&self) -> BackendKind;

    /// Point the backend at new media. Should only preload what the request
    /// asks for and must not start playback.
    async fn load(&self, request: MediaRequest) -> Result<()>;

    /// Begin or resume playback. Resolves once the backend has actually
    /// started, or fails if the host refuses (autoplay policy, decode error).
    async fn play(&self) -> Result<()>;

    /// Pause playback without unloading.
    async fn pause(&self) -> Result<()>;

    /// Seek to an absolute position in seconds.
    async fn seek(&self, position_secs: f64) -> Result<()>;

    /// Set output volume, normalized to `0.0..=1.0`.
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Current position in seconds as the backend sees it.
    fn current_time(&self) -> f64;

    /// Duration in seconds, once known.
    fn duration(&self) -> Option<f64>;

    /// Start reporting events to `sink`, replacing any previous sink.
    fn attach(&self, sink: MediaEventSink);

    /// Stop reporting events.
    fn detach(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn media_request_defaults_to_metadata_preload() {
        let request = MediaRequest::new(MediaSource::LocalFile {
            path: PathBuf::from("/assets/audio/sample.mp3"),
        });
        assert_eq!(request.preload, Preload::Metadata);
        assert_eq!(request.preload.as_attribute(), "metadata");
        assert_eq!(request.source.locator(), "/assets/audio/sample.mp3");
        assert!(!request.source.is_remote());
    }

    #[test]
    fn session_id_is_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
        assert_eq!(a, SessionId::from_uuid(*a.as_uuid()));
    }

    #[test]
    fn sink_tags_events_with_its_session() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let session = SessionId::new();
        let sink = {
            let received = Arc::clone(&received);
            MediaEventSink::new(session, move |id, event| {
                received.lock().unwrap().push((id, event));
            })
        };

        sink.clone().emit(MediaEvent::TimeUpdate(1.5));
        sink.emit(MediaEvent::Ended);

        let received = received.lock().unwrap();
        assert_eq!(
            *received,
            vec![
                (session, MediaEvent::TimeUpdate(1.5)),
                (session, MediaEvent::Ended)
            ]
        );
    }
}
