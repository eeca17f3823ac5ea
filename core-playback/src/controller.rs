//! # Playback Controller
//!
//! Owns the state of the single current track and mediates between the local
//! and embed backends.
//!
//! ## Overview
//!
//! Every UI surface talks to one `PlaybackController`:
//! - Routes each track to a backend by its [`SourceKind`]
//! - Tracks the in-flight play request and settles it before any pause
//! - Applies backend events (time updates, duration, ready, ended, errors)
//!   from the current session only
//! - Persists preferences and the resume position to the settings store
//! - Publishes [`PlaybackEvent`]s on the event bus for observers
//!
//! Control operations never return errors. Failures are recorded in
//! [`PlaybackState::last_error`], handed to the [`ErrorReporter`] and published
//! as [`PlaybackEvent::Error`].
//!
//! ## Backend events
//!
//! Backends report through a session-tagged [`MediaEventSink`]. Events are
//! queued in FIFO order and applied by [`PlaybackController::process_events`]
//! or by a host task running [`PlaybackController::run_event_loop`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_playback::{PlaybackController, Track, SourceKind};
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! # async fn example(local: Arc<dyn MediaBackend>, embed: Arc<dyn MediaBackend>) -> core_playback::Result<()> {
//! let core = CoreConfig::builder().build()?;
//! let controller = Arc::new(
//!     PlaybackController::builder(core)
//!         .local_backend(local)
//!         .embed_backend(embed)
//!         .build()
//!         .await?,
//! );
//!
//! tokio::spawn({
//!     let controller = Arc::clone(&controller);
//!     async move { controller.run_event_loop().await }
//! });
//!
//! controller
//!     .load_track(Track::new(7, "Midnight Dreams", "Luna", SourceKind::Local, "/m.mp3"))
//!     .await;
//! controller.play_pause().await;
//! # Ok(())
//! # }
//! ```

use bridge_traits::{
    BackendKind, BridgeError, Clock, MediaBackend, MediaEvent, MediaEventSink, SessionId,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use core_runtime::logging::strip_path;
use futures::future::{FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::backend::BackendSet;
use crate::config::PlayerConfig;
use crate::error::{PlaybackError, Result};
use crate::preferences::{PlaybackPosition, PlayerPreferences, PreferenceStore};
use crate::queue::TrackQueue;
use crate::report::{ErrorReporter, TracingErrorReporter};
use crate::source::SourceKind;
use crate::state::{ErrorRecord, PlaybackSnapshot, PlaybackState, RepeatMode};
use crate::track::Track;

type PlayOutcome = std::result::Result<(), Arc<BridgeError>>;

#[cfg(not(target_arch = "wasm32"))]
type PlayFuture = futures::future::BoxFuture<'static, PlayOutcome>;

#[cfg(target_arch = "wasm32")]
type PlayFuture = futures::future::LocalBoxFuture<'static, PlayOutcome>;

type QueuedEvent = (SessionId, MediaEvent);

/// A play request that has been issued but not yet observed to settle.
struct PendingPlay {
    ticket: u64,
    future: Shared<PlayFuture>,
}

/// One attachment of a backend to the current track.
struct ActiveSession {
    id: SessionId,
    backend: Arc<dyn MediaBackend>,
    kind: BackendKind,
    ready: bool,
    /// Set once the load failed; the position stays pinned at 0/0.
    failed: bool,
}

#[derive(Default)]
struct ControllerInner {
    state: PlaybackState,
    track: Option<Track>,
    session: Option<ActiveSession>,
    pending_play: Option<PendingPlay>,
    /// Resume position applied once the session reports `Ready`.
    pending_restore: Option<f64>,
}

impl ControllerInner {
    /// Whether position updates should land in the state.
    fn tracks_position(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.failed)
    }
}

/// Holds `is_loading` for the duration of a play/pause transition.
///
/// Resets the flag on drop so cancelled transitions cannot wedge the player.
struct LoadingGuard<'a> {
    inner: &'a Mutex<ControllerInner>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.inner.lock().state.is_loading = false;
    }
}

/// Single point of control for the current track's playback.
pub struct PlaybackController {
    backends: BackendSet,
    queue: Option<Arc<dyn TrackQueue>>,
    reporter: Arc<dyn ErrorReporter>,
    preferences: PreferenceStore,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
    config: PlayerConfig,

    inner: Mutex<ControllerInner>,
    play_tickets: AtomicU64,

    media_tx: mpsc::UnboundedSender<QueuedEvent>,
    media_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<QueuedEvent>>,
}

impl PlaybackController {
    /// Start building a controller on top of the shared core configuration.
    pub fn builder(core: CoreConfig) -> PlaybackControllerBuilder {
        PlaybackControllerBuilder::new(core)
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Immutable copy of the state and the current track.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let inner = self.inner.lock();
        PlaybackSnapshot {
            state: inner.state.clone(),
            track: inner.track.clone(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.inner.lock().state.clone()
    }

    pub fn current_track(&self) -> Option<Track> {
        self.inner.lock().track.clone()
    }

    /// Artwork for the current track, or the configured placeholder.
    pub fn current_artwork(&self) -> String {
        let inner = self.inner.lock();
        match &inner.track {
            Some(track) => track.artwork_or(&self.config.placeholder_artwork).to_string(),
            None => self.config.placeholder_artwork.clone(),
        }
    }

    /// Receive every [`CoreEvent`] published after this call.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // ========================================================================
    // Track Loading
    // ========================================================================

    /// Make `track` current and ask its backend to load it.
    ///
    /// A saved position for this exact track is restored once the backend
    /// reports `Ready`. Load failures are absorbed and reported.
    #[instrument(skip(self, track), fields(track_id = %track.id(), source = %track.source_kind()))]
    pub async fn load_track(&self, track: Track) {
        let kind = track.source_kind().backend();
        let backend = Arc::clone(self.backends.route(track.source_kind()));
        let session = SessionId::new();
        let restore = self.preferences.load_position(track.id()).await;

        let (previous, audible) = {
            let mut inner = self.inner.lock();
            let previous = inner.session.take();
            inner.state.current_time = 0.0;
            inner.state.duration = track.duration_seconds();
            inner.state.is_playing = false;
            inner.state.is_liked = false;
            inner.pending_restore = restore;
            inner.track = Some(track.clone());
            inner.session = Some(ActiveSession {
                id: session,
                backend: Arc::clone(&backend),
                kind,
                ready: false,
                failed: false,
            });
            (previous, inner.state.audible_volume())
        };

        if let Some(previous) = previous {
            previous.backend.detach();
            if previous.kind != kind {
                self.settle_pending_play().await;
                if let Err(e) = previous.backend.pause().await {
                    warn!(backend = %previous.kind, error = %e, "Failed to pause previous backend");
                }
            }
        }

        match track.source_kind() {
            SourceKind::Local => info!(
                file = strip_path(track.media_ref()),
                title = track.title(),
                "Loading local track"
            ),
            _ => info!(url = track.media_ref(), title = track.title(), "Loading remote track"),
        }

        backend.attach(self.sink_for(session));
        if let Err(e) = backend.set_volume(audible).await {
            warn!(error = %e, "Failed to apply volume to backend");
        }

        match backend.load(track.media_request()).await {
            Ok(()) => {
                if !self.is_current(session) {
                    return;
                }
                self.inner.lock().state.last_error = None;
                self.emit(PlaybackEvent::TrackLoaded {
                    track_id: track.id().to_string(),
                    title: track.title().to_string(),
                    artist: track.artist().to_string(),
                    backend: kind.to_string(),
                    duration_ms: to_millis(track.duration_seconds()),
                });
            }
            Err(e) => self.fail_load(session, e.to_string()),
        }
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Toggle between playing and paused.
    ///
    /// Ignored while another play/pause transition is in flight.
    pub async fn play_pause(&self) {
        let Some(_guard) = self.begin_transition() else {
            debug!("Ignoring play/pause while a transition is in flight");
            return;
        };

        let (playing, backend) = {
            let inner = self.inner.lock();
            (
                inner.state.is_playing,
                inner.session.as_ref().map(|s| Arc::clone(&s.backend)),
            )
        };

        let Some(backend) = backend else {
            self.fail("play", PlaybackError::NoTrackLoaded);
            return;
        };

        if playing {
            self.pause_on(&backend).await;
        } else {
            self.play_on(backend).await;
        }
    }

    /// Move to `seconds`, clamped to the known duration.
    ///
    /// The state is updated before the backend confirms so progress displays
    /// do not jump back.
    pub async fn seek(&self, seconds: f64) {
        let Some((backend, target)) = ({
            let mut inner = self.inner.lock();
            let target = inner.state.clamp_position(seconds);
            match inner.session.as_ref() {
                Some(active) if !active.failed => {
                    let backend = Arc::clone(&active.backend);
                    inner.state.current_time = target;
                    Some((backend, target))
                }
                _ => None,
            }
        }) else {
            debug!(seconds, "Ignoring seek without a playable track");
            return;
        };

        if let Err(e) = backend.seek(target).await {
            self.fail("seek", e.into());
        }
        self.position_changed().await;
    }

    /// Advance to the next queued track, or restart the current one.
    pub async fn next(&self) {
        let candidate = self.queue.as_ref().and_then(|queue| queue.next());
        self.skip_to(candidate).await;
    }

    /// Step back to the previous queued track, or restart the current one.
    pub async fn previous(&self) {
        let candidate = self.queue.as_ref().and_then(|queue| queue.previous());
        self.skip_to(candidate).await;
    }

    async fn skip_to(&self, candidate: Option<Track>) {
        match candidate {
            Some(track) => {
                let was_playing = self.inner.lock().state.is_playing;
                self.load_track(track).await;
                if was_playing {
                    self.auto_play().await;
                }
            }
            None => self.seek(0.0).await,
        }
    }

    /// Apply the repeat mode after the current track finished.
    pub async fn on_track_ended(&self) {
        let (mode, track_id, replayable) = {
            let mut inner = self.inner.lock();
            inner.state.is_playing = false;
            (
                inner.state.repeat_mode,
                inner.track.as_ref().map(|t| t.id().to_string()),
                inner.session.is_some(),
            )
        };
        let Some(track_id) = track_id else {
            return;
        };

        debug!(%track_id, repeat = %mode, "Track ended");
        self.emit(PlaybackEvent::Completed {
            track_id,
            repeat_mode: mode.to_string(),
        });

        if !replayable {
            return;
        }
        match mode {
            RepeatMode::Off => {}
            RepeatMode::One => self.replay_current().await,
            RepeatMode::All => {
                match self.queue.as_ref().and_then(|queue| queue.next()) {
                    Some(next) => {
                        self.load_track(next).await;
                        self.auto_play().await;
                    }
                    None => self.replay_current().await,
                }
            }
        }
    }

    // ========================================================================
    // Volume & Modes
    // ========================================================================

    /// Store a new volume, clamped to `0.0..=1.0`.
    ///
    /// Zero mutes. While muted the backend keeps receiving silence.
    pub async fn set_volume(&self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };

        let (forward, backend, preferences) = {
            let mut inner = self.inner.lock();
            let was_muted = inner.state.is_muted;
            inner.state.volume = volume;
            let forward = if was_muted {
                None
            } else if volume == 0.0 {
                inner.state.is_muted = true;
                Some(0.0)
            } else {
                Some(volume)
            };
            (forward, self.active_backend(&inner), preferences_of(&inner.state))
        };

        if let (Some(volume), Some(backend)) = (forward, backend) {
            if let Err(e) = backend.set_volume(volume).await {
                self.fail("volume", e.into());
            }
        }
        self.preferences.save_preferences(&preferences).await;
        self.volume_changed();
    }

    /// Mute or unmute without touching the stored volume.
    pub async fn toggle_mute(&self) {
        let (audible, backend) = {
            let mut inner = self.inner.lock();
            inner.state.is_muted = !inner.state.is_muted;
            (inner.state.audible_volume(), self.active_backend(&inner))
        };

        if let Some(backend) = backend {
            if let Err(e) = backend.set_volume(audible).await {
                self.fail("volume", e.into());
            }
        }
        self.volume_changed();
    }

    pub async fn toggle_shuffle(&self) {
        self.update_modes(|state| state.is_shuffled = !state.is_shuffled)
            .await;
    }

    /// Advance `off -> all -> one -> off`.
    pub async fn cycle_repeat_mode(&self) {
        self.update_modes(|state| state.repeat_mode = state.repeat_mode.cycle())
            .await;
    }

    pub async fn toggle_waveform(&self) {
        self.update_modes(|state| state.show_waveform = !state.show_waveform)
            .await;
    }

    /// Flip the like flag of the current track. Returns the new value.
    pub fn toggle_like(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.track.is_none() {
            return false;
        }
        inner.state.is_liked = !inner.state.is_liked;
        inner.state.is_liked
    }

    // ========================================================================
    // Backend Events
    // ========================================================================

    /// Apply every backend event queued so far. Returns how many were taken.
    ///
    /// Returns 0 without waiting when [`Self::run_event_loop`] owns the queue.
    pub async fn process_events(&self) -> usize {
        let Ok(mut rx) = self.media_rx.try_lock() else {
            return 0;
        };
        let mut processed = 0;
        while let Ok((session, event)) = rx.try_recv() {
            self.apply_media_event(session, event).await;
            processed += 1;
        }
        processed
    }

    /// Apply backend events as they arrive. Never returns while the
    /// controller is alive.
    pub async fn run_event_loop(&self) {
        let mut rx = self.media_rx.lock().await;
        while let Some((session, event)) = rx.recv().await {
            self.apply_media_event(session, event).await;
        }
    }

    /// Poll the active backend for its position and duration.
    pub async fn refresh_position(&self) {
        let Some(backend) = self.active_backend(&self.inner.lock()) else {
            return;
        };
        let current = backend.current_time();
        let duration = backend.duration();
        {
            let mut inner = self.inner.lock();
            if !inner.tracks_position() {
                return;
            }
            if let Some(duration) = duration.filter(|d| d.is_finite() && *d > 0.0) {
                inner.state.duration = duration;
            }
            inner.state.current_time = inner.state.clamp_position(current);
        }
        self.position_changed().await;
    }

    async fn apply_media_event(&self, session: SessionId, event: MediaEvent) {
        if !self.is_current(session) {
            warn!(%session, ?event, "Dropping event from a detached session");
            return;
        }

        match event {
            MediaEvent::TimeUpdate(seconds) => {
                {
                    let mut inner = self.inner.lock();
                    if !inner.tracks_position() {
                        return;
                    }
                    inner.state.current_time = inner.state.clamp_position(seconds);
                }
                self.position_changed().await;
            }
            MediaEvent::DurationKnown(seconds) => {
                if !seconds.is_finite() || seconds <= 0.0 {
                    debug!(seconds, "Ignoring unusable duration");
                    return;
                }
                let restore = {
                    let mut inner = self.inner.lock();
                    if !inner.tracks_position() {
                        return;
                    }
                    inner.state.duration = seconds;
                    inner.state.current_time =
                        inner.state.clamp_position(inner.state.current_time);
                    let ready = inner.session.as_ref().is_some_and(|s| s.ready);
                    if ready {
                        inner.pending_restore.take()
                    } else {
                        None
                    }
                };
                self.restore_position(restore).await;
            }
            MediaEvent::Ready => {
                let restore = {
                    let mut inner = self.inner.lock();
                    if let Some(active) = inner.session.as_mut() {
                        active.ready = true;
                    }
                    // Embeds may report ready before their duration.
                    if inner.state.duration > 0.0 {
                        inner.pending_restore.take()
                    } else {
                        None
                    }
                };
                self.restore_position(restore).await;
            }
            MediaEvent::Ended => self.on_track_ended().await,
            MediaEvent::Error(message) => {
                let ready = {
                    let inner = self.inner.lock();
                    inner.session.as_ref().is_some_and(|s| s.ready)
                };
                if ready {
                    self.fail(
                        "playback",
                        PlaybackError::Backend(BridgeError::OperationFailed(message)),
                    );
                } else {
                    self.fail_load(session, message);
                }
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn begin_transition(&self) -> Option<LoadingGuard<'_>> {
        let mut inner = self.inner.lock();
        if inner.state.is_loading {
            return None;
        }
        inner.state.is_loading = true;
        Some(LoadingGuard { inner: &self.inner })
    }

    /// Play from the current position under the loading guard.
    async fn auto_play(&self) {
        let Some(_guard) = self.begin_transition() else {
            debug!("Skipping automatic play while a transition is in flight");
            return;
        };
        let backend = self.active_backend(&self.inner.lock());
        if let Some(backend) = backend {
            self.play_on(backend).await;
        }
    }

    /// Seek to the start and play again under the loading guard.
    async fn replay_current(&self) {
        let Some(_guard) = self.begin_transition() else {
            debug!("Skipping replay while a transition is in flight");
            return;
        };
        let Some(backend) = self.active_backend(&self.inner.lock()) else {
            return;
        };

        self.inner.lock().state.current_time = 0.0;
        if let Err(e) = backend.seek(0.0).await {
            self.fail("seek", e.into());
            return;
        }
        self.position_changed().await;
        self.play_on(backend).await;
    }

    async fn play_on(&self, backend: Arc<dyn MediaBackend>) {
        // Resolution is shared so a later pause can wait for it.
        let session = self.current_session();
        let ticket = self.play_tickets.fetch_add(1, Ordering::Relaxed);

        let request = box_play(async move { backend.play().await.map_err(Arc::new) }).shared();

        self.inner.lock().pending_play = Some(PendingPlay {
            ticket,
            future: request.clone(),
        });
        let outcome = request.await;
        {
            let mut inner = self.inner.lock();
            if inner.pending_play.as_ref().is_some_and(|p| p.ticket == ticket) {
                inner.pending_play = None;
            }
        }

        if session.is_none() || self.current_session() != session {
            debug!("Discarding play result for a replaced track");
            return;
        }

        match outcome {
            Ok(()) => {
                let (track_id, title) = {
                    let mut inner = self.inner.lock();
                    inner.state.is_playing = true;
                    inner.state.last_error = None;
                    let track = inner.track.as_ref();
                    (
                        track.map(|t| t.id().to_string()).unwrap_or_default(),
                        track.map(|t| t.title().to_string()).unwrap_or_default(),
                    )
                };
                debug!(%track_id, "Playback started");
                self.emit(PlaybackEvent::Started { track_id, title });
            }
            Err(e) => self.fail("play", PlaybackError::PlayRejected(e.to_string())),
        }
    }

    async fn pause_on(&self, backend: &Arc<dyn MediaBackend>) {
        self.settle_pending_play().await;

        let result = backend.pause().await;
        let (track_id, position) = {
            let mut inner = self.inner.lock();
            inner.state.is_playing = false;
            (
                inner.track.as_ref().map(|t| t.id().to_string()).unwrap_or_default(),
                inner.state.current_time,
            )
        };

        match result {
            Ok(()) => {
                debug!(%track_id, position, "Playback paused");
                self.emit(PlaybackEvent::Paused {
                    track_id,
                    position_ms: to_millis(position),
                });
            }
            Err(e) => self.fail("pause", e.into()),
        }
    }

    /// Wait for any in-flight play request, ignoring how it ends.
    async fn settle_pending_play(&self) {
        let pending = self
            .inner
            .lock()
            .pending_play
            .as_ref()
            .map(|p| p.future.clone());
        if let Some(pending) = pending {
            debug!("Waiting for pending play request to settle");
            let _ = pending.await;
        }
    }

    async fn update_modes(&self, change: impl FnOnce(&mut PlaybackState)) {
        let (preferences, event) = {
            let mut inner = self.inner.lock();
            change(&mut inner.state);
            let state = &inner.state;
            (
                preferences_of(state),
                PlaybackEvent::ModeChanged {
                    shuffled: state.is_shuffled,
                    repeat_mode: state.repeat_mode.to_string(),
                    show_waveform: state.show_waveform,
                },
            )
        };
        self.preferences.save_preferences(&preferences).await;
        self.emit(event);
    }

    /// Persist and publish the current position.
    async fn position_changed(&self) {
        let Some((position, event)) = ({
            let inner = self.inner.lock();
            inner.track.as_ref().map(|track| {
                (
                    PlaybackPosition {
                        track_id: track.id().clone(),
                        current_time_seconds: inner.state.current_time,
                    },
                    PlaybackEvent::PositionChanged {
                        track_id: track.id().to_string(),
                        position_ms: to_millis(inner.state.current_time),
                        duration_ms: to_millis(inner.state.duration),
                    },
                )
            })
        }) else {
            return;
        };
        self.preferences.save_position(&position).await;
        self.emit(event);
    }

    async fn restore_position(&self, restore: Option<f64>) {
        if let Some(seconds) = restore {
            debug!(seconds, "Restoring saved position");
            self.seek(seconds).await;
        }
    }

    fn volume_changed(&self) {
        let (volume, muted) = {
            let inner = self.inner.lock();
            (inner.state.volume, inner.state.is_muted)
        };
        self.emit(PlaybackEvent::VolumeChanged { volume, muted });
    }

    /// Load errors leave the player at `0/0` on top of the usual failure path.
    fn fail_load(&self, session: SessionId, message: String) {
        if !self.is_current(session) {
            return;
        }
        {
            let mut inner = self.inner.lock();
            if let Some(active) = inner.session.as_mut() {
                active.failed = true;
            }
            inner.state.duration = 0.0;
            inner.state.current_time = 0.0;
            inner.pending_restore = None;
        }
        self.fail("load", PlaybackError::LoadFailed(message));
    }

    fn fail(&self, context: &str, error: PlaybackError) {
        let track_id = {
            let mut inner = self.inner.lock();
            inner.state.is_playing = false;
            inner.state.is_loading = false;
            inner.state.last_error = Some(ErrorRecord {
                context: context.to_string(),
                message: error.to_string(),
                at: self.clock.now(),
            });
            inner.track.as_ref().map(|t| t.id().to_string())
        };

        self.reporter.report_error(context, &error);
        self.emit(PlaybackEvent::Error {
            track_id,
            context: context.to_string(),
            message: error.to_string(),
            recoverable: error.is_transient(),
        });
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine.
        let _ = self.event_bus.emit(CoreEvent::Playback(event));
    }

    fn sink_for(&self, session: SessionId) -> MediaEventSink {
        let tx = self.media_tx.clone();
        MediaEventSink::new(session, move |session, event| {
            let _ = tx.send((session, event));
        })
    }

    fn active_backend(&self, inner: &ControllerInner) -> Option<Arc<dyn MediaBackend>> {
        inner.session.as_ref().map(|s| Arc::clone(&s.backend))
    }

    fn current_session(&self) -> Option<SessionId> {
        self.inner.lock().session.as_ref().map(|s| s.id)
    }

    fn is_current(&self, session: SessionId) -> bool {
        self.current_session() == Some(session)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn box_play<F>(request: F) -> PlayFuture
where
    F: std::future::Future<Output = PlayOutcome> + Send + 'static,
{
    request.boxed()
}

#[cfg(target_arch = "wasm32")]
fn box_play<F>(request: F) -> PlayFuture
where
    F: std::future::Future<Output = PlayOutcome> + 'static,
{
    request.boxed_local()
}

fn preferences_of(state: &PlaybackState) -> PlayerPreferences {
    PlayerPreferences {
        volume: state.volume,
        is_shuffled: state.is_shuffled,
        repeat_mode: state.repeat_mode,
        show_waveform: state.show_waveform,
    }
}

fn to_millis(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`PlaybackController`].
pub struct PlaybackControllerBuilder {
    core: CoreConfig,
    local_backend: Option<Arc<dyn MediaBackend>>,
    embed_backend: Option<Arc<dyn MediaBackend>>,
    queue: Option<Arc<dyn TrackQueue>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
    player_config: PlayerConfig,
    event_bus: Option<EventBus>,
}

impl PlaybackControllerBuilder {
    fn new(core: CoreConfig) -> Self {
        Self {
            core,
            local_backend: None,
            embed_backend: None,
            queue: None,
            reporter: None,
            player_config: PlayerConfig::default(),
            event_bus: None,
        }
    }

    /// Backend for uploaded files (required).
    pub fn local_backend(mut self, backend: Arc<dyn MediaBackend>) -> Self {
        self.local_backend = Some(backend);
        self
    }

    /// Backend for direct URLs and hosted video (required).
    pub fn embed_backend(mut self, backend: Arc<dyn MediaBackend>) -> Self {
        self.embed_backend = Some(backend);
        self
    }

    pub fn queue(mut self, queue: Arc<dyn TrackQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Defaults to [`TracingErrorReporter`].
    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn player_config(mut self, config: PlayerConfig) -> Self {
        self.player_config = config;
        self
    }

    /// Publish on an existing bus instead of creating one from the core config.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Validate the configuration and load persisted preferences.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::Runtime`] with `CapabilityMissing` when a backend
    ///   was not provided, or when the core config is invalid
    /// - [`PlaybackError::InvalidConfig`] when the player config is invalid
    pub async fn build(self) -> Result<PlaybackController> {
        self.core.validate()?;
        self.player_config.validate()?;

        let local = self.local_backend.ok_or_else(|| {
            core_runtime::Error::capability_missing("MediaBackend (local)", "local_backend")
        })?;
        let embed = self.embed_backend.ok_or_else(|| {
            core_runtime::Error::capability_missing("MediaBackend (embed)", "embed_backend")
        })?;

        let preferences = PreferenceStore::new(
            Arc::clone(&self.core.settings_store),
            &self.player_config,
        );
        let saved = preferences
            .load_preferences(self.player_config.default_volume)
            .await;

        let state = PlaybackState {
            volume: saved.volume,
            is_muted: saved.volume == 0.0,
            is_shuffled: saved.is_shuffled,
            repeat_mode: saved.repeat_mode,
            show_waveform: saved.show_waveform,
            ..PlaybackState::default()
        };
        info!(
            volume = state.volume,
            repeat = %state.repeat_mode,
            shuffled = state.is_shuffled,
            "Playback controller ready"
        );

        let event_bus = self.event_bus.unwrap_or_else(|| self.core.event_bus());
        let (media_tx, media_rx) = mpsc::unbounded_channel();

        Ok(PlaybackController {
            backends: BackendSet::new(local, embed),
            queue: self.queue,
            reporter: self
                .reporter
                .unwrap_or_else(|| Arc::new(TracingErrorReporter)),
            preferences,
            clock: Arc::clone(&self.core.clock),
            event_bus,
            config: self.player_config,
            inner: Mutex::new(ControllerInner {
                state,
                ..ControllerInner::default()
            }),
            play_tickets: AtomicU64::new(0),
            media_tx,
            media_rx: tokio::sync::Mutex::new(media_rx),
        })
    }
}
