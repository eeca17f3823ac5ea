//! Local media backend on top of a detached `HTMLAudioElement`.
//!
//! The element never enters the DOM. Listeners are registered per attached
//! session and removed on detach, so a late `timeupdate` from the previous
//! track cannot reach the new session's sink.

use std::cell::RefCell;

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    playback::{BackendKind, MediaBackend, MediaEvent, MediaEventSink, MediaRequest},
};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::error::{describe, js_error};

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// [`MediaBackend`] that plays local files and blob URLs through `<audio>`.
pub struct HtmlAudioBackend {
    element: HtmlAudioElement,
    listeners: RefCell<Vec<(&'static str, Listener)>>,
}

impl HtmlAudioBackend {
    /// Create a backend around a fresh, detached audio element.
    pub fn new() -> BridgeResult<Self> {
        let element = HtmlAudioElement::new().map_err(|err| js_error("create audio", err))?;
        Ok(Self::from_element(element))
    }

    /// Wrap an element the host already owns.
    pub fn from_element(element: HtmlAudioElement) -> Self {
        Self {
            element,
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    fn listen<F>(&self, event: &'static str, handler: F) -> BridgeResult<()>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        self.element
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|err| js_error("add listener", err))?;
        self.listeners.borrow_mut().push((event, closure));
        Ok(())
    }

    fn register(&self, sink: MediaEventSink) -> BridgeResult<()> {
        let element = self.element.clone();
        let on_time = sink.clone();
        self.listen("timeupdate", move |_| {
            on_time.emit(MediaEvent::TimeUpdate(element.current_time()));
        })?;

        let element = self.element.clone();
        let on_metadata = sink.clone();
        self.listen("loadedmetadata", move |_| {
            let duration = element.duration();
            if duration.is_finite() && duration > 0.0 {
                on_metadata.emit(MediaEvent::DurationKnown(duration));
            }
            on_metadata.emit(MediaEvent::Ready);
        })?;

        let on_ended = sink.clone();
        self.listen("ended", move |_| on_ended.emit(MediaEvent::Ended))?;

        let element = self.element.clone();
        self.listen("error", move |_| {
            let message = element
                .error()
                .map(|err| format!("media error code {}", err.code()))
                .unwrap_or_else(|| "media element error".to_string());
            sink.emit(MediaEvent::Error(message));
        })
    }
}

#[async_trait(?Send)]
impl MediaBackend for HtmlAudioBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn load(&self, request: MediaRequest) -> BridgeResult<()> {
        self.element.set_preload(request.preload.as_attribute());
        self.element.set_src(&request.source.locator());
        self.element.load();
        tracing::debug!(preload = request.preload.as_attribute(), "Audio element source set");
        Ok(())
    }

    async fn play(&self) -> BridgeResult<()> {
        let promise = self
            .element
            .play()
            .map_err(|err| BridgeError::Rejected(describe(&err)))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|err| BridgeError::Rejected(describe(&err)))
    }

    async fn pause(&self) -> BridgeResult<()> {
        self.element
            .pause()
            .map_err(|err| js_error("pause", err))
    }

    async fn seek(&self, position_secs: f64) -> BridgeResult<()> {
        self.element.set_current_time(position_secs);
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> BridgeResult<()> {
        self.element.set_volume(f64::from(volume));
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        (duration.is_finite() && duration > 0.0).then_some(duration)
    }

    fn attach(&self, sink: MediaEventSink) {
        self.detach();
        let session = sink.session();
        if let Err(err) = self.register(sink) {
            tracing::warn!(%session, error = %err, "Failed to register audio listeners");
        }
    }

    fn detach(&self) {
        for (event, closure) in self.listeners.borrow_mut().drain(..) {
            let _ = self
                .element
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for HtmlAudioBackend {
    fn drop(&mut self) {
        self.detach();
    }
}
