//! Embedded third-party player backend.
//!
//! The page hosts a hidden embeddable player (for direct URLs, streaming pages
//! and hosted video) and exposes it to Rust through a small JS object
//! implementing [`EmbedPlayerHandle`]. The expected shape is:
//!
//! ```text
//! {
//!   load(url, vars),        // point the player at a URL, do not start
//!   play() -> Promise,      // resolves once playback actually started
//!   pause(),
//!   seekTo(seconds),
//!   setVolume(fraction),
//!   getCurrentTime() -> number,
//!   getDuration() -> number,
//!   setHandlers({ onReady, onProgress, onDuration, onEnded, onError }),
//!   clearHandlers(),
//! }
//! ```

use std::cell::RefCell;

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    playback::{BackendKind, MediaBackend, MediaEvent, MediaEventSink, MediaRequest},
};
use js_sys::{Object, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;

use crate::error::{describe, js_error, WasmError};

#[wasm_bindgen]
extern "C" {
    /// Host-side wrapper around the embeddable player.
    #[derive(Clone, Debug)]
    pub type EmbedPlayerHandle;

    #[wasm_bindgen(method, catch, js_name = load)]
    fn load_url(this: &EmbedPlayerHandle, url: &str, vars: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = play)]
    fn start(this: &EmbedPlayerHandle) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = pause)]
    fn halt(this: &EmbedPlayerHandle) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = seekTo)]
    fn seek_to(this: &EmbedPlayerHandle, seconds: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setVolume)]
    fn apply_volume(this: &EmbedPlayerHandle, volume: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getCurrentTime)]
    fn get_current_time(this: &EmbedPlayerHandle) -> f64;

    #[wasm_bindgen(method, js_name = getDuration)]
    fn get_duration(this: &EmbedPlayerHandle) -> f64;

    #[wasm_bindgen(method, js_name = setHandlers)]
    fn set_handlers(this: &EmbedPlayerHandle, handlers: &JsValue);

    #[wasm_bindgen(method, js_name = clearHandlers)]
    fn clear_handlers(this: &EmbedPlayerHandle);
}

/// Player parameters passed through to the embed on every load.
///
/// The player is audio-only, so every visible affordance is switched off.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedPlayerVars {
    pub controls: u8,
    pub modestbranding: u8,
    pub rel: u8,
    pub showinfo: u8,
    pub preload: &'static str,
}

impl Default for EmbedPlayerVars {
    fn default() -> Self {
        Self {
            controls: 0,
            modestbranding: 1,
            rel: 0,
            showinfo: 0,
            preload: "metadata",
        }
    }
}

struct Handlers {
    on_ready: Closure<dyn FnMut()>,
    on_progress: Closure<dyn FnMut(f64)>,
    on_duration: Closure<dyn FnMut(f64)>,
    on_ended: Closure<dyn FnMut()>,
    on_error: Closure<dyn FnMut(JsValue)>,
}

impl Handlers {
    fn new(sink: MediaEventSink) -> Self {
        let ready = sink.clone();
        let progress = sink.clone();
        let duration = sink.clone();
        let ended = sink.clone();
        Self {
            on_ready: Closure::wrap(Box::new(move || ready.emit(MediaEvent::Ready))
                as Box<dyn FnMut()>),
            on_progress: Closure::wrap(Box::new(move |seconds: f64| {
                progress.emit(MediaEvent::TimeUpdate(seconds))
            }) as Box<dyn FnMut(f64)>),
            on_duration: Closure::wrap(Box::new(move |seconds: f64| {
                if seconds.is_finite() && seconds > 0.0 {
                    duration.emit(MediaEvent::DurationKnown(seconds))
                }
            }) as Box<dyn FnMut(f64)>),
            on_ended: Closure::wrap(Box::new(move || ended.emit(MediaEvent::Ended))
                as Box<dyn FnMut()>),
            on_error: Closure::wrap(Box::new(move |err: JsValue| {
                sink.emit(MediaEvent::Error(describe(&err)))
            }) as Box<dyn FnMut(JsValue)>),
        }
    }

    fn to_js(&self) -> Result<JsValue, JsValue> {
        let object = Object::new();
        Reflect::set(&object, &"onReady".into(), self.on_ready.as_ref())?;
        Reflect::set(&object, &"onProgress".into(), self.on_progress.as_ref())?;
        Reflect::set(&object, &"onDuration".into(), self.on_duration.as_ref())?;
        Reflect::set(&object, &"onEnded".into(), self.on_ended.as_ref())?;
        Reflect::set(&object, &"onError".into(), self.on_error.as_ref())?;
        Ok(object.into())
    }
}

/// [`MediaBackend`] for direct URLs and hosted video, driving the page's
/// hidden embed through an [`EmbedPlayerHandle`].
pub struct EmbedPlayerBackend {
    handle: EmbedPlayerHandle,
    vars: EmbedPlayerVars,
    handlers: RefCell<Option<Handlers>>,
}

impl EmbedPlayerBackend {
    pub fn new(handle: EmbedPlayerHandle) -> Self {
        Self::with_vars(handle, EmbedPlayerVars::default())
    }

    pub fn with_vars(handle: EmbedPlayerHandle, vars: EmbedPlayerVars) -> Self {
        Self {
            handle,
            vars,
            handlers: RefCell::new(None),
        }
    }

    /// Build a backend from an untyped JS value, e.g. a `#[wasm_bindgen]`
    /// export argument.
    pub fn from_js(value: JsValue) -> BridgeResult<Self> {
        if value.is_undefined() || value.is_null() {
            return Err(WasmError::NotAvailable("embed player handle".into()).into());
        }
        Ok(Self::new(value.unchecked_into()))
    }
}

#[async_trait(?Send)]
impl MediaBackend for EmbedPlayerBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Embed
    }

    async fn load(&self, request: MediaRequest) -> BridgeResult<()> {
        let mut vars = self.vars.clone();
        vars.preload = request.preload.as_attribute();
        let vars = serde_wasm_bindgen::to_value(&vars).map_err(WasmError::from)?;
        self.handle
            .load_url(&request.source.locator(), &vars)
            .map_err(|err| js_error("embed load", err))
    }

    async fn play(&self) -> BridgeResult<()> {
        let promise = self
            .handle
            .start()
            .map_err(|err| BridgeError::Rejected(describe(&err)))?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|err| BridgeError::Rejected(describe(&err)))
    }

    async fn pause(&self) -> BridgeResult<()> {
        self.handle
            .halt()
            .map_err(|err| js_error("embed pause", err))
    }

    async fn seek(&self, position_secs: f64) -> BridgeResult<()> {
        self.handle
            .seek_to(position_secs)
            .map_err(|err| js_error("embed seek", err))
    }

    async fn set_volume(&self, volume: f32) -> BridgeResult<()> {
        self.handle
            .apply_volume(f64::from(volume))
            .map_err(|err| js_error("embed volume", err))
    }

    fn current_time(&self) -> f64 {
        let time = self.handle.get_current_time();
        if time.is_finite() {
            time
        } else {
            0.0
        }
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.handle.get_duration();
        (duration.is_finite() && duration > 0.0).then_some(duration)
    }

    fn attach(&self, sink: MediaEventSink) {
        self.detach();
        let session = sink.session();
        let handlers = Handlers::new(sink);
        match handlers.to_js() {
            Ok(js) => {
                self.handle.set_handlers(&js);
                *self.handlers.borrow_mut() = Some(handlers);
            }
            Err(err) => {
                tracing::warn!(%session, error = %describe(&err), "Failed to install embed handlers")
            }
        }
    }

    fn detach(&self) {
        if self.handlers.borrow_mut().take().is_some() {
            self.handle.clear_handlers();
        }
    }
}

impl Drop for EmbedPlayerBackend {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn default_vars_hide_player_chrome() {
        let vars = serde_wasm_bindgen::to_value(&EmbedPlayerVars::default()).unwrap();
        let controls = Reflect::get(&vars, &"controls".into()).unwrap();
        let branding = Reflect::get(&vars, &"modestbranding".into()).unwrap();
        assert_eq!(controls.as_f64(), Some(0.0));
        assert_eq!(branding.as_f64(), Some(1.0));
    }

    #[wasm_bindgen_test]
    fn missing_handle_is_not_available() {
        let result = EmbedPlayerBackend::from_js(JsValue::UNDEFINED);
        assert!(matches!(result, Err(BridgeError::NotAvailable(_))));
    }
}
