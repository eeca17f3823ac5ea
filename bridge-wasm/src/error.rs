//! Error types for WebAssembly bridge implementations

use bridge_traits::error::BridgeError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type for WebAssembly bridge operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors that can occur in WebAssembly bridge implementations
#[derive(Error, Debug)]
pub enum WasmError {
    /// JavaScript exception surfaced through web-sys or a host binding
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// A browser API the bridge depends on is missing
    #[error("Browser API not available: {0}")]
    NotAvailable(String),

    /// Failed to convert a Rust value into a JS value
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_wasm_bindgen::Error),

    /// The browser refused to start playback (autoplay policy, decode error)
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),
}

impl From<WasmError> for BridgeError {
    fn from(err: WasmError) -> Self {
        match err {
            WasmError::NotAvailable(what) => BridgeError::NotAvailable(what),
            WasmError::PlaybackRejected(reason) => BridgeError::Rejected(reason),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

impl From<JsValue> for WasmError {
    fn from(js_value: JsValue) -> Self {
        WasmError::JavaScript(describe(&js_value))
    }
}

/// Best-effort human-readable text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        text
    } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        error.message().into()
    } else {
        format!("{value:?}")
    }
}

/// Wrap a JS exception as a [`BridgeError`] tagged with the failing operation.
pub(crate) fn js_error(context: &str, err: JsValue) -> BridgeError {
    BridgeError::OperationFailed(format!("wasm {context}: {}", describe(&err)))
}
