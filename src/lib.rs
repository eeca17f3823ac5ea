//! Workspace facade crate.
//!
//! Re-exports the individual workspace crates (`bridge-traits`,
//! `core-runtime`, `core-playback`) and maps feature flags onto the host
//! bridges. Host applications can depend on `musiczone-workspace` and enable
//! `desktop-shims` or `wasm` without wiring each crate individually.

pub use bridge_traits;
pub use core_playback;
pub use core_runtime;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use bridge_wasm;

/// The types most hosts need to drive playback.
pub mod prelude {
    pub use bridge_traits::{BackendKind, MediaBackend, MediaEvent, SettingsStore};
    pub use core_playback::{
        PlaybackController, PlaybackError, PlayerConfig, RepeatMode, SourceKind, Track, TrackId,
    };
    pub use core_runtime::config::CoreConfig;
    pub use core_runtime::events::{CoreEvent, PlaybackEvent};
    pub use core_runtime::logging::{init_logging, LoggingConfig};
}
