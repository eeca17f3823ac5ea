//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the MusicZone playback core:
//! - Logging and tracing initialisation
//! - Configuration and dependency injection
//! - Event bus for observers of playback state
//!
//! ## Overview
//!
//! Every other core crate takes a [`config::CoreConfig`] and publishes through
//! an [`events::EventBus`]. Neither depends on a concrete host; storage and
//! time arrive as `bridge-traits` trait objects.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
