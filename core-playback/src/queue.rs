//! # Track Queue
//!
//! Optional collaborator supplying neighbouring tracks. The controller never
//! owns a playlist; when no queue is injected, next/previous restart the
//! current track and repeat-all loops it.

use crate::track::Track;

/// Source of the tracks around the current one.
pub trait TrackQueue: bridge_traits::platform::PlatformSendSync {
    /// Track the queue considers current, if any.
    fn current(&self) -> Option<Track>;

    /// Advance and return the next track, or `None` at the end.
    fn next(&self) -> Option<Track>;

    /// Step back and return the previous track, or `None` at the start.
    fn previous(&self) -> Option<Track>;
}
