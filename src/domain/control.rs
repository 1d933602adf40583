//! Host control actions.

use super::track::Track;

/// A playback control event authored by the room host.
///
/// Each action carries exactly the data it needs; there is no stringly
/// typed `action` field with optional companions.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    /// Start or resume playback at `position` (seconds)
    Play { position: f64 },
    /// Freeze playback at `position` (seconds)
    Pause { position: f64 },
    /// Re-anchor to `position` without changing the play state
    Seek { position: f64 },
    /// Replace the loaded track; position resets to zero
    ChangeTrack { track: Track, playing: bool },
    /// Tear the session down
    Stop,
}
