//! Media transport abstraction.
//!
//! The synchronizer never talks to a concrete player; it drives this trait.
//! The bundled implementation simulates playback against the wall clock,
//! which is all a terminal client needs to demonstrate the protocol.

use std::sync::Arc;

use crate::{common::time::Clock, domain::Track};

use super::error::ClientError;

/// Local playback surface the synchronizer controls
pub trait MediaTransport: Send {
    /// Load a track, resetting position to zero, paused
    fn load(&mut self, track: &Track) -> Result<(), ClientError>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Jump to `position` seconds, keeping the play/pause state
    fn seek(&mut self, position: f64);

    /// Current playback position in seconds
    fn position(&self) -> f64;

    fn loaded_track_id(&self) -> Option<&str>;

    fn is_playing(&self) -> bool;
}

/// Clock-driven playback simulation.
///
/// Position advances with wall-clock time while playing and freezes while
/// paused; there is no actual audio output.
pub struct SimulatedTransport {
    clock: Arc<dyn Clock>,
    track_id: Option<String>,
    playing: bool,
    anchor_position: f64,
    anchor_millis: i64,
}

impl SimulatedTransport {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let anchor_millis = clock.now_millis();
        Self {
            clock,
            track_id: None,
            playing: false,
            anchor_position: 0.0,
            anchor_millis,
        }
    }
}

impl MediaTransport for SimulatedTransport {
    fn load(&mut self, track: &Track) -> Result<(), ClientError> {
        if track.media_url.trim().is_empty() {
            return Err(ClientError::TrackUnavailable(track.title.clone()));
        }
        self.track_id = Some(track.id.clone());
        self.playing = false;
        self.anchor_position = 0.0;
        self.anchor_millis = self.clock.now_millis();
        Ok(())
    }

    fn play(&mut self) {
        if !self.playing {
            self.anchor_millis = self.clock.now_millis();
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if self.playing {
            self.anchor_position = self.position();
            self.playing = false;
        }
    }

    fn seek(&mut self, position: f64) {
        self.anchor_position = position.max(0.0);
        self.anchor_millis = self.clock.now_millis();
    }

    fn position(&self) -> f64 {
        if self.playing {
            let elapsed = (self.clock.now_millis() - self.anchor_millis).max(0) as f64 / 1000.0;
            self.anchor_position + elapsed
        } else {
            self.anchor_position
        }
    }

    fn loaded_track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
