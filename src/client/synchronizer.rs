//! Guest-side playback synchronization.
//!
//! Server snapshots are authoritative. Applying one reconciles the local
//! transport in order: load the track if it changed, correct drift against
//! the anchor-projected position, then match the play/pause state.
//! The local host never seeks itself; it is the timing authority the
//! snapshot was derived from.

use std::sync::Arc;

use crate::{
    common::time::Clock,
    domain::Track,
    infrastructure::dto::websocket::{ControlActionDto, RoomSnapshotDto},
};

use super::{error::ClientError, transport::MediaTransport};

/// Guests snap to the host position once they lag or lead by this much.
/// Below the threshold, playback is left alone to avoid audible stutter.
pub const DRIFT_THRESHOLD_SECS: f64 = 2.0;

/// How often the host re-asserts its position to the room
pub const HEARTBEAT_INTERVAL_SECS: u64 = 15;

/// The session this client currently participates in
#[derive(Debug, Clone)]
pub struct SessionView {
    pub room_id: String,
    pub host_id: String,
}

/// Reconciles the local media transport with authoritative room snapshots
pub struct PlaybackSynchronizer {
    user_id: String,
    transport: Box<dyn MediaTransport>,
    clock: Arc<dyn Clock>,
    session: Option<SessionView>,
    /// Most recent unanswered invitation, for `/accept` without an id
    pending_invitation: Option<String>,
}

/// A playback mutation to send to the server, paired with its room
pub type OutboundControl = (String, ControlActionDto);

impl PlaybackSynchronizer {
    pub fn new(user_id: String, transport: Box<dyn MediaTransport>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_id,
            transport,
            clock,
            session: None,
            pending_invitation: None,
        }
    }

    pub fn session(&self) -> Option<&SessionView> {
        self.session.as_ref()
    }

    pub fn is_host(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.host_id == self.user_id)
    }

    pub fn position(&self) -> f64 {
        self.transport.position()
    }

    pub fn set_host(&mut self, room_id: &str, host_id: &str) {
        if let Some(session) = &mut self.session {
            if session.room_id == room_id {
                session.host_id = host_id.to_string();
            }
        }
    }

    pub fn remember_invitation(&mut self, invitation_id: String) {
        self.pending_invitation = Some(invitation_id);
    }

    pub fn take_pending_invitation(&mut self) -> Option<String> {
        self.pending_invitation.take()
    }

    /// Apply an authoritative snapshot to the local transport
    pub fn apply_snapshot(&mut self, snapshot: &RoomSnapshotDto) -> Result<(), ClientError> {
        self.session = Some(SessionView {
            room_id: snapshot.room_id.clone(),
            host_id: snapshot.host_id.clone(),
        });
        let host = snapshot.host_id == self.user_id;

        let now = self.clock.now_millis();
        let expected = expected_position(snapshot, now);

        if let Some(track) = &snapshot.track {
            if self.transport.loaded_track_id() != Some(track.id.as_str()) {
                self.transport.load(track)?;
                self.transport.seek(expected);
            }
        }

        // Drift correction applies to guests only; the host's transport is
        // the source the anchor came from.
        if !host {
            let drift = (self.transport.position() - expected).abs();
            if drift > DRIFT_THRESHOLD_SECS {
                tracing::debug!(
                    "Drift {:.2}s exceeds threshold, snapping to {:.2}s",
                    drift,
                    expected
                );
                self.transport.seek(expected);
            }
        }

        // Play/pause state is matched unconditionally
        if snapshot.is_playing && snapshot.track.is_some() {
            self.transport.play();
        } else {
            self.transport.pause();
        }
        Ok(())
    }

    /// Periodic host re-assertion of the current play state and position.
    ///
    /// Emitted while paused too, so a guest that missed a `pause`
    /// broadcast is corrected by the resulting snapshot. Returns `None`
    /// for guests, outside a session, or before a track is loaded.
    pub fn heartbeat(&mut self) -> Option<OutboundControl> {
        let session = self.session.as_ref()?;
        if session.host_id != self.user_id || self.transport.loaded_track_id().is_none() {
            return None;
        }
        let current_time = self.transport.position();
        let action = if self.transport.is_playing() {
            ControlActionDto::Play { current_time }
        } else {
            ControlActionDto::Pause { current_time }
        };
        Some((session.room_id.clone(), action))
    }

    /// Local play command; applies optimistically when this client is host
    pub fn control_play(&mut self) -> Option<OutboundControl> {
        let session = self.session.as_ref()?;
        let room_id = session.room_id.clone();
        if self.is_host() {
            self.transport.play();
        }
        Some((
            room_id,
            ControlActionDto::Play {
                current_time: self.transport.position(),
            },
        ))
    }

    pub fn control_pause(&mut self) -> Option<OutboundControl> {
        let session = self.session.as_ref()?;
        let room_id = session.room_id.clone();
        if self.is_host() {
            self.transport.pause();
        }
        Some((
            room_id,
            ControlActionDto::Pause {
                current_time: self.transport.position(),
            },
        ))
    }

    pub fn control_seek(&mut self, position: f64) -> Option<OutboundControl> {
        let session = self.session.as_ref()?;
        let room_id = session.room_id.clone();
        if self.is_host() {
            self.transport.seek(position);
        }
        Some((room_id, ControlActionDto::Seek { current_time: position }))
    }

    pub fn control_change_track(&mut self, track: Track) -> Option<OutboundControl> {
        let session = self.session.as_ref()?;
        let room_id = session.room_id.clone();
        if self.is_host() {
            if let Err(e) = self.transport.load(&track) {
                tracing::warn!("Local load failed: {}", e);
                return None;
            }
            self.transport.play();
        }
        Some((
            room_id,
            ControlActionDto::ChangeTrack {
                track,
                is_playing: true,
            },
        ))
    }

    /// Forget the session and stop local playback
    pub fn clear_session(&mut self) {
        self.session = None;
        self.transport.pause();
    }
}

fn expected_position(snapshot: &RoomSnapshotDto, now_millis: i64) -> f64 {
    if snapshot.is_playing {
        let elapsed = (now_millis - snapshot.anchor_timestamp).max(0) as f64 / 1000.0;
        snapshot.anchor_position + elapsed
    } else {
        snapshot.anchor_position
    }
}
