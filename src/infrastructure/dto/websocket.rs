//! WebSocket wire events.
//!
//! Tagged JSON with camelCase keys, matching the shapes the original
//! mobile clients exchanged (`roomId`, `currentTime`, `isPlaying`, ...).

use serde::{Deserialize, Serialize};

use crate::domain::Track;

/// Events sent by a client to the session coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Join (or create) a room; a new room makes the caller host
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },

    /// Offer to listen to `track` together with `receiverId`
    #[serde(rename_all = "camelCase")]
    SendInvitation { receiver_id: String, track: Track },

    /// Accept or decline a previously received invitation
    #[serde(rename_all = "camelCase")]
    RespondInvitation { invitation_id: String, accept: bool },

    /// Host-only playback mutation
    #[serde(rename_all = "camelCase")]
    Control {
        room_id: String,
        #[serde(flatten)]
        action: ControlActionDto,
    },

    /// Leave the room, keeping the session alive for the rest
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: String },

    /// Host-only session teardown
    #[serde(rename_all = "camelCase")]
    EndSession { room_id: String },
}

/// Control action payload, tagged by `action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ControlActionDto {
    #[serde(rename_all = "camelCase")]
    Play { current_time: f64 },
    #[serde(rename_all = "camelCase")]
    Pause { current_time: f64 },
    #[serde(rename_all = "camelCase")]
    Seek { current_time: f64 },
    #[serde(rename_all = "camelCase")]
    ChangeTrack { track: Track, is_playing: bool },
    Stop,
}

/// Events pushed from the server to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Authoritative full room snapshot
    RoomStateUpdate(RoomSnapshotDto),

    /// An invitation addressed to this client
    InvitationReceived(InvitationDto),

    /// Delivery feedback to the invitation sender
    #[serde(rename_all = "camelCase")]
    InvitationDelivery {
        invitation_id: String,
        delivered: bool,
    },

    /// The receiver turned the offer down
    #[serde(rename_all = "camelCase")]
    InvitationDeclined {
        invitation_id: String,
        receiver_id: String,
    },

    /// Playback authority migrated to a new host
    #[serde(rename_all = "camelCase")]
    HostChanged { room_id: String, host_id: String },

    /// Terminal notification, distinct from a state update
    #[serde(rename_all = "camelCase")]
    SessionEnded { room_id: String },

    /// Explicit rejection of a client event
    #[serde(rename_all = "camelCase")]
    Error { code: String, message: String },
}

/// Full room snapshot as broadcast to participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshotDto {
    pub room_id: String,
    pub host_id: String,
    pub participants: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
    pub is_playing: bool,
    /// Elapsed seconds valid as of `anchorTimestamp`
    pub anchor_position: f64,
    /// Epoch millis when the anchor was recorded
    pub anchor_timestamp: i64,
}

/// Invitation as delivered to the receiver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationDto {
    pub invitation_id: String,
    pub room_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub track: Track,
    pub created_at: i64,
}
