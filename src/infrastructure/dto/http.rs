//! REST API response bodies.

use serde::Serialize;

use crate::domain::Track;

/// One row in the room listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room_id: String,
    pub host_id: String,
    pub participant_count: usize,
    pub is_playing: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomListResponse {
    pub rooms: Vec<RoomSummaryDto>,
}

/// Detailed room view, with playback position projected to "now"
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub room_id: String,
    pub host_id: String,
    pub participants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
    pub is_playing: bool,
    pub position: f64,
    /// JST, RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvitationDto {
    pub invitation_id: String,
    pub room_id: String,
    pub sender_id: String,
    pub track_title: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvitationsResponse {
    pub invitations: Vec<PendingInvitationDto>,
}
