//! ドメインモデルとワイヤ DTO の相互変換

use crate::common::time::millis_to_jst_rfc3339;
use crate::domain::{ControlAction, Invitation, Room, Timestamp};

use super::http::{PendingInvitationDto, RoomDetailDto, RoomSummaryDto};
use super::websocket::{ControlActionDto, InvitationDto, RoomSnapshotDto};

impl From<ControlActionDto> for ControlAction {
    fn from(dto: ControlActionDto) -> Self {
        match dto {
            ControlActionDto::Play { current_time } => ControlAction::Play {
                position: current_time,
            },
            ControlActionDto::Pause { current_time } => ControlAction::Pause {
                position: current_time,
            },
            ControlActionDto::Seek { current_time } => ControlAction::Seek {
                position: current_time,
            },
            ControlActionDto::ChangeTrack { track, is_playing } => ControlAction::ChangeTrack {
                track,
                playing: is_playing,
            },
            ControlActionDto::Stop => ControlAction::Stop,
        }
    }
}

impl From<&Room> for RoomSnapshotDto {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id.as_str().to_string(),
            host_id: room.host_id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            track: room.current_track.clone(),
            is_playing: room.is_playing,
            anchor_position: room.anchor_position,
            anchor_timestamp: room.anchor_timestamp.value(),
        }
    }
}

impl From<&Invitation> for InvitationDto {
    fn from(invitation: &Invitation) -> Self {
        Self {
            invitation_id: invitation.id.to_string(),
            room_id: invitation.room_id.as_str().to_string(),
            sender_id: invitation.sender_id.as_str().to_string(),
            receiver_id: invitation.receiver_id.as_str().to_string(),
            track: invitation.track.clone(),
            created_at: invitation.created_at.value(),
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id.as_str().to_string(),
            host_id: room.host_id.as_str().to_string(),
            participant_count: room.participants.len(),
            is_playing: room.is_playing,
        }
    }
}

impl RoomDetailDto {
    /// Project room state to a concrete position as of `now`
    pub fn from_room(room: &Room, now: Timestamp) -> Self {
        Self {
            room_id: room.id.as_str().to_string(),
            host_id: room.host_id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            track: room.current_track.clone(),
            is_playing: room.is_playing,
            position: room.position_at(now),
            created_at: millis_to_jst_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Invitation> for PendingInvitationDto {
    fn from(invitation: &Invitation) -> Self {
        Self {
            invitation_id: invitation.id.to_string(),
            room_id: invitation.room_id.as_str().to_string(),
            sender_id: invitation.sender_id.as_str().to_string(),
            track_title: invitation.track.title.clone(),
            created_at: millis_to_jst_rfc3339(invitation.created_at.value()),
        }
    }
}
