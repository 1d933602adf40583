//! "Listen together" invitation entity.

use serde::Serialize;

use super::{
    ids::{InvitationId, RoomId, Timestamp, UserId},
    track::Track,
};

/// How long an invitation stays answerable after it is sent.
///
/// The offline-delivery path keeps invitations stored even when the
/// receiver has no live connection, so a TTL bounds how stale an offer can
/// get before acceptance is refused.
pub const INVITATION_TTL_SECS: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InvitationState {
    Pending,
    Accepted,
    Declined,
    Expired,
}

/// An offer from `sender_id` to `receiver_id` to join a room and listen
/// to `track` together. Terminal states are never mutated further; the
/// broker removes the entry once it resolves.
#[derive(Debug, Clone, Serialize)]
pub struct Invitation {
    pub id: InvitationId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub track: Track,
    pub created_at: Timestamp,
    pub state: InvitationState,
}

impl Invitation {
    pub fn new(
        room_id: RoomId,
        sender_id: UserId,
        receiver_id: UserId,
        track: Track,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: InvitationId::generate(),
            room_id,
            sender_id,
            receiver_id,
            track,
            created_at,
            state: InvitationState::Pending,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.value() - self.created_at.value() > INVITATION_TTL_SECS * 1000
    }

    pub fn accept(&mut self) {
        self.state = InvitationState::Accepted;
    }

    pub fn decline(&mut self) {
        self.state = InvitationState::Declined;
    }

    pub fn expire(&mut self) {
        self.state = InvitationState::Expired;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{RoomId, UserId};

    fn test_invitation(created_at: i64) -> Invitation {
        Invitation::new(
            RoomId::new("music_alice_bob".to_string()).unwrap(),
            UserId::new("alice".to_string()).unwrap(),
            UserId::new("bob".to_string()).unwrap(),
            Track {
                id: "t1".to_string(),
                title: "Night Drive".to_string(),
                artist: "Neon City".to_string(),
                media_url: "https://cdn.example.com/t1.mp3".to_string(),
                artwork_url: None,
                duration_seconds: 214.0,
            },
            Timestamp::new(created_at),
        )
    }

    #[test]
    fn test_new_invitation_is_pending() {
        // テスト項目: 新規 Invitation は Pending 状態で作成される
        // given (前提条件):
        // when (操作):
        let invitation = test_invitation(1_000);

        // then (期待する結果):
        assert_eq!(invitation.state, InvitationState::Pending);
    }

    #[test]
    fn test_invitation_expires_after_ttl() {
        // テスト項目: TTL を超えた Invitation は期限切れと判定される
        // given (前提条件):
        let invitation = test_invitation(1_000);

        // when (操作):
        let just_inside = invitation.is_expired(Timestamp::new(1_000 + INVITATION_TTL_SECS * 1000));
        let just_outside =
            invitation.is_expired(Timestamp::new(1_001 + INVITATION_TTL_SECS * 1000));

        // then (期待する結果):
        assert!(!just_inside);
        assert!(just_outside);
    }
}
