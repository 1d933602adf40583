//! UseCase: 招待送信処理
//!
//! 送信者をホストとしてペア Room を作成し、Pending の Invitation を
//! ブローカーに保存して、受信者がオンラインなら通知を配送する。

use std::sync::Arc;

use crate::{
    common::time::Clock,
    domain::{
        Invitation, InvitationStore, MessagePusher, Room, RoomId, RoomStore, Timestamp, Track,
        UserId,
    },
};

use super::error::SessionError;

/// Result of sending an invitation
#[derive(Debug, Clone)]
pub struct InvitationOutcome {
    pub invitation: Invitation,
    pub room: Room,
}

/// 招待送信のユースケース
pub struct SendInvitationUseCase {
    rooms: Arc<dyn RoomStore>,
    invitations: Arc<dyn InvitationStore>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendInvitationUseCase {
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        invitations: Arc<dyn InvitationStore>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            invitations,
            message_pusher,
            clock,
        }
    }

    /// Create the pair room (sender becomes host) and store the offer.
    ///
    /// The invitation is stored whether or not the receiver is reachable;
    /// an offline receiver can still discover it through
    /// `GET /api/invitations/{user_id}` until the TTL runs out.
    pub async fn execute(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        track: Track,
    ) -> Result<InvitationOutcome, SessionError> {
        let now = Timestamp::new(self.clock.now_millis());
        let room_id = RoomId::for_pair(&sender_id, &receiver_id);

        let room = self.rooms.join(room_id.clone(), sender_id.clone(), now).await?;

        let invitation = Invitation::new(room_id, sender_id, receiver_id, track, now);
        self.invitations.put(invitation.clone()).await;

        tracing::info!(
            "Invitation {} stored: {} -> {} (room {})",
            invitation.id,
            invitation.sender_id,
            invitation.receiver_id,
            invitation.room_id
        );

        Ok(InvitationOutcome { invitation, room })
    }

    /// Push the serialized invitation to the receiver.
    ///
    /// Returns `false` when the registry has no live connection for the
    /// receiver, which the server reports back to the sender as an
    /// explicit undeliverable signal.
    pub async fn deliver(&self, receiver_id: &UserId, json: &str) -> bool {
        match self.message_pusher.push_to(receiver_id, json).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Invitation undeliverable to '{}': {}", receiver_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::time::FixedClock,
        domain::{InvitationState, MessagePushError, MockMessagePusher},
        infrastructure::repository::{InMemoryInvitationStore, InMemoryRoomStore},
    };

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn test_track() -> Track {
        Track {
            id: "t1".to_string(),
            title: "Night Drive".to_string(),
            artist: "Neon City".to_string(),
            media_url: "https://cdn.example.com/t1.mp3".to_string(),
            artwork_url: None,
            duration_seconds: 214.0,
        }
    }

    fn create_usecase(
        pusher: MockMessagePusher,
    ) -> (
        SendInvitationUseCase,
        Arc<InMemoryRoomStore>,
        Arc<InMemoryInvitationStore>,
    ) {
        let rooms = Arc::new(InMemoryRoomStore::new());
        let invitations = Arc::new(InMemoryInvitationStore::new());
        let usecase = SendInvitationUseCase::new(
            rooms.clone(),
            invitations.clone(),
            Arc::new(pusher),
            Arc::new(FixedClock::new(1_000)),
        );
        (usecase, rooms, invitations)
    }

    #[tokio::test]
    async fn test_sender_becomes_host_of_pair_room() {
        // テスト項目: 招待送信時、送信者がペア Room のホストになる
        // given (前提条件):
        let (usecase, _rooms, _invitations) = create_usecase(MockMessagePusher::new());

        // when (操作):
        let outcome = usecase
            .execute(user("alice"), user("bob"), test_track())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.room.id.as_str(), "music_alice_bob");
        assert!(outcome.room.is_host(&user("alice")));
        assert_eq!(outcome.invitation.state, InvitationState::Pending);
        assert_eq!(outcome.invitation.receiver_id, user("bob"));
    }

    #[tokio::test]
    async fn test_invitation_is_stored_for_offline_receiver() {
        // テスト項目: 受信者がオフラインでも Invitation は保存される
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_to().returning(|id, _| {
            Err(MessagePushError::ReceiverUnreachable(id.as_str().to_string()))
        });
        let (usecase, _rooms, invitations) = create_usecase(pusher);

        // when (操作):
        let outcome = usecase
            .execute(user("alice"), user("bob"), test_track())
            .await
            .unwrap();
        let delivered = usecase.deliver(&user("bob"), "{}").await;

        // then (期待する結果): 配送は失敗するがブローカーには残る
        assert!(!delivered);
        let pending = invitations.pending_for(&user("bob"), Timestamp::new(1_000)).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, outcome.invitation.id);
    }

    #[tokio::test]
    async fn test_delivery_succeeds_for_online_receiver() {
        // テスト項目: 受信者がオンラインなら delivered=true が返される
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_to().returning(|_, _| Ok(()));
        let (usecase, _rooms, _invitations) = create_usecase(pusher);
        usecase
            .execute(user("alice"), user("bob"), test_track())
            .await
            .unwrap();

        // when (操作):
        let delivered = usecase.deliver(&user("bob"), "{}").await;

        // then (期待する結果):
        assert!(delivered);
    }
}
