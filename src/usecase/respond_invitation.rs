//! UseCase: 招待応答処理
//!
//! 承諾なら受信者を Room に追加し、全参加者へキャッチアップ用の
//! スナップショットをブロードキャストする。ホストは変わらない。
//! 拒否なら送信者に通知する。期限切れの招待は応答者にエラーを返す。

use std::sync::Arc;

use crate::{
    common::time::Clock,
    domain::{
        Invitation, InvitationId, InvitationStore, MessagePusher, Room, RoomStore, Timestamp,
        UserId,
    },
};

use super::error::SessionError;

/// Result of responding to an invitation
#[derive(Debug, Clone)]
pub enum InvitationResponse {
    /// Receiver joined the room; broadcast a catch-up snapshot to everyone
    Accepted { invitation: Invitation, room: Room },
    /// Notify the sender that the offer was turned down
    Declined { invitation: Invitation },
}

/// 招待応答のユースケース
pub struct RespondInvitationUseCase {
    rooms: Arc<dyn RoomStore>,
    invitations: Arc<dyn InvitationStore>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RespondInvitationUseCase {
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

    pub async fn execute(
        &self,
        invitation_id: InvitationId,
        accept: bool,
    ) -> Result<InvitationResponse, SessionError> {
        let now = Timestamp::new(self.clock.now_millis());

        // Responses are terminal: the entry leaves the broker either way.
        let mut invitation = self
            .invitations
            .take(&invitation_id)
            .await
            .ok_or_else(|| SessionError::InvitationNotFound(invitation_id.to_string()))?;

        if invitation.is_expired(now) {
            invitation.expire();
            tracing::info!("Invitation {} expired before response", invitation.id);
            return Err(SessionError::InvitationExpired(invitation.id.to_string()));
        }

        if !accept {
            invitation.decline();
            tracing::info!(
                "Invitation {} declined by '{}'",
                invitation.id,
                invitation.receiver_id
            );
            return Ok(InvitationResponse::Declined { invitation });
        }

        // Joining an existing room never changes its host; the original
        // sender remains authoritative.
        let room = self
            .rooms
            .join(
                invitation.room_id.clone(),
                invitation.receiver_id.clone(),
                now,
            )
            .await?;
        invitation.accept();

        tracing::info!(
            "Invitation {} accepted: '{}' joined room {}",
            invitation.id,
            invitation.receiver_id,
            room.id
        );

        Ok(InvitationResponse::Accepted { invitation, room })
    }

    /// Catch-up broadcast to all participants, the new joiner included,
    /// so the joiner receives track/position/host immediately.
    pub async fn broadcast_room_state(&self, room: &Room, json: &str) {
        let targets: Vec<UserId> = room.participants.iter().cloned().collect();
        self.message_pusher.broadcast(targets, json).await;
    }

    /// Notify the sender of a declined offer
    pub async fn notify_sender(&self, sender_id: &UserId, json: &str) {
        if let Err(e) = self.message_pusher.push_to(sender_id, json).await {
            tracing::warn!("Failed to notify sender '{}': {}", sender_id, e);
        }
    }
}
