//! UseCase: 再生制御処理
//!
//! ホストのみが Room の再生状態を変更できる（single-writer）。
//! 非ホストからの制御イベントは NotAuthorized として呼び出し元に返す。

use std::sync::Arc;

use crate::{
    common::time::Clock,
    domain::{ControlAction, MessagePusher, Room, RoomId, RoomStore, Timestamp, UserId},
};

use super::error::SessionError;

/// Result of an authorized control event
#[derive(Debug, Clone)]
pub enum ControlOutcome {
    /// State mutated; broadcast the snapshot to the other participants
    Updated { room: Room },
    /// `stop`: the session is over and the room was removed from the
    /// store. A terminal `sessionEnded` goes to every listed participant.
    Ended {
        room_id: RoomId,
        participants: Vec<UserId>,
    },
}

/// 再生制御のユースケース
pub struct ControlPlaybackUseCase {
    rooms: Arc<dyn RoomStore>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ControlPlaybackUseCase {
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            message_pusher,
            clock,
        }
    }

    pub async fn execute(
        &self,
        room_id: RoomId,
        requester: UserId,
        action: ControlAction,
    ) -> Result<ControlOutcome, SessionError> {
        let now = Timestamp::new(self.clock.now_millis());

        if matches!(action, ControlAction::Stop) {
            let room = self.rooms.end_session(&room_id, &requester).await?;
            tracing::info!("Session ended for room {} by host '{}'", room_id, requester);
            return Ok(ControlOutcome::Ended {
                room_id,
                participants: room.participants.into_iter().collect(),
            });
        }

        let room = self
            .rooms
            .apply_control(&room_id, &requester, &action, now)
            .await?;

        tracing::debug!(
            "Control applied in room {}: playing={} anchor={:.1}s",
            room.id,
            room.is_playing,
            room.anchor_position
        );

        Ok(ControlOutcome::Updated { room })
    }

    /// Broadcast the snapshot to everyone but the originator, who already
    /// holds the authoritative local state.
    pub async fn broadcast_to_guests(&self, room: &Room, originator: &UserId, json: &str) {
        let targets: Vec<UserId> = room
            .participants
            .iter()
            .filter(|id| *id != originator)
            .cloned()
            .collect();
        self.message_pusher.broadcast(targets, json).await;
    }

    /// Terminal notification, distinct from a normal state update
    pub async fn broadcast_session_ended(&self, participants: Vec<UserId>, json: &str) {
        self.message_pusher.broadcast(participants, json).await;
    }
}
