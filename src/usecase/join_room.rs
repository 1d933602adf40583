//! UseCase: ルーム作成・参加処理
//!
//! `createOrJoinRoom` イベントの処理。Room が存在しなければ作成し、
//! 呼び出し元をホストとして登録する。既存の Room なら参加者として追加する。

use std::sync::Arc;

use crate::{
    common::time::Clock,
    domain::{MessagePusher, Room, RoomId, RoomStore, Timestamp, UserId},
};

use super::error::SessionError;

/// ルーム作成・参加のユースケース
pub struct JoinRoomUseCase {
    rooms: Arc<dyn RoomStore>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
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

    /// Join (or create) the room and return the resulting snapshot.
    ///
    /// Idempotent: re-joining a room the user is already in changes
    /// nothing beyond returning the current snapshot.
    pub async fn execute(&self, room_id: RoomId, user_id: UserId) -> Result<Room, SessionError> {
        let now = Timestamp::new(self.clock.now_millis());
        let room = self.rooms.join(room_id, user_id, now).await?;
        Ok(room)
    }

    /// Broadcast the room snapshot to every participant except `except`
    /// (the joiner receives it point-to-point as the command response).
    pub async fn broadcast_room_state(&self, room: &Room, except: &UserId, json: &str) {
        let targets: Vec<UserId> = room
            .participants
            .iter()
            .filter(|id| *id != except)
            .cloned()
            .collect();
        self.message_pusher.broadcast(targets, json).await;
    }
}
