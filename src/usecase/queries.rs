//! Read-only use cases backing the HTTP observation API.

use std::sync::Arc;

use crate::{
    common::time::Clock,
    domain::{Invitation, InvitationStore, Room, RoomId, RoomStore, Timestamp, UserId},
};

use super::error::SessionError;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    rooms: Arc<dyn RoomStore>,
}

impl GetRoomsUseCase {
    pub fn new(rooms: Arc<dyn RoomStore>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self) -> Vec<Room> {
        self.rooms.list().await
    }
}

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    rooms: Arc<dyn RoomStore>,
}

impl GetRoomDetailUseCase {
    pub fn new(rooms: Arc<dyn RoomStore>) -> Self {
        Self { rooms }
    }

    pub async fn execute(&self, room_id: &RoomId) -> Result<Room, SessionError> {
        Ok(self.rooms.get(room_id).await?)
    }
}

/// 保留中の招待一覧取得のユースケース（オフライン受信者の発見用）
pub struct GetPendingInvitationsUseCase {
    invitations: Arc<dyn InvitationStore>,
    clock: Arc<dyn Clock>,
}

impl GetPendingInvitationsUseCase {
    pub fn new(invitations: Arc<dyn InvitationStore>, clock: Arc<dyn Clock>) -> Self {
        Self { invitations, clock }
    }

    pub async fn execute(&self, receiver_id: &UserId) -> Vec<Invitation> {
        let now = Timestamp::new(self.clock.now_millis());
        self.invitations.pending_for(receiver_id, now).await
    }
}
