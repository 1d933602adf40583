//! UseCase: 退室・切断処理
//!
//! 明示的な leaveRoom と WebSocket 切断の両方から呼ばれる。
//! ホストが離脱した場合は残りの最小 id の参加者へ権限を移譲する。

use std::sync::Arc;

use crate::domain::{Departure, MessagePusher, Room, RoomId, RoomStore, UserId};

use super::error::SessionError;

/// Result of a membership change
#[derive(Debug, Clone)]
pub enum LeaveOutcome {
    /// The user was not in the room; nothing happened
    NotAMember,
    /// The last participant left and the room was destroyed
    RoomRemoved { room_id: RoomId },
    /// Participants remain. `new_host` is set when authority migrated.
    Left {
        room: Room,
        new_host: Option<UserId>,
    },
}

/// 退室のユースケース
pub struct LeaveRoomUseCase {
    rooms: Arc<dyn RoomStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(rooms: Arc<dyn RoomStore>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms,
            message_pusher,
        }
    }

    pub async fn execute(
        &self,
        room_id: RoomId,
        user_id: UserId,
    ) -> Result<LeaveOutcome, SessionError> {
        let (departure, room) = self.rooms.remove_participant(&room_id, &user_id).await?;

        let outcome = match departure {
            Departure::NotAMember => LeaveOutcome::NotAMember,
            Departure::Empty => {
                tracing::info!("Room {} destroyed (last participant '{}' left)", room_id, user_id);
                LeaveOutcome::RoomRemoved { room_id }
            }
            Departure::Remaining { new_host } => {
                if let Some(host) = &new_host {
                    tracing::info!(
                        "Host '{}' left room {}; authority migrated to '{}'",
                        user_id,
                        room_id,
                        host
                    );
                }
                let room = room.expect("remaining departure always carries a snapshot");
                LeaveOutcome::Left { room, new_host }
            }
        };
        Ok(outcome)
    }

    /// Membership change triggered by a dropped connection: the user
    /// leaves every room they participate in.
    pub async fn execute_disconnect(
        &self,
        user_id: UserId,
    ) -> Vec<(RoomId, Result<LeaveOutcome, SessionError>)> {
        let room_ids = self.rooms.rooms_for_user(&user_id).await;
        let mut outcomes = Vec::with_capacity(room_ids.len());
        for room_id in room_ids {
            let outcome = self.execute(room_id.clone(), user_id.clone()).await;
            outcomes.push((room_id, outcome));
        }
        outcomes
    }

    /// Broadcast the post-departure snapshot to the remaining participants
    pub async fn broadcast_room_state(&self, room: &Room, json: &str) {
        let targets: Vec<UserId> = room.participants.iter().cloned().collect();
        self.message_pusher.broadcast(targets, json).await;
    }
}
