//! InMemory Room Store 実装
//!
//! HashMap をインメモリ DB として使用する。永続化はしない（再起動で
//! アクティブなセッションは失われる — このスコープでは許容される制約）。
//!
//! 一つの Mutex が全 Room を覆うため、各メソッドの read-modify-write は
//! アトミックに完了する。ロック保持中に I/O は行わない。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ControlAction, Departure, Room, RoomError, RoomId, RoomStore, StoreError, Timestamp, UserId,
};

/// インメモリ Room Store 実装
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn join(
        &self,
        room_id: RoomId,
        user_id: UserId,
        now: Timestamp,
    ) -> Result<Room, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id, user_id.clone(), now));
        room.add_participant(user_id)?;
        Ok(room.clone())
    }

    async fn get(&self, room_id: &RoomId) -> Result<Room, StoreError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| StoreError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn apply_control(
        &self,
        room_id: &RoomId,
        requester: &UserId,
        action: &ControlAction,
        now: Timestamp,
    ) -> Result<Room, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.as_str().to_string()))?;
        room.apply_control(requester, action, now)?;
        Ok(room.clone())
    }

    async fn end_session(&self, room_id: &RoomId, requester: &UserId) -> Result<Room, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.as_str().to_string()))?;
        if !room.is_host(requester) {
            return Err(StoreError::Room(RoomError::NotAuthorized {
                user_id: requester.as_str().to_string(),
                room_id: room_id.as_str().to_string(),
            }));
        }
        let mut room = rooms
            .remove(room_id)
            .expect("room existence checked above");
        // Final snapshot mirrors a stop action: no track, frozen
        room.current_track = None;
        room.is_playing = false;
        Ok(room)
    }

    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(Departure, Option<Room>), StoreError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.as_str().to_string()))?;
        let departure = room.remove_participant(user_id);
        match departure {
            Departure::Empty => {
                rooms.remove(room_id);
                Ok((Departure::Empty, None))
            }
            departure => {
                let snapshot = room.clone();
                Ok((departure, Some(snapshot)))
            }
        }
    }

    async fn rooms_for_user(&self, user_id: &UserId) -> Vec<RoomId> {
        let rooms = self.rooms.lock().await;
        let mut ids: Vec<RoomId> = rooms
            .values()
            .filter(|room| room.participants.contains(user_id))
            .map(|room| room.id.clone())
            .collect();
        ids.sort();
        ids
    }

    async fn list(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_creates_room_once() {
        // テスト項目: join が同じ Room を二重に作成しない
        // given (前提条件):
        let store = InMemoryRoomStore::new();

        // when (操作):
        store
            .join(room_id("music_a_b"), user("alice"), Timestamp::new(1_000))
            .await
            .unwrap();
        store
            .join(room_id("music_a_b"), user("bob"), Timestamp::new(2_000))
            .await
            .unwrap();

        // then (期待する結果):
        let list = store.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].participants.len(), 2);
        assert!(list[0].is_host(&user("alice")));
    }

    #[tokio::test]
    async fn test_remove_last_participant_destroys_room() {
        // テスト項目: 最後の参加者を削除すると Room がストアから消える
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        store
            .join(room_id("music_a_b"), user("alice"), Timestamp::new(1_000))
            .await
            .unwrap();

        // when (操作):
        let (departure, snapshot) = store
            .remove_participant(&room_id("music_a_b"), &user("alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(departure, Departure::Empty);
        assert!(snapshot.is_none());
        assert!(store.get(&room_id("music_a_b")).await.is_err());
    }

    #[tokio::test]
    async fn test_end_session_requires_host() {
        // テスト項目: end_session はホスト以外から呼ばれると失敗する
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        store
            .join(room_id("music_a_b"), user("alice"), Timestamp::new(1_000))
            .await
            .unwrap();
        store
            .join(room_id("music_a_b"), user("bob"), Timestamp::new(1_000))
            .await
            .unwrap();

        // when (操作):
        let result = store.end_session(&room_id("music_a_b"), &user("bob")).await;

        // then (期待する結果): Room は残る
        assert!(matches!(
            result,
            Err(StoreError::Room(RoomError::NotAuthorized { .. }))
        ));
        assert!(store.get(&room_id("music_a_b")).await.is_ok());
    }

    #[tokio::test]
    async fn test_rooms_for_user_filters_membership() {
        // テスト項目: rooms_for_user が参加中の Room のみ返す
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        store
            .join(room_id("music_a_b"), user("alice"), Timestamp::new(1_000))
            .await
            .unwrap();
        store
            .join(room_id("music_a_c"), user("alice"), Timestamp::new(1_000))
            .await
            .unwrap();
        store
            .join(room_id("music_b_c"), user("bob"), Timestamp::new(1_000))
            .await
            .unwrap();

        // when (操作):
        let ids = store.rooms_for_user(&user("alice")).await;

        // then (期待する結果):
        assert_eq!(ids, vec![room_id("music_a_b"), room_id("music_a_c")]);
    }
}
