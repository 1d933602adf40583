//! InMemory Invitation Broker 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Invitation, InvitationId, InvitationState, InvitationStore, Timestamp, UserId};

/// インメモリ Invitation Broker 実装
///
/// Pending の招待だけを保持する短命なテーブル。応答（または期限切れの
/// 検出）でエントリは取り除かれる。
pub struct InMemoryInvitationStore {
    invitations: Mutex<HashMap<InvitationId, Invitation>>,
}

impl InMemoryInvitationStore {
    pub fn new() -> Self {
        Self {
            invitations: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryInvitationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvitationStore for InMemoryInvitationStore {
    async fn put(&self, invitation: Invitation) {
        let mut invitations = self.invitations.lock().await;
        invitations.insert(invitation.id.clone(), invitation);
    }

    async fn take(&self, id: &InvitationId) -> Option<Invitation> {
        let mut invitations = self.invitations.lock().await;
        invitations.remove(id)
    }

    async fn pending_for(&self, receiver_id: &UserId, now: Timestamp) -> Vec<Invitation> {
        let mut invitations = self.invitations.lock().await;
        // Lazy sweep: unanswered entries past their TTL would otherwise
        // sit in the map forever.
        invitations.retain(|_, inv| !inv.is_expired(now));
        let mut pending: Vec<Invitation> = invitations
            .values()
            .filter(|inv| {
                &inv.receiver_id == receiver_id && inv.state == InvitationState::Pending
            })
            .cloned()
            .collect();
        pending.sort_by_key(|inv| inv.created_at);
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomId, Track, INVITATION_TTL_SECS};

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn invitation(receiver: &str, created_at: i64) -> Invitation {
        Invitation::new(
            RoomId::new("music_a_b".to_string()).unwrap(),
            user("alice"),
            user(receiver),
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

    #[tokio::test]
    async fn test_take_removes_entry() {
        // テスト項目: take は一度しかエントリを返さない
        // given (前提条件):
        let store = InMemoryInvitationStore::new();
        let inv = invitation("bob", 1_000);
        store.put(inv.clone()).await;

        // when (操作):
        let first = store.take(&inv.id).await;
        let second = store.take(&inv.id).await;

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_pending_for_filters_receiver_and_sorts_by_age() {
        // テスト項目: pending_for が受信者の Pending のみ古い順に返す
        // given (前提条件):
        let store = InMemoryInvitationStore::new();
        let newer = invitation("bob", 3_000);
        let older = invitation("bob", 1_000);
        let other = invitation("carol", 2_000);
        store.put(newer.clone()).await;
        store.put(older.clone()).await;
        store.put(other).await;

        // when (操作):
        let pending = store.pending_for(&user("bob"), Timestamp::new(4_000)).await;

        // then (期待する結果):
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, older.id);
        assert_eq!(pending[1].id, newer.id);
    }

    #[tokio::test]
    async fn test_pending_for_sweeps_expired_entries() {
        // テスト項目: TTL を過ぎたエントリは返されず、テーブルからも
        //             取り除かれる
        // given (前提条件): 期限切れ 1 件、有効 1 件
        let store = InMemoryInvitationStore::new();
        let stale = invitation("bob", 0);
        let fresh = invitation("bob", 100_000);
        store.put(stale.clone()).await;
        store.put(fresh.clone()).await;

        // when (操作): stale だけが TTL を超えた時点で照会する
        let now = Timestamp::new(INVITATION_TTL_SECS * 1000 + 1);
        let pending = store.pending_for(&user("bob"), now).await;

        // then (期待する結果): fresh のみ返り、stale は take もできない
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, fresh.id);
        assert!(store.take(&stale.id).await.is_none());
    }
}
