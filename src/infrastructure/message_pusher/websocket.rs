//! WebSocket を使った MessagePusher 実装
//!
//! WebSocket の生成（接続の受付）は UI 層で行われ、この実装は生成済みの
//! `UnboundedSender` を管理してメッセージ送信に使用する。ロックの保持は
//! チャンネルへの書き込みだけで、ネットワーク I/O は pusher ループ側で
//! 行われる。

use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, UserId};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のユーザーと対応する sender のマップ
    clients: Mutex<HashMap<UserId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register(&self, user_id: UserId, sender: PusherChannel) -> bool {
        let mut clients = self.clients.lock().await;
        match clients.entry(user_id.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!("User '{}' is already registered", user_id);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(sender);
                tracing::debug!("User '{}' registered to MessagePusher", user_id);
                true
            }
        }
    }

    async fn unregister(&self, user_id: &UserId) {
        let mut clients = self.clients.lock().await;
        clients.remove(user_id);
        tracing::debug!("User '{}' unregistered from MessagePusher", user_id);
    }

    async fn is_connected(&self, user_id: &UserId) -> bool {
        let clients = self.clients.lock().await;
        clients.contains_key(user_id)
    }

    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(user_id)
            .ok_or_else(|| MessagePushError::ReceiverUnreachable(user_id.as_str().to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to user '{}'", user_id);
        Ok(())
    }

    async fn broadcast(&self, targets: Vec<UserId>, content: &str) {
        let clients = self.clients.lock().await;
        for target in targets {
            match clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容する
                Some(sender) => {
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push message to user '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!("User '{}' not found during broadcast, skipping", target);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_unregistered_user_fails() {
        // テスト項目: 未登録ユーザーへの push_to は ReceiverUnreachable になる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(&user("ghost"), "{}").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ReceiverUnreachable("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn test_broadcast_skips_missing_targets() {
        // テスト項目: broadcast は未接続ターゲットをスキップして継続する
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register(user("alice"), tx).await;

        // when (操作):
        pusher
            .broadcast(vec![user("ghost"), user("alice")], "hello")
            .await;

        // then (期待する結果): alice には届いている
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first_channel() {
        // テスト項目: 同一ユーザー ID の二重登録は拒否され、既存の
        //             チャンネルが維持される
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        assert!(pusher.register(user("alice"), tx1).await);

        // when (操作):
        let second = pusher.register(user("alice"), tx2).await;
        pusher.push_to(&user("alice"), "hello").await.unwrap();

        // then (期待する結果): 二重登録は失敗し、最初の接続に届く
        assert!(!second);
        assert_eq!(rx1.recv().await, Some("hello".to_string()));
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_disconnects_user() {
        // テスト項目: unregister 後は is_connected が false になる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register(user("alice"), tx).await;
        assert!(pusher.is_connected(&user("alice")).await);

        // when (操作):
        pusher.unregister(&user("alice")).await;

        // then (期待する結果):
        assert!(!pusher.is_connected(&user("alice")).await);
    }
}
