//! Connection registry port: routes point-to-point notifications and
//! room broadcasts to live client connections.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::ids::UserId;

/// Channel handle for pushing serialized events to one client
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    /// Registry lookup miss: the receiver has no live connection
    #[error("user '{0}' is not connected")]
    ReceiverUnreachable(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Message pusher port
///
/// メッセージ送信（通知）の抽象化。WebSocket の生成は UI 層で行われ、
/// この trait は生成済みの sender へ送信する責務だけを持つ。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a freshly connected client. Check-and-insert happens
    /// under one lock; returns `false` when the user id is already
    /// registered, leaving the existing channel untouched.
    async fn register(&self, user_id: UserId, sender: PusherChannel) -> bool;

    /// Drop a client on disconnect
    async fn unregister(&self, user_id: &UserId);

    /// Whether the user currently has a live connection
    async fn is_connected(&self, user_id: &UserId) -> bool;

    /// Point-to-point delivery; fails when the receiver is unreachable
    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), MessagePushError>;

    /// Best-effort fan-out. Individual send failures are tolerated; the
    /// host heartbeat re-asserts state for anyone who missed a message.
    async fn broadcast(&self, targets: Vec<UserId>, content: &str);
}
