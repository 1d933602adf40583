//! Storage ports required by the session coordinator.
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! Every mutating method performs its read-modify-write atomically, so one
//! inbound event is handled to completion before the next touches the same
//! room — the single-writer property of the protocol.

use async_trait::async_trait;

use super::{
    control::ControlAction,
    error::StoreError,
    ids::{InvitationId, RoomId, Timestamp, UserId},
    invitation::Invitation,
    room::{Departure, Room},
};

/// Room Store port
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Get the room, or create it with `user_id` as host, and ensure
    /// `user_id` is a participant. Idempotent beyond adding the caller.
    async fn join(
        &self,
        room_id: RoomId,
        user_id: UserId,
        now: Timestamp,
    ) -> Result<Room, StoreError>;

    /// Snapshot of an existing room
    async fn get(&self, room_id: &RoomId) -> Result<Room, StoreError>;

    /// Apply a host control action and return the updated snapshot
    async fn apply_control(
        &self,
        room_id: &RoomId,
        requester: &UserId,
        action: &ControlAction,
        now: Timestamp,
    ) -> Result<Room, StoreError>;

    /// Host-only session teardown: validates authority, removes the room
    /// and returns its final snapshot for the terminal broadcast.
    async fn end_session(
        &self,
        room_id: &RoomId,
        requester: &UserId,
    ) -> Result<Room, StoreError>;

    /// Remove a participant. Destroys the room when it becomes empty;
    /// returns the post-departure snapshot otherwise.
    async fn remove_participant(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(Departure, Option<Room>), StoreError>;

    /// Ids of all rooms the user currently participates in
    async fn rooms_for_user(&self, user_id: &UserId) -> Vec<RoomId>;

    /// Snapshot of all active rooms, sorted by room id
    async fn list(&self) -> Vec<Room>;
}

/// Invitation Broker port
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Store a pending invitation
    async fn put(&self, invitation: Invitation);

    /// Remove and return an invitation. Responses are terminal, so the
    /// entry never goes back.
    async fn take(&self, id: &InvitationId) -> Option<Invitation>;

    /// Pending invitations addressed to `receiver_id` (offline discovery).
    /// Entries past their TTL at `now` are dropped, not returned.
    async fn pending_for(&self, receiver_id: &UserId, now: Timestamp) -> Vec<Invitation>;
}
