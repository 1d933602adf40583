//! Identifier value objects.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

/// Identifier of a participant (the application user, not the socket)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyUserId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a playback room
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    /// Derive the room id for a pair of participants.
    ///
    /// The two user ids are sorted lexicographically before concatenation,
    /// so either participant computes the identical id without coordination.
    pub fn for_pair(a: &UserId, b: &UserId) -> Self {
        let (min, max) = if a.as_str() <= b.as_str() {
            (a, b)
        } else {
            (b, a)
        };
        Self(format!("music_{}_{}", min.as_str(), max.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a "listen together" invitation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationId(Uuid);

impl InvitationId {
    /// Generate a fresh random invitation id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::InvalidInvitationId(value.to_string()))
    }
}

impl std::fmt::Display for InvitationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Seconds elapsed from `self` until `now`, clamped at zero.
    ///
    /// Clamping guards against snapshots anchored slightly in the future
    /// (clock skew between host and guest).
    pub fn elapsed_secs_until(&self, now: Timestamp) -> f64 {
        (now.0 - self.0).max(0) as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rejects_empty_value() {
        // テスト項目: 空の user id はバリデーションエラーになる
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = UserId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::EmptyUserId));
    }

    #[test]
    fn test_room_id_for_pair_is_symmetric() {
        // テスト項目: roomIdFor(a, b) == roomIdFor(b, a) が成り立つ
        // given (前提条件):
        let alice = UserId::new("alice".to_string()).unwrap();
        let bob = UserId::new("bob".to_string()).unwrap();

        // when (操作):
        let ab = RoomId::for_pair(&alice, &bob);
        let ba = RoomId::for_pair(&bob, &alice);

        // then (期待する結果):
        assert_eq!(ab, ba);
        assert_eq!(ab.as_str(), "music_alice_bob");
    }

    #[test]
    fn test_invitation_id_round_trips_through_string() {
        // テスト項目: InvitationId が文字列を経由して復元できる
        // given (前提条件):
        let id = InvitationId::generate();

        // when (操作):
        let parsed = InvitationId::parse(&id.to_string());

        // then (期待する結果):
        assert_eq!(parsed, Ok(id));
    }

    #[test]
    fn test_elapsed_secs_clamps_future_anchor() {
        // テスト項目: アンカーが未来の場合、経過秒数は 0 に丸められる
        // given (前提条件):
        let anchor = Timestamp::new(10_000);
        let now = Timestamp::new(8_000);

        // when (操作):
        let elapsed = anchor.elapsed_secs_until(now);

        // then (期待する結果):
        assert_eq!(elapsed, 0.0);
    }

    #[test]
    fn test_elapsed_secs_converts_millis_to_seconds() {
        // テスト項目: ミリ秒の差分が秒に変換される
        // given (前提条件):
        let anchor = Timestamp::new(10_000);
        let now = Timestamp::new(12_500);

        // when (操作):
        let elapsed = anchor.elapsed_secs_until(now);

        // then (期待する結果):
        assert_eq!(elapsed, 2.5);
    }
}
