//! Room entity: the shared playback context for a set of participants.
//!
//! All mutations preserve two invariants:
//! - `is_playing == true` implies `current_track.is_some()`
//! - only the current host may author playback state

use std::collections::BTreeSet;

use serde::Serialize;

use super::{
    control::ControlAction,
    error::RoomError,
    ids::{RoomId, Timestamp, UserId},
    track::Track,
};

/// Default participant capacity.
///
/// The invitation flow only ever produces pairs, but the room model is
/// extensible to small groups.
pub const DEFAULT_ROOM_CAPACITY: usize = 8;

/// Outcome of removing a participant from a room
#[derive(Debug, Clone, PartialEq)]
pub enum Departure {
    /// The user was not a member of this room
    NotAMember,
    /// The last participant left; the room must be destroyed
    Empty,
    /// Participants remain. `new_host` is set when the departing user was
    /// the host and authority migrated to another participant.
    Remaining { new_host: Option<UserId> },
}

/// An active playback session
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub id: RoomId,
    /// The participant currently authoritative for playback position
    pub host_id: UserId,
    /// Ordered so host migration picks the lowest-sorted id deterministically
    pub participants: BTreeSet<UserId>,
    pub current_track: Option<Track>,
    pub is_playing: bool,
    /// Elapsed-seconds value valid as of `anchor_timestamp`
    pub anchor_position: f64,
    /// Wall-clock time the anchor was recorded (epoch millis)
    pub anchor_timestamp: Timestamp,
    pub created_at: Timestamp,
    capacity: usize,
}

impl Room {
    /// Create a room with the creator as host and sole participant
    pub fn new(id: RoomId, host_id: UserId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, host_id, created_at, DEFAULT_ROOM_CAPACITY)
    }

    pub fn with_capacity(
        id: RoomId,
        host_id: UserId,
        created_at: Timestamp,
        capacity: usize,
    ) -> Self {
        let mut participants = BTreeSet::new();
        participants.insert(host_id.clone());
        Self {
            id,
            host_id,
            participants,
            current_track: None,
            is_playing: false,
            anchor_position: 0.0,
            anchor_timestamp: created_at,
            created_at,
            capacity,
        }
    }

    pub fn is_host(&self, user_id: &UserId) -> bool {
        &self.host_id == user_id
    }

    /// Add a participant. Idempotent for users already in the room.
    pub fn add_participant(&mut self, user_id: UserId) -> Result<(), RoomError> {
        if self.participants.contains(&user_id) {
            return Ok(());
        }
        if self.participants.len() >= self.capacity {
            return Err(RoomError::RoomFull(self.id.as_str().to_string()));
        }
        self.participants.insert(user_id);
        Ok(())
    }

    /// Remove a participant, migrating host authority if necessary.
    ///
    /// When the departing user is the host and participants remain, the
    /// lexicographically smallest remaining id becomes the new host so that
    /// every observer of the same membership change picks the same host.
    pub fn remove_participant(&mut self, user_id: &UserId) -> Departure {
        if !self.participants.remove(user_id) {
            return Departure::NotAMember;
        }
        if self.participants.is_empty() {
            return Departure::Empty;
        }
        let new_host = if &self.host_id == user_id {
            // BTreeSet iterates in sorted order
            let next = self
                .participants
                .iter()
                .next()
                .cloned()
                .expect("participants is non-empty");
            self.host_id = next.clone();
            Some(next)
        } else {
            None
        };
        Departure::Remaining { new_host }
    }

    /// Apply a host control action, re-anchoring playback state.
    ///
    /// Control events from non-host participants are rejected with
    /// `NotAuthorized` and leave the room untouched.
    pub fn apply_control(
        &mut self,
        requester: &UserId,
        action: &ControlAction,
        now: Timestamp,
    ) -> Result<(), RoomError> {
        if !self.is_host(requester) {
            return Err(RoomError::NotAuthorized {
                user_id: requester.as_str().to_string(),
                room_id: self.id.as_str().to_string(),
            });
        }

        match action {
            ControlAction::Play { position } => {
                if self.current_track.is_none() {
                    return Err(RoomError::NoTrackLoaded(self.id.as_str().to_string()));
                }
                self.is_playing = true;
                self.anchor_position = *position;
                self.anchor_timestamp = now;
            }
            ControlAction::Pause { position } => {
                self.is_playing = false;
                self.anchor_position = *position;
                self.anchor_timestamp = now;
            }
            ControlAction::Seek { position } => {
                self.anchor_position = *position;
                self.anchor_timestamp = now;
            }
            ControlAction::ChangeTrack { track, playing } => {
                self.current_track = Some(track.clone());
                self.anchor_position = 0.0;
                self.is_playing = *playing;
                self.anchor_timestamp = now;
            }
            ControlAction::Stop => {
                self.current_track = None;
                self.is_playing = false;
                self.anchor_position = 0.0;
                self.anchor_timestamp = now;
            }
        }
        Ok(())
    }

    /// True playback position at time `now`.
    ///
    /// While playing: `anchor_position + (now - anchor_timestamp)`.
    /// While paused the formula degenerates to the frozen anchor.
    pub fn position_at(&self, now: Timestamp) -> f64 {
        if self.is_playing {
            self.anchor_position + self.anchor_timestamp.elapsed_secs_until(now)
        } else {
            self.anchor_position
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_track() -> Track {
        Track {
            id: "t1".to_string(),
            title: "Night Drive".to_string(),
            artist: "Neon City".to_string(),
            media_url: "https://cdn.example.com/t1.mp3".to_string(),
            artwork_url: None,
            duration_seconds: 214.0,
        }
    }

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn new_room(host: &str) -> Room {
        Room::new(
            RoomId::new("music_a_b".to_string()).unwrap(),
            user(host),
            Timestamp::new(1_000),
        )
    }

    #[test]
    fn test_new_room_starts_paused_with_no_track() {
        // テスト項目: 新規 Room はトラックなし・停止状態で作成される
        // given (前提条件):
        // when (操作):
        let room = new_room("alice");

        // then (期待する結果):
        assert!(room.current_track.is_none());
        assert!(!room.is_playing);
        assert!(room.participants.contains(&user("alice")));
        assert!(room.is_host(&user("alice")));
    }

    #[test]
    fn test_add_participant_is_idempotent() {
        // テスト項目: 同じ参加者を二度追加しても状態は変わらない
        // given (前提条件):
        let mut room = new_room("alice");
        room.add_participant(user("bob")).unwrap();

        // when (操作):
        room.add_participant(user("bob")).unwrap();

        // then (期待する結果):
        assert_eq!(room.participants.len(), 2);
    }

    #[test]
    fn test_add_participant_rejects_overflow() {
        // テスト項目: 容量超過時に RoomFull エラーが返される
        // given (前提条件):
        let mut room = Room::with_capacity(
            RoomId::new("music_a_b".to_string()).unwrap(),
            user("alice"),
            Timestamp::new(1_000),
            2,
        );
        room.add_participant(user("bob")).unwrap();

        // when (操作):
        let result = room.add_participant(user("charlie"));

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomError::RoomFull("music_a_b".to_string()))
        );
        assert_eq!(room.participants.len(), 2);
    }

    #[test]
    fn test_non_host_control_is_rejected_and_state_unchanged() {
        // テスト項目: 非ホストからの制御イベントは拒否され、状態は変化しない
        // given (前提条件):
        let mut room = new_room("alice");
        room.add_participant(user("bob")).unwrap();
        room.current_track = Some(test_track());

        // when (操作):
        let result = room.apply_control(
            &user("bob"),
            &ControlAction::Play { position: 10.0 },
            Timestamp::new(2_000),
        );

        // then (期待する結果):
        assert!(matches!(result, Err(RoomError::NotAuthorized { .. })));
        assert!(!room.is_playing);
        assert_eq!(room.anchor_position, 0.0);
        assert!(room.is_host(&user("alice")));
    }

    #[test]
    fn test_play_without_track_is_rejected() {
        // テスト項目: トラック未ロードの Room では play が拒否される
        // given (前提条件):
        let mut room = new_room("alice");

        // when (操作):
        let result = room.apply_control(
            &user("alice"),
            &ControlAction::Play { position: 0.0 },
            Timestamp::new(2_000),
        );

        // then (期待する結果): is_playing=true が track なしで成立しない
        assert_eq!(
            result,
            Err(RoomError::NoTrackLoaded("music_a_b".to_string()))
        );
        assert!(!room.is_playing);
    }

    #[test]
    fn test_play_anchors_position_and_timestamp() {
        // テスト項目: play がアンカー位置とタイムスタンプを更新する
        // given (前提条件):
        let mut room = new_room("alice");
        room.current_track = Some(test_track());

        // when (操作):
        room.apply_control(
            &user("alice"),
            &ControlAction::Play { position: 30.0 },
            Timestamp::new(10_000),
        )
        .unwrap();

        // then (期待する結果): 5 秒後の算出位置は 35.0
        assert!(room.is_playing);
        assert_eq!(room.position_at(Timestamp::new(15_000)), 35.0);
    }

    #[test]
    fn test_pause_freezes_position() {
        // テスト項目: pause 後は経過時間に関係なく位置が固定される
        // given (前提条件):
        let mut room = new_room("alice");
        room.current_track = Some(test_track());
        room.apply_control(
            &user("alice"),
            &ControlAction::Play { position: 0.0 },
            Timestamp::new(10_000),
        )
        .unwrap();

        // when (操作):
        room.apply_control(
            &user("alice"),
            &ControlAction::Pause { position: 42.0 },
            Timestamp::new(52_000),
        )
        .unwrap();

        // then (期待する結果):
        assert!(!room.is_playing);
        assert_eq!(room.position_at(Timestamp::new(90_000)), 42.0);
    }

    #[test]
    fn test_seek_keeps_play_state() {
        // テスト項目: seek は再生状態を変えずにアンカーだけ更新する
        // given (前提条件):
        let mut room = new_room("alice");
        room.current_track = Some(test_track());
        room.apply_control(
            &user("alice"),
            &ControlAction::Play { position: 0.0 },
            Timestamp::new(10_000),
        )
        .unwrap();

        // when (操作):
        room.apply_control(
            &user("alice"),
            &ControlAction::Seek { position: 120.0 },
            Timestamp::new(20_000),
        )
        .unwrap();

        // then (期待する結果):
        assert!(room.is_playing);
        assert_eq!(room.position_at(Timestamp::new(21_000)), 121.0);
    }

    #[test]
    fn test_change_track_resets_position() {
        // テスト項目: changeTrack がトラックを差し替えて位置を 0 にリセットする
        // given (前提条件):
        let mut room = new_room("alice");
        room.current_track = Some(test_track());
        room.apply_control(
            &user("alice"),
            &ControlAction::Play { position: 100.0 },
            Timestamp::new(10_000),
        )
        .unwrap();

        let next = Track {
            id: "t2".to_string(),
            ..test_track()
        };

        // when (操作):
        room.apply_control(
            &user("alice"),
            &ControlAction::ChangeTrack {
                track: next.clone(),
                playing: true,
            },
            Timestamp::new(20_000),
        )
        .unwrap();

        // then (期待する結果):
        assert_eq!(room.current_track, Some(next));
        assert_eq!(room.anchor_position, 0.0);
        assert!(room.is_playing);
    }

    #[test]
    fn test_stop_clears_track_and_pauses() {
        // テスト項目: stop がトラックをクリアし、停止状態にする
        // given (前提条件):
        let mut room = new_room("alice");
        room.current_track = Some(test_track());
        room.apply_control(
            &user("alice"),
            &ControlAction::Play { position: 0.0 },
            Timestamp::new(10_000),
        )
        .unwrap();

        // when (操作):
        room.apply_control(&user("alice"), &ControlAction::Stop, Timestamp::new(20_000))
            .unwrap();

        // then (期待する結果):
        assert!(room.current_track.is_none());
        assert!(!room.is_playing);
    }

    #[test]
    fn test_host_departure_migrates_to_lowest_sorted_id() {
        // テスト項目: ホスト離脱時、残りの最小 id の参加者が新ホストになる
        // given (前提条件):
        let mut room = new_room("mallory");
        room.add_participant(user("bob")).unwrap();
        room.add_participant(user("alice")).unwrap();

        // when (操作):
        let departure = room.remove_participant(&user("mallory"));

        // then (期待する結果):
        assert_eq!(
            departure,
            Departure::Remaining {
                new_host: Some(user("alice"))
            }
        );
        assert!(room.is_host(&user("alice")));
    }

    #[test]
    fn test_guest_departure_keeps_host() {
        // テスト項目: ゲスト離脱時、ホストは変わらない
        // given (前提条件):
        let mut room = new_room("alice");
        room.add_participant(user("bob")).unwrap();

        // when (操作):
        let departure = room.remove_participant(&user("bob"));

        // then (期待する結果):
        assert_eq!(departure, Departure::Remaining { new_host: None });
        assert!(room.is_host(&user("alice")));
    }

    #[test]
    fn test_last_departure_empties_room() {
        // テスト項目: 最後の参加者が離脱すると Empty が返される
        // given (前提条件):
        let mut room = new_room("alice");

        // when (操作):
        let departure = room.remove_participant(&user("alice"));

        // then (期待する結果):
        assert_eq!(departure, Departure::Empty);
    }

    #[test]
    fn test_remove_unknown_participant() {
        // テスト項目: 参加していないユーザーの離脱は NotAMember になる
        // given (前提条件):
        let mut room = new_room("alice");

        // when (操作):
        let departure = room.remove_participant(&user("eve"));

        // then (期待する結果):
        assert_eq!(departure, Departure::NotAMember);
        assert_eq!(room.participants.len(), 1);
    }
}
