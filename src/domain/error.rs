//! Domain error types.

use thiserror::Error;

/// Validation errors for domain value objects
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("invalid invitation id: '{0}'")]
    InvalidInvitationId(String),
}

/// Errors raised by room mutations
#[derive(Debug, Error, PartialEq)]
pub enum RoomError {
    /// A non-host participant attempted a state mutation.
    /// Exactly one identity may author room state at any time.
    #[error("user '{user_id}' is not the host of room '{room_id}'")]
    NotAuthorized { user_id: String, room_id: String },

    /// Playback cannot start while no track is loaded
    #[error("no track is loaded in room '{0}'")]
    NoTrackLoaded(String),

    /// Participant capacity reached
    #[error("room '{0}' is full")]
    RoomFull(String),
}

/// Errors raised by the room store
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error(transparent)]
    Room(#[from] RoomError),
}
