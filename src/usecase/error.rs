//! Session coordinator error taxonomy.

use thiserror::Error;

use crate::domain::{DomainError, RoomError, StoreError};

/// Errors surfaced to the event sender.
///
/// The coordinator never fails silently: authorization and not-found
/// errors are reported back to the offending client as an `error` event.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("user '{user_id}' is not the host of room '{room_id}'")]
    NotAuthorized { user_id: String, room_id: String },

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("invitation '{0}' not found")]
    InvitationNotFound(String),

    #[error("invitation '{0}' has expired")]
    InvitationExpired(String),

    #[error("room '{0}' is full")]
    RoomFull(String),

    #[error("no track is loaded in room '{0}'")]
    NoTrackLoaded(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl SessionError {
    /// Stable machine-readable code used in the `error` wire event
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotAuthorized { .. } => "notAuthorized",
            SessionError::RoomNotFound(_) => "roomNotFound",
            SessionError::InvitationNotFound(_) => "invitationNotFound",
            SessionError::InvitationExpired(_) => "invitationExpired",
            SessionError::RoomFull(_) => "roomFull",
            SessionError::NoTrackLoaded(_) => "noTrackLoaded",
            SessionError::InvalidPayload(_) => "invalidPayload",
        }
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        SessionError::InvalidPayload(err.to_string())
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RoomNotFound(id) => SessionError::RoomNotFound(id),
            StoreError::Room(RoomError::NotAuthorized { user_id, room_id }) => {
                SessionError::NotAuthorized { user_id, room_id }
            }
            StoreError::Room(RoomError::RoomFull(id)) => SessionError::RoomFull(id),
            StoreError::Room(RoomError::NoTrackLoaded(id)) => SessionError::NoTrackLoaded(id),
        }
    }
}
