//! Error types for the playback client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// User ID is already in use
    #[error("User ID '{0}' is already connected")]
    DuplicateUserId(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The track cannot be loaded by the media transport
    #[error("Track '{0}' is unavailable")]
    TrackUnavailable(String),
}
