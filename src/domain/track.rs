//! Track descriptor shared between server and client.

use serde::{Deserialize, Serialize};

/// Descriptor of a playable track.
///
/// Serialized with camelCase keys because the same shape travels over the
/// wire inside invitations and room snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub media_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
    pub duration_seconds: f64,
}
