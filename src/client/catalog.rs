//! Built-in demo track catalog.
//!
//! Stands in for a real music library lookup so the terminal client can
//! exercise the whole invitation and playback flow.

use crate::domain::Track;

pub fn demo_tracks() -> Vec<Track> {
    vec![
        Track {
            id: "demo-001".to_string(),
            title: "Night Drive".to_string(),
            artist: "Neon City".to_string(),
            media_url: "https://cdn.example.com/tracks/night-drive.mp3".to_string(),
            artwork_url: Some("https://cdn.example.com/art/night-drive.jpg".to_string()),
            duration_seconds: 214.0,
        },
        Track {
            id: "demo-002".to_string(),
            title: "Paper Planes Over Shinjuku".to_string(),
            artist: "Hana Mori".to_string(),
            media_url: "https://cdn.example.com/tracks/paper-planes.mp3".to_string(),
            artwork_url: None,
            duration_seconds: 187.5,
        },
        Track {
            id: "demo-003".to_string(),
            title: "Undertow".to_string(),
            artist: "Saltwater Choir".to_string(),
            media_url: "https://cdn.example.com/tracks/undertow.mp3".to_string(),
            artwork_url: Some("https://cdn.example.com/art/undertow.jpg".to_string()),
            duration_seconds: 301.0,
        },
        Track {
            id: "demo-004".to_string(),
            title: "Last Train Home".to_string(),
            artist: "Neon City".to_string(),
            media_url: "https://cdn.example.com/tracks/last-train.mp3".to_string(),
            artwork_url: None,
            duration_seconds: 243.2,
        },
    ]
}

/// Look up a track by its 1-based catalog number
pub fn track_by_number(tracks: &[Track], number: usize) -> Option<&Track> {
    tracks.get(number.checked_sub(1)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_by_number_is_one_based() {
        // テスト項目: トラック番号は 1 始まりで引ける
        // given (前提条件):
        let tracks = demo_tracks();

        // when (操作):
        let first = track_by_number(&tracks, 1);
        let zero = track_by_number(&tracks, 0);
        let beyond = track_by_number(&tracks, tracks.len() + 1);

        // then (期待する結果):
        assert_eq!(first.map(|t| t.id.as_str()), Some("demo-001"));
        assert!(zero.is_none());
        assert!(beyond.is_none());
    }
}
