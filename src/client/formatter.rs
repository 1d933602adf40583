//! Event formatting utilities for client display.

use std::io::Write;

use crate::{
    common::time::millis_to_jst_rfc3339,
    domain::Track,
    infrastructure::dto::websocket::{InvitationDto, RoomSnapshotDto},
};

/// Redisplay the prompt after printing an asynchronous event
pub fn redisplay_prompt(user_id: &str) {
    print!("{}> ", user_id);
    std::io::stdout().flush().ok();
}

/// Event formatter for client display
pub struct EventFormatter;

impl EventFormatter {
    /// Format an authoritative room snapshot
    pub fn format_room_state(snapshot: &RoomSnapshotDto, current_user_id: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str(&format!("Room {}\n", snapshot.room_id));

        for participant in &snapshot.participants {
            let mut suffix = String::new();
            if participant == &snapshot.host_id {
                suffix.push_str(" (host)");
            }
            if participant == current_user_id {
                suffix.push_str(" (me)");
            }
            output.push_str(&format!("  {}{}\n", participant, suffix));
        }

        match &snapshot.track {
            Some(track) => {
                let state = if snapshot.is_playing {
                    "playing"
                } else {
                    "paused"
                };
                output.push_str(&format!(
                    "Now {}: {} - {} (from {:.1}s)\n",
                    state, track.artist, track.title, snapshot.anchor_position
                ));
            }
            None => output.push_str("No track loaded\n"),
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format an incoming invitation
    pub fn format_invitation(invitation: &InvitationDto) -> String {
        format!(
            "\n\n------------------------------------------------------------\n\
             @{} invites you to listen to '{}' by {}\n\
             received at {}\n\
             type /accept to join, /decline to refuse\n\
             ------------------------------------------------------------\n",
            invitation.sender_id,
            invitation.track.title,
            invitation.track.artist,
            millis_to_jst_rfc3339(invitation.created_at),
        )
    }

    /// Format delivery feedback for a sent invitation
    pub fn format_delivery(delivered: bool) -> String {
        if delivered {
            "\n✓ invitation delivered\n".to_string()
        } else {
            "\n✗ receiver is offline; the invitation waits for them\n".to_string()
        }
    }

    pub fn format_declined(receiver_id: &str) -> String {
        format!("\n✗ @{} declined your invitation\n", receiver_id)
    }

    pub fn format_host_changed(host_id: &str, current_user_id: &str) -> String {
        if host_id == current_user_id {
            "\n★ you are now the host\n".to_string()
        } else {
            format!("\n★ @{} is now the host\n", host_id)
        }
    }

    pub fn format_session_ended(room_id: &str) -> String {
        format!("\n■ session ended (room {})\n", room_id)
    }

    pub fn format_error(code: &str, message: &str) -> String {
        format!("\n! {} ({})\n", message, code)
    }

    /// Format the track catalog listing
    pub fn format_tracks(tracks: &[Track]) -> String {
        let mut output = String::new();
        output.push_str("\nTracks:\n");
        for (i, track) in tracks.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} - {} ({:.0}s)\n",
                i + 1,
                track.artist,
                track.title,
                track.duration_seconds
            ));
        }
        output
    }

    /// Format the local session status line
    pub fn format_status(room_id: Option<&str>, is_host: bool, position: f64) -> String {
        match room_id {
            Some(room_id) => format!(
                "\nroom {} | {} | position {:.1}s\n",
                room_id,
                if is_host { "host" } else { "guest" },
                position
            ),
            None => "\nnot in a session\n".to_string(),
        }
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
