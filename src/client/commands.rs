//! REPL command parsing.

/// A parsed terminal command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `/invite <user> <track-number>`
    Invite { receiver: String, track_number: usize },
    /// `/accept [invitation-id]`
    Accept { invitation_id: Option<String> },
    /// `/decline [invitation-id]`
    Decline { invitation_id: Option<String> },
    /// `/join <room-id>`
    Join { room_id: String },
    /// `/play`
    Play,
    /// `/pause`
    Pause,
    /// `/seek <seconds>`
    Seek { position: f64 },
    /// `/track <track-number>`
    ChangeTrack { track_number: usize },
    /// `/stop` — host only, ends the session for everyone
    Stop,
    /// `/leave`
    Leave,
    /// `/tracks`
    Tracks,
    /// `/status`
    Status,
    /// `/help`
    Help,
    /// `/quit`
    Quit,
}

/// Parse a line of user input. Returns an error message for display on
/// unknown commands or bad arguments.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let head = parts.next().ok_or_else(|| "empty command".to_string())?;

    match head {
        "/invite" => {
            let receiver = parts
                .next()
                .ok_or_else(|| "usage: /invite <user> <track-number>".to_string())?;
            let track_number = parse_track_number(parts.next())?;
            Ok(Command::Invite {
                receiver: receiver.to_string(),
                track_number,
            })
        }
        "/accept" => Ok(Command::Accept {
            invitation_id: parts.next().map(str::to_string),
        }),
        "/decline" => Ok(Command::Decline {
            invitation_id: parts.next().map(str::to_string),
        }),
        "/join" => {
            let room_id = parts
                .next()
                .ok_or_else(|| "usage: /join <room-id>".to_string())?;
            Ok(Command::Join {
                room_id: room_id.to_string(),
            })
        }
        "/play" => Ok(Command::Play),
        "/pause" => Ok(Command::Pause),
        "/seek" => {
            let arg = parts
                .next()
                .ok_or_else(|| "usage: /seek <seconds>".to_string())?;
            let position: f64 = arg
                .parse()
                .map_err(|_| format!("not a number: '{}'", arg))?;
            if position < 0.0 {
                return Err("seek position must be non-negative".to_string());
            }
            Ok(Command::Seek { position })
        }
        "/track" => {
            let track_number = parse_track_number(parts.next())?;
            Ok(Command::ChangeTrack { track_number })
        }
        "/stop" => Ok(Command::Stop),
        "/leave" => Ok(Command::Leave),
        "/tracks" => Ok(Command::Tracks),
        "/status" => Ok(Command::Status),
        "/help" => Ok(Command::Help),
        "/quit" | "/exit" => Ok(Command::Quit),
        other => Err(format!("unknown command: '{}' (try /help)", other)),
    }
}

fn parse_track_number(arg: Option<&str>) -> Result<usize, String> {
    let arg = arg.ok_or_else(|| "missing track number (see /tracks)".to_string())?;
    let n: usize = arg
        .parse()
        .map_err(|_| format!("not a track number: '{}'", arg))?;
    if n == 0 {
        return Err("track numbers start at 1".to_string());
    }
    Ok(n)
}

pub const HELP_TEXT: &str = "\
Commands:
  /invite <user> <n>   invite <user> to listen to track <n> together
  /accept [id]         accept the latest (or a specific) invitation
  /decline [id]        decline the latest (or a specific) invitation
  /join <room-id>      join an existing room
  /play                resume playback (host only)
  /pause               pause playback (host only)
  /seek <seconds>      jump to a position (host only)
  /track <n>           switch to track <n> (host only)
  /stop                end the session for everyone (host only)
  /leave               leave the room, session continues without you
  /tracks              list available tracks
  /status              show the current session
  /help                show this help
  /quit                exit
";
