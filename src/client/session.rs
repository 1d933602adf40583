//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    common::time::{Clock, SystemClock},
    domain::Track,
    infrastructure::dto::websocket::{ClientEvent, ControlActionDto, ServerEvent},
};

use super::{
    catalog::{demo_tracks, track_by_number},
    commands::{parse_command, Command, HELP_TEXT},
    error::ClientError,
    formatter::{redisplay_prompt, EventFormatter},
    synchronizer::{PlaybackSynchronizer, HEARTBEAT_INTERVAL_SECS},
    transport::SimulatedTransport,
};

/// Run the playback client session
pub async fn run_client_session(
    url: &str,
    user_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // Construct URL with user_id as query parameter
    let url = format!("{}?user_id={}", url, user_id);

    let (ws_stream, response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(e) => {
            let error_msg = e.to_string();

            // Check for HTTP 409 Conflict (duplicate user id)
            if error_msg.contains("409") || error_msg.contains("Conflict") {
                return Err(Box::new(ClientError::DuplicateUserId(user_id.to_string())));
            }

            return Err(Box::new(ClientError::ConnectionError(error_msg)));
        }
    };

    if response.status().as_u16() == 409 {
        return Err(Box::new(ClientError::DuplicateUserId(user_id.to_string())));
    }

    tracing::info!("Connected to playback session server!");
    println!(
        "\nYou are '{}'. Type /help for commands. Press Ctrl+C to exit.\n",
        user_id
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let synchronizer = Arc::new(Mutex::new(PlaybackSynchronizer::new(
        user_id.to_string(),
        Box::new(SimulatedTransport::new(clock.clone())),
        clock,
    )));

    let (mut write, mut read) = ws_stream.split();

    // All producers funnel serialized events through one channel so a
    // single task owns the WebSocket sink.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a task to handle incoming server events
    let sync_for_read = synchronizer.clone();
    let user_id_for_read = user_id.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => {
                            handle_server_event(event, &sync_for_read, &user_id_for_read).await;
                        }
                        Err(e) => {
                            tracing::debug!("Unparseable server event: {}", e);
                            print!("{}", EventFormatter::format_raw_message(&text));
                            redisplay_prompt(&user_id_for_read);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let user_id_for_prompt = user_id.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", user_id_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to translate commands into protocol events
    let sync_for_commands = synchronizer.clone();
    let out_tx_for_commands = out_tx.clone();
    let user_id_for_commands = user_id.to_string();
    let mut command_task = tokio::spawn(async move {
        let tracks = demo_tracks();

        while let Some(line) = input_rx.recv().await {
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(msg) => {
                    println!("{}", msg);
                    redisplay_prompt(&user_id_for_commands);
                    continue;
                }
            };

            if matches!(command, Command::Quit) {
                tracing::info!("Quit requested");
                break;
            }

            let event =
                build_client_event(command, &tracks, &sync_for_commands, &user_id_for_commands)
                    .await;

            if let Some(event) = event {
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize event: {}", e);
                        continue;
                    }
                };
                if out_tx_for_commands.send(json).is_err() {
                    break;
                }
            }
        }
    });

    // Host heartbeat: periodically re-assert play state and position so
    // guests recover from drift and missed broadcasts without explicit
    // host actions.
    let sync_for_heartbeat = synchronizer.clone();
    let out_tx_for_heartbeat = out_tx.clone();
    let heartbeat_task = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        interval.tick().await; // first tick is immediate
        loop {
            interval.tick().await;
            let beat = sync_for_heartbeat.lock().await.heartbeat();
            if let Some((room_id, action)) = beat {
                let event = ClientEvent::Control { room_id, action };
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if out_tx_for_heartbeat.send(json).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::error!("Failed to serialize heartbeat: {}", e),
                }
            }
        }
    });

    // Single writer task for the WebSocket sink
    let write_task = tokio::spawn(async move {
        while let Some(json) = out_rx.recv().await {
            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send event: {}", e);
                break;
            }
        }
    });

    // If either core task completes, tear the session down
    let connection_error = tokio::select! {
        read_result = &mut read_task => {
            command_task.abort();
            read_result.unwrap_or(false)
        }
        _ = &mut command_task => {
            read_task.abort();
            false
        }
    };
    heartbeat_task.abort();
    write_task.abort();

    if connection_error {
        return Err(Box::new(ClientError::ConnectionError(
            "Connection lost".to_string(),
        )));
    }

    Ok(())
}

async fn handle_server_event(
    event: ServerEvent,
    synchronizer: &Arc<Mutex<PlaybackSynchronizer>>,
    user_id: &str,
) {
    match event {
        ServerEvent::RoomStateUpdate(snapshot) => {
            if let Err(e) = synchronizer.lock().await.apply_snapshot(&snapshot) {
                tracing::warn!("Failed to apply snapshot: {}", e);
            }
            print!("{}", EventFormatter::format_room_state(&snapshot, user_id));
        }
        ServerEvent::InvitationReceived(invitation) => {
            synchronizer
                .lock()
                .await
                .remember_invitation(invitation.invitation_id.clone());
            print!("{}", EventFormatter::format_invitation(&invitation));
        }
        ServerEvent::InvitationDelivery { delivered, .. } => {
            print!("{}", EventFormatter::format_delivery(delivered));
        }
        ServerEvent::InvitationDeclined { receiver_id, .. } => {
            print!("{}", EventFormatter::format_declined(&receiver_id));
        }
        ServerEvent::HostChanged { room_id, host_id } => {
            synchronizer.lock().await.set_host(&room_id, &host_id);
            print!("{}", EventFormatter::format_host_changed(&host_id, user_id));
        }
        ServerEvent::SessionEnded { room_id } => {
            synchronizer.lock().await.clear_session();
            print!("{}", EventFormatter::format_session_ended(&room_id));
        }
        ServerEvent::Error { code, message } => {
            print!("{}", EventFormatter::format_error(&code, &message));
        }
    }
    redisplay_prompt(user_id);
}

/// Turn a parsed command into a protocol event, or handle it locally
async fn build_client_event(
    command: Command,
    tracks: &[Track],
    synchronizer: &Arc<Mutex<PlaybackSynchronizer>>,
    user_id: &str,
) -> Option<ClientEvent> {
    let event = match command {
        Command::Invite {
            receiver,
            track_number,
        } => match track_by_number(tracks, track_number) {
            Some(track) => Some(ClientEvent::SendInvitation {
                receiver_id: receiver,
                track: track.clone(),
            }),
            None => {
                println!("no such track: {} (see /tracks)", track_number);
                None
            }
        },

        Command::Accept { invitation_id } => {
            respond_event(synchronizer, invitation_id, true).await
        }

        Command::Decline { invitation_id } => {
            respond_event(synchronizer, invitation_id, false).await
        }

        Command::Join { room_id } => Some(ClientEvent::JoinRoom { room_id }),

        Command::Play => control_event(synchronizer.lock().await.control_play()),
        Command::Pause => control_event(synchronizer.lock().await.control_pause()),
        Command::Seek { position } => {
            control_event(synchronizer.lock().await.control_seek(position))
        }
        Command::ChangeTrack { track_number } => match track_by_number(tracks, track_number) {
            Some(track) => {
                control_event(synchronizer.lock().await.control_change_track(track.clone()))
            }
            None => {
                println!("no such track: {} (see /tracks)", track_number);
                None
            }
        },

        Command::Stop => {
            let room_id = {
                let guard = synchronizer.lock().await;
                guard.session().map(|s| s.room_id.clone())
            };
            match room_id {
                Some(room_id) => Some(ClientEvent::EndSession { room_id }),
                None => {
                    println!("not in a session");
                    None
                }
            }
        }

        Command::Leave => {
            let mut guard = synchronizer.lock().await;
            let room_id = guard.session().map(|s| s.room_id.clone());
            match room_id {
                Some(room_id) => {
                    guard.clear_session();
                    Some(ClientEvent::LeaveRoom { room_id })
                }
                None => {
                    println!("not in a session");
                    None
                }
            }
        }

        Command::Tracks => {
            print!("{}", EventFormatter::format_tracks(tracks));
            None
        }

        Command::Status => {
            let guard = synchronizer.lock().await;
            let room_id = guard.session().map(|s| s.room_id.clone());
            print!(
                "{}",
                EventFormatter::format_status(room_id.as_deref(), guard.is_host(), guard.position())
            );
            None
        }

        Command::Help => {
            print!("{}", HELP_TEXT);
            None
        }

        // Quit is intercepted by the command loop
        Command::Quit => None,
    };

    if event.is_none() {
        redisplay_prompt(user_id);
    }
    event
}

async fn respond_event(
    synchronizer: &Arc<Mutex<PlaybackSynchronizer>>,
    invitation_id: Option<String>,
    accept: bool,
) -> Option<ClientEvent> {
    let invitation_id = match invitation_id {
        Some(id) => Some(id),
        None => synchronizer.lock().await.take_pending_invitation(),
    };
    match invitation_id {
        Some(invitation_id) => Some(ClientEvent::RespondInvitation {
            invitation_id,
            accept,
        }),
        None => {
            println!("no pending invitation");
            None
        }
    }
}

fn control_event(outbound: Option<(String, ControlActionDto)>) -> Option<ClientEvent> {
    match outbound {
        Some((room_id, action)) => Some(ClientEvent::Control { room_id, action }),
        None => {
            println!("not in a session");
            None
        }
    }
}
