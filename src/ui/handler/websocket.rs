//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ControlAction, InvitationId, Room, RoomId, UserId},
    infrastructure::dto::websocket::{ClientEvent, InvitationDto, RoomSnapshotDto, ServerEvent},
    ui::state::AppState,
    usecase::{ControlOutcome, InvitationResponse, LeaveOutcome, SessionError},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let user_id_str = query.user_id;

    // Convert String -> UserId (Domain Model)
    let user_id = match UserId::new(user_id_str.clone()) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid user_id: '{}'", user_id_str);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Create a channel for this client to receive pushed events.
    // One live connection per user id; the registry does the
    // check-and-insert under a single lock.
    let (tx, rx) = mpsc::unbounded_channel();
    if !state.message_pusher.register(user_id.clone(), tx).await {
        tracing::warn!(
            "User '{}' is already connected. Rejecting connection.",
            user_id_str
        );
        return Err(StatusCode::CONFLICT);
    }
    tracing::info!("User '{}' connected and registered", user_id_str);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, rx)))
}

/// Spawns a task that receives events from the rx channel and pushes them
/// to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    user_id: UserId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    // Replay invitations that arrived while this user was offline
    {
        let pending = state
            .get_pending_invitations_usecase
            .execute(&user_id)
            .await;
        for invitation in &pending {
            let event = ServerEvent::InvitationReceived(InvitationDto::from(invitation));
            let json = serde_json::to_string(&event).unwrap();
            if let Err(e) = sender.send(Message::Text(json.into())).await {
                tracing::error!("Failed to replay invitation to '{}': {}", user_id, e);
                break;
            }
        }
        if !pending.is_empty() {
            tracing::info!(
                "Replayed {} pending invitation(s) to '{}'",
                pending.len(),
                user_id
            );
        }
    }

    let user_id_clone = user_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("Failed to parse event from '{}': {}", user_id_clone, e);
                            push_error(
                                &state_clone,
                                &user_id_clone,
                                "invalidPayload",
                                &e.to_string(),
                            )
                            .await;
                            continue;
                        }
                    };

                    if let Err(e) = dispatch_event(&state_clone, &user_id_clone, event).await {
                        tracing::warn!("Event from '{}' rejected: {}", user_id_clone, e);
                        push_error(&state_clone, &user_id_clone, e.code(), &e.to_string()).await;
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("User '{}' requested close", user_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive events from the coordinator and send to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Connection gone: unregister first so departure broadcasts skip this user
    state.message_pusher.unregister(&user_id).await;
    tracing::info!("User '{}' disconnected and removed from registry", user_id);

    // A dropped connection means leaving every joined room
    let outcomes = state
        .leave_room_usecase
        .execute_disconnect(user_id.clone())
        .await;
    for (room_id, outcome) in outcomes {
        match outcome {
            Ok(LeaveOutcome::Left { room, new_host }) => {
                broadcast_departure(&state, &room, new_host.as_ref()).await;
            }
            Ok(LeaveOutcome::RoomRemoved { room_id }) => {
                tracing::info!("Room {} removed after disconnect of '{}'", room_id, user_id);
            }
            Ok(LeaveOutcome::NotAMember) => {}
            Err(e) => {
                tracing::warn!("Disconnect cleanup failed for room {}: {}", room_id, e);
            }
        }
    }
}

/// Route one client event to its use case and fan out the results
async fn dispatch_event(
    state: &Arc<AppState>,
    user_id: &UserId,
    event: ClientEvent,
) -> Result<(), SessionError> {
    match event {
        ClientEvent::JoinRoom { room_id } => {
            let room_id = RoomId::new(room_id)?;
            let room = state
                .join_room_usecase
                .execute(room_id, user_id.clone())
                .await?;

            let json = snapshot_json(&RoomSnapshotDto::from(&room));
            // Command response to the joiner, then fan-out to the rest
            if let Err(e) = state.message_pusher.push_to(user_id, &json).await {
                tracing::warn!("Failed to confirm join to '{}': {}", user_id, e);
            }
            state
                .join_room_usecase
                .broadcast_room_state(&room, user_id, &json)
                .await;
        }

        ClientEvent::SendInvitation { receiver_id, track } => {
            let receiver_id = UserId::new(receiver_id)?;
            let outcome = state
                .send_invitation_usecase
                .execute(user_id.clone(), receiver_id.clone(), track)
                .await?;

            // The sender is now host of the pair room
            let room_json = snapshot_json(&RoomSnapshotDto::from(&outcome.room));
            if let Err(e) = state.message_pusher.push_to(user_id, &room_json).await {
                tracing::warn!("Failed to push room state to '{}': {}", user_id, e);
            }

            let invitation_event =
                ServerEvent::InvitationReceived(InvitationDto::from(&outcome.invitation));
            let invitation_json = serde_json::to_string(&invitation_event).unwrap();
            let delivered = state
                .send_invitation_usecase
                .deliver(&receiver_id, &invitation_json)
                .await;

            // Delivery feedback so the sender can tell "sent" from "waiting"
            let delivery_event = ServerEvent::InvitationDelivery {
                invitation_id: outcome.invitation.id.to_string(),
                delivered,
            };
            let delivery_json = serde_json::to_string(&delivery_event).unwrap();
            if let Err(e) = state.message_pusher.push_to(user_id, &delivery_json).await {
                tracing::warn!("Failed to push delivery feedback to '{}': {}", user_id, e);
            }
        }

        ClientEvent::RespondInvitation {
            invitation_id,
            accept,
        } => {
            let invitation_id = InvitationId::parse(&invitation_id)?;
            let response = state
                .respond_invitation_usecase
                .execute(invitation_id, accept)
                .await?;

            match response {
                InvitationResponse::Accepted { invitation: _, room } => {
                    // Catch-up snapshot to everyone, the new joiner included
                    let json = snapshot_json(&RoomSnapshotDto::from(&room));
                    state
                        .respond_invitation_usecase
                        .broadcast_room_state(&room, &json)
                        .await;
                }
                InvitationResponse::Declined { invitation } => {
                    let event = ServerEvent::InvitationDeclined {
                        invitation_id: invitation.id.to_string(),
                        receiver_id: invitation.receiver_id.as_str().to_string(),
                    };
                    let json = serde_json::to_string(&event).unwrap();
                    state
                        .respond_invitation_usecase
                        .notify_sender(&invitation.sender_id, &json)
                        .await;
                }
            }
        }

        ClientEvent::Control { room_id, action } => {
            let room_id = RoomId::new(room_id)?;
            handle_control(state, user_id, room_id, ControlAction::from(action)).await?;
        }

        ClientEvent::LeaveRoom { room_id } => {
            let room_id = RoomId::new(room_id)?;
            let outcome = state
                .leave_room_usecase
                .execute(room_id, user_id.clone())
                .await?;
            if let LeaveOutcome::Left { room, new_host } = outcome {
                broadcast_departure(state, &room, new_host.as_ref()).await;
            }
        }

        ClientEvent::EndSession { room_id } => {
            let room_id = RoomId::new(room_id)?;
            handle_control(state, user_id, room_id, ControlAction::Stop).await?;
        }
    }
    Ok(())
}

async fn handle_control(
    state: &Arc<AppState>,
    user_id: &UserId,
    room_id: RoomId,
    action: ControlAction,
) -> Result<(), SessionError> {
    let outcome = state
        .control_playback_usecase
        .execute(room_id, user_id.clone(), action)
        .await?;

    match outcome {
        ControlOutcome::Updated { room } => {
            // The originator already holds this state locally
            let json = snapshot_json(&RoomSnapshotDto::from(&room));
            state
                .control_playback_usecase
                .broadcast_to_guests(&room, user_id, &json)
                .await;
        }
        ControlOutcome::Ended {
            room_id,
            participants,
        } => {
            let event = ServerEvent::SessionEnded {
                room_id: room_id.as_str().to_string(),
            };
            let json = serde_json::to_string(&event).unwrap();
            state
                .control_playback_usecase
                .broadcast_session_ended(participants, &json)
                .await;
        }
    }
    Ok(())
}

/// Post-departure fan-out: snapshot for everyone remaining, plus an
/// explicit hostChanged when authority migrated.
async fn broadcast_departure(state: &Arc<AppState>, room: &Room, new_host: Option<&UserId>) {
    let json = snapshot_json(&RoomSnapshotDto::from(room));
    state
        .leave_room_usecase
        .broadcast_room_state(room, &json)
        .await;

    if let Some(host) = new_host {
        let event = ServerEvent::HostChanged {
            room_id: room.id.as_str().to_string(),
            host_id: host.as_str().to_string(),
        };
        let host_json = serde_json::to_string(&event).unwrap();
        state
            .leave_room_usecase
            .broadcast_room_state(room, &host_json)
            .await;
    }
}

async fn push_error(state: &Arc<AppState>, user_id: &UserId, code: &str, message: &str) {
    let event = ServerEvent::Error {
        code: code.to_string(),
        message: message.to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    if let Err(e) = state.message_pusher.push_to(user_id, &json).await {
        tracing::warn!("Failed to push error to '{}': {}", user_id, e);
    }
}

fn snapshot_json(snapshot: &RoomSnapshotDto) -> String {
    let event = ServerEvent::RoomStateUpdate(snapshot.clone());
    serde_json::to_string(&event).unwrap()
}
