//! Playback session coordinator server.
//!
//! Hosts rooms in which one participant is the playback timing authority
//! and relays authoritative state snapshots to the other participants.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use duet::{
    common::{logger::setup_logger, time::SystemClock},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryInvitationStore, InMemoryRoomStore},
    },
    ui::{state::AppState, Server},
    usecase::{
        ControlPlaybackUseCase, GetPendingInvitationsUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, RespondInvitationUseCase,
        SendInvitationUseCase,
    },
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Collaborative playback session server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Stores
    // 2. MessagePusher
    // 3. Clock
    // 4. UseCases
    // 5. Server

    let rooms = Arc::new(InMemoryRoomStore::new());
    let invitations = Arc::new(InMemoryInvitationStore::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let clock = Arc::new(SystemClock);

    let state = AppState {
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            rooms.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        send_invitation_usecase: Arc::new(SendInvitationUseCase::new(
            rooms.clone(),
            invitations.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        respond_invitation_usecase: Arc::new(RespondInvitationUseCase::new(
            rooms.clone(),
            invitations.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        control_playback_usecase: Arc::new(ControlPlaybackUseCase::new(
            rooms.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
            rooms.clone(),
            message_pusher.clone(),
        )),
        get_rooms_usecase: Arc::new(GetRoomsUseCase::new(rooms.clone())),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(rooms.clone())),
        get_pending_invitations_usecase: Arc::new(GetPendingInvitationsUseCase::new(
            invitations.clone(),
            clock.clone(),
        )),
        message_pusher: message_pusher.clone(),
    };

    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
