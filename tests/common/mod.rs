//! Shared integration test setup: an in-process server on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use duet::{
    common::time::SystemClock,
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

/// Wire up a full server and serve it on 127.0.0.1 with an OS-picked port
pub async fn spawn_server() -> SocketAddr {
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

    let router = Server::new(state).into_router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("test server crashed");
    });

    addr
}

pub fn http_url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

pub fn ws_url(addr: SocketAddr, user_id: &str) -> String {
    format!("ws://{}/ws?user_id={}", addr, user_id)
}
