//! Server state and connection management.

use std::sync::Arc;

use crate::{
    domain::MessagePusher,
    usecase::{
        ControlPlaybackUseCase, GetPendingInvitationsUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, RespondInvitationUseCase,
        SendInvitationUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub send_invitation_usecase: Arc<SendInvitationUseCase>,
    pub respond_invitation_usecase: Arc<RespondInvitationUseCase>,
    pub control_playback_usecase: Arc<ControlPlaybackUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub get_pending_invitations_usecase: Arc<GetPendingInvitationsUseCase>,
    /// MessagePusher（メッセージ通知の抽象化）
    pub message_pusher: Arc<dyn MessagePusher>,
}
