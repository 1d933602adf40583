//! UseCase layer: one struct per inbound session event.
//!
//! 各ユースケースは Store / MessagePusher の trait にのみ依存する。
//! Room と Invitation の状態はユースケースの execute 呼び出しの中でしか
//! 変更されないため、1 イベントずつ直列化される（single-writer）。

mod control_playback;
mod error;
mod join_room;
mod leave_room;
mod queries;
mod respond_invitation;
mod send_invitation;

pub use control_playback::{ControlOutcome, ControlPlaybackUseCase};
pub use error::SessionError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use queries::{GetPendingInvitationsUseCase, GetRoomDetailUseCase, GetRoomsUseCase};
pub use respond_invitation::{InvitationResponse, RespondInvitationUseCase};
pub use send_invitation::{InvitationOutcome, SendInvitationUseCase};
