//! Domain layer: entities, value objects and the ports the session
//! coordinator depends on.

mod control;
mod error;
mod ids;
mod invitation;
mod pusher;
mod room;
mod store;
mod track;

pub use control::ControlAction;
pub use error::{DomainError, RoomError, StoreError};
pub use ids::{InvitationId, RoomId, Timestamp, UserId};
pub use invitation::{Invitation, InvitationState, INVITATION_TTL_SECS};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use room::{Departure, Room, DEFAULT_ROOM_CAPACITY};
pub use store::{InvitationStore, RoomStore};
pub use track::Track;

#[cfg(test)]
pub use pusher::MockMessagePusher;
