//! In-memory store implementations.

mod invitation;
mod room;

pub use invitation::InMemoryInvitationStore;
pub use room::InMemoryRoomStore;
