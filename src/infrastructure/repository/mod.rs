//! Store implementations for the domain ports.

mod inmemory;

pub use inmemory::{InMemoryInvitationStore, InMemoryRoomStore};
