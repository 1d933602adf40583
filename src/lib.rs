//! Collaborative playback synchronization engine.
//!
//! One participant (the host) is the timing authority for a room; the
//! server relays authoritative snapshots and guests reconcile their local
//! playback against them. Layers follow the dependency rule: `domain`
//! knows nothing above it, `usecase` depends on domain ports only, and
//! `infrastructure`/`ui` provide the concrete edges.

pub mod client;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
