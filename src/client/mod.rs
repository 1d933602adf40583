//! Terminal playback client implementation.

mod catalog;
mod commands;
mod error;
mod formatter;
mod runner;
mod session;
mod synchronizer;
mod transport;

pub use error::ClientError;
pub use runner::run_client;
pub use synchronizer::{PlaybackSynchronizer, DRIFT_THRESHOLD_SECS, HEARTBEAT_INTERVAL_SECS};
pub use transport::{MediaTransport, SimulatedTransport};
