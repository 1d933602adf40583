//! Shared utilities: logging setup and the clock abstraction.

pub mod logger;
pub mod time;
