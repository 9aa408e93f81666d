//! Shared service plumbing for the channel-crypto binaries.
//!
//! The libraries themselves only emit [`tracing`] events; installing a subscriber is the job of
//! whichever binary links them, and this crate is where that happens.

pub mod logging;

// Re-export tracing crate for convenience.
pub use tracing;
