//! Line-oriented landmark relay.
//!
//! Reads one JSON frame per input line, runs a pose and a hand detector on
//! it and writes one JSON landmark result per output line. Output is
//! reserved for results; diagnostics go through `log`.

pub mod config;
pub mod error;
pub mod protocol;
pub mod relay;

pub use config::RelayConfig;
pub use error::RelayError;
pub use protocol::{FrameRequest, FrameResult, READY_TOKEN};
pub use relay::{Relay, RelayStats};
