//! # tapstream
//!
//! A streaming change-capture client for the memcached-family TAP
//! replication protocol:
//! - One TCP connection per stream, timeout-bounded connect with
//!   down-state tracking
//! - Binary request/response framing (fixed 24-byte headers)
//! - A synchronous read loop that turns the raw byte stream into typed
//!   mutation/delete events
//! - Checkpoint persistence for dump-vs-backfill decisions between runs
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐ open/run ┌──────────────┐ connect/read ┌────────────┐
//! │    Caller    │─────────▶│  TapStream   │─────────────▶│ Connection │
//! │ (EventSink)  │          │ (read loop)  │              │ (1 socket) │
//! └──────▲───────┘          └──────┬───────┘              └─────┬──────┘
//!        │                        │ encode / decode            │ TCP
//!        │   TapEvent             ▼                            ▼
//!        │                 ┌──────────────┐            ┌──────────────┐
//!        └─────────────────│   protocol   │            │  TAP server  │
//!                          │   (codec)    │            │ (port 11210) │
//!                          └──────────────┘            └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod binutil;
pub mod network;
pub mod protocol;
pub mod stream;
pub mod sink;
pub mod checkpoint;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, TapError};
pub use config::Config;
pub use network::{Connection, Endpoint};
pub use protocol::{EventKind, ResponseHeader, TapEvent, TapRequest};
pub use sink::{ChannelSink, EventSink};
pub use stream::TapStream;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tapstream
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
