//! Protocol Module
//!
//! Binary framing for the TAP replication protocol.
//!
//! ## Request Format (fixed 24-byte header + body)
//! ```text
//! ┌─────────┬─────────┬──────────┬─────────┬──────────┬─────────┐
//! │magic (1)│opcode(1)│keylen (2)│extlen(1)│dtype (1) │vbkt (2) │
//! ├─────────┴─────────┴──────────┴─────────┴──────────┴─────────┤
//! │ bodylen (4)          │ opaque (4)        │ cas (8)          │
//! ├──────────────────────┴───────────────────┴──────────────────┤
//! │ flags (4) │ key (stream name) │ since timestamp (8)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//! - magic: 0x80 (request), opcode: 0x40 (TAP connect)
//! - flags bits: 0x01 backfill, 0x02 dump, 0x20 keys-only
//! - bodylen = 4 + keylen + 8
//!
//! ## Response Format (same 24-byte header layout, magic 0x81)
//! Body is extras + key + value, carved by the header-declared lengths.
//!
//! ### Response Opcodes
//! - 0x0a: NOOP      - no body
//! - 0x41: MUTATION  - key + value
//! - 0x42: DELETE    - key (+ optional value)
//! - 0x43: FLUSH
//! - 0x44: OPAQUE

mod header;
mod request;
mod event;

pub use header::{ResponseHeader, HEADER_SIZE, REQUEST_MAGIC, RESPONSE_MAGIC, TAP_CONNECT};
pub use request::{TapRequest, TAP_FLAG_BACKFILL, TAP_FLAG_DUMP, TAP_FLAG_KEYS_ONLY};
pub use event::{
    split_body, EventKind, TapEvent, OPCODE_NOOP, OPCODE_TAP_DELETE, OPCODE_TAP_FLUSH,
    OPCODE_TAP_MUTATION, OPCODE_TAP_OPAQUE,
};
