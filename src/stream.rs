//! TAP event stream
//!
//! The control loop: write one request frame, then read header/body pairs
//! until the server closes the stream or an I/O error propagates.
//!
//! A stream is not restartable. The protocol issues exactly one request
//! per connection; once the loop ends the connection is down and a new
//! run needs a fresh connect. There is no internal cancellation: a caller
//! wanting to stop early closes the connection out of band, which
//! surfaces on the next read.

use bytes::Bytes;

use crate::binutil;
use crate::config::Config;
use crate::error::{Result, TapError};
use crate::network::{Connection, Endpoint};
use crate::protocol::{EventKind, ResponseHeader, TapEvent, TapRequest, HEADER_SIZE};
use crate::sink::EventSink;

/// A TAP event stream over one connection
pub struct TapStream {
    conn: Connection,
    name: String,
}

impl TapStream {
    /// Bind a connection to a logical stream name
    pub fn new(conn: Connection, name: impl Into<String>) -> Self {
        Self {
            conn,
            name: name.into(),
        }
    }

    /// Parse an address, connect, and bind a stream in one step
    pub fn open(address: &str, name: impl Into<String>, config: &Config) -> Result<Self> {
        let endpoint = Endpoint::parse(address)?;
        let conn = Connection::connect(endpoint, config)?;
        Ok(Self::new(conn, name))
    }

    /// Request a full snapshot and feed every event to the sink
    pub fn dump<S: EventSink>(&mut self, sink: &mut S) -> Result<()> {
        let request = TapRequest::dump(self.name.clone());
        self.run(&request, sink)
    }

    /// Request a replay of all changes since `since` (epoch seconds)
    pub fn backfill<S: EventSink>(&mut self, since: u64, sink: &mut S) -> Result<()> {
        let request = TapRequest::backfill(self.name.clone(), since);
        self.run(&request, sink)
    }

    /// Send one request and drive the read loop until the stream ends
    ///
    /// Returns `Ok(())` on a clean end-of-stream (e.g. a completed dump);
    /// network/timeout errors from the reads propagate unchanged.
    pub fn run<S: EventSink>(&mut self, request: &TapRequest, sink: &mut S) -> Result<()> {
        let frame = request.encode();
        tracing::debug!(
            "requesting stream {:?} from {} (flags 0x{:02x}, since {})",
            request.name,
            self.conn.endpoint(),
            request.flags,
            request.since
        );
        tracing::trace!("request frame:\n{}", binutil::hex_dump(&frame));
        self.conn.write(&frame)?;

        let mut events: u64 = 0;
        let mut warned_unknown = false;

        while self.conn.is_alive() {
            let header_bytes = match self.conn.read_exact(HEADER_SIZE)? {
                Some(bytes) => bytes,
                None => break, // clean end-of-stream
            };
            let header = ResponseHeader::decode(&header_bytes)?;
            let kind = EventKind::classify(header.opcode);

            // NOOP frames carry no body; do not attempt to read one
            if kind == EventKind::Noop {
                events += 1;
                sink.on_event(TapEvent::Noop);
                continue;
            }

            if let EventKind::Unknown(opcode) = kind {
                if !warned_unknown {
                    tracing::warn!(
                        "unrecognized opcode 0x{:02x} from {}; decoding by header lengths",
                        opcode,
                        self.conn.endpoint()
                    );
                    warned_unknown = true;
                }
            }

            let body = if header.body_len > 0 {
                match self.conn.read_exact(header.body_len as usize)? {
                    Some(bytes) => bytes,
                    None => {
                        return Err(TapError::Network(format!(
                            "{} closed the stream before a {}-byte frame body",
                            self.conn.endpoint(),
                            header.body_len
                        )))
                    }
                }
            } else {
                Bytes::new()
            };

            events += 1;
            sink.on_event(TapEvent::from_frame(&header, body)?);
        }

        tracing::debug!(
            "stream {:?} from {} ended after {} events",
            self.name,
            self.conn.endpoint(),
            events
        );
        Ok(())
    }

    /// The underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Tear down the stream and reclaim the endpoint
    pub fn into_endpoint(self) -> Endpoint {
        self.conn.into_endpoint()
    }
}
