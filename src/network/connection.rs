//! TAP Connection
//!
//! Owns one TCP socket bound to one endpoint. All waits are bounded: the
//! connect uses `TcpStream::connect_timeout` and every read is capped by
//! the socket read timeout. Any I/O failure marks the connection down,
//! which is terminal; a new run needs a fresh connect from the reclaimed
//! endpoint.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::{Bytes, BytesMut};

use crate::config::Config;
use crate::error::{Result, TapError};
use crate::network::Endpoint;

/// A live (or formerly live) connection to one TAP server
pub struct Connection {
    /// The socket; `None` once the connection is down
    stream: Option<TcpStream>,

    /// The endpoint this connection is bound to
    endpoint: Endpoint,

    /// Read timeout applied to the socket, kept for error messages
    read_timeout_ms: u64,
}

impl Connection {
    /// Connect to an endpoint
    ///
    /// Fails fast with `Down` if the endpoint failed within the current
    /// second (coarse 1-second backoff). Otherwise resolves the address,
    /// connects with a bounded wait, disables Nagle's algorithm, and arms
    /// the per-read timeout.
    pub fn connect(endpoint: Endpoint, config: &Config) -> Result<Self> {
        if endpoint.down_at == Some(epoch_seconds()) {
            return Err(TapError::Down(format!("{} is currently down", endpoint)));
        }

        let addr = (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|e| TapError::Network(format!("failed to resolve {}: {}", endpoint, e)))?
            .next()
            .ok_or_else(|| TapError::Network(format!("no addresses for {}", endpoint)))?;

        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);
        let stream = TcpStream::connect_timeout(&addr, connect_timeout).map_err(|e| {
            match e.kind() {
                ErrorKind::WouldBlock | ErrorKind::TimedOut => TapError::Timeout(format!(
                    "connect to {} did not complete within {}ms",
                    endpoint, config.connect_timeout_ms
                )),
                kind => TapError::Network(format!("connect to {} failed: {:?}: {}", endpoint, kind, e)),
            }
        })?;

        stream.set_nodelay(true)?;
        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }

        tracing::debug!("connected to {}", endpoint);

        Ok(Self {
            stream: Some(stream),
            endpoint,
            read_timeout_ms: config.read_timeout_ms,
        })
    }

    /// True iff the socket exists and has not been closed
    pub fn is_alive(&self) -> bool {
        self.stream.is_some()
    }

    /// The endpoint this connection is bound to
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Reclaim the endpoint (with its `down_at`) after the stream ends
    pub fn into_endpoint(self) -> Endpoint {
        self.endpoint
    }

    /// Mark the connection down
    ///
    /// Idempotent. Closes the socket (close errors are swallowed by the
    /// drop) and records the current epoch second on the endpoint.
    pub fn mark_down(&mut self) {
        if self.stream.take().is_some() {
            self.endpoint.down_at = Some(epoch_seconds());
            tracing::debug!("{} marked down", self.endpoint);
        }
    }

    /// Write the full buffer to the socket
    ///
    /// Any failure marks the connection down and raises with the
    /// underlying cause's kind and message.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let result = match self.stream.as_mut() {
            Some(stream) => stream.write_all(bytes),
            None => {
                return Err(TapError::Network(format!(
                    "{} is not connected",
                    self.endpoint
                )))
            }
        };

        if let Err(e) = result {
            self.mark_down();
            return Err(match e.kind() {
                ErrorKind::WouldBlock | ErrorKind::TimedOut => TapError::Timeout(format!(
                    "write to {} stalled: {}",
                    self.endpoint, e
                )),
                kind => TapError::Network(format!(
                    "write to {} failed: {:?}: {}",
                    self.endpoint, kind, e
                )),
            });
        }

        Ok(())
    }

    /// Read exactly `count` bytes, accumulating across partial reads
    ///
    /// Returns `Ok(None)` on a clean end-of-stream before any byte
    /// arrives (normal termination; the connection is marked down).
    /// A stall past the read timeout raises `Timeout`; an end-of-stream
    /// mid-accumulation or a reset/broken-pipe class failure raises
    /// `Network`. All failure paths mark the connection down.
    pub fn read_exact(&mut self, count: usize) -> Result<Option<Bytes>> {
        let mut buf = BytesMut::zeroed(count);
        let mut filled = 0;

        while filled < count {
            let result = match self.stream.as_mut() {
                Some(stream) => stream.read(&mut buf[filled..]),
                None => {
                    return Err(TapError::Network(format!(
                        "{} is not connected",
                        self.endpoint
                    )))
                }
            };

            match result {
                Ok(0) => {
                    self.mark_down();
                    if filled == 0 {
                        return Ok(None);
                    }
                    return Err(TapError::Network(format!(
                        "{} closed the stream after {} of {} bytes",
                        self.endpoint, filled, count
                    )));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    self.mark_down();
                    return Err(TapError::Timeout(format!(
                        "read from {} stalled for {}ms waiting for {} bytes",
                        self.endpoint, self.read_timeout_ms, count
                    )));
                }
                Err(e) => {
                    self.mark_down();
                    return Err(TapError::Network(format!(
                        "read from {} failed: {:?}: {}",
                        self.endpoint,
                        e.kind(),
                        e
                    )));
                }
            }
        }

        Ok(Some(buf.freeze()))
    }
}

/// Current time as whole epoch seconds
fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
