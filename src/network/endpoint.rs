//! Endpoint addressing
//!
//! Parses `host[:port[:weight]]` address strings and tracks the last
//! failure time for the coarse down-state backoff.

use std::fmt;

use crate::error::{Result, TapError};

/// Default TAP port
pub const DEFAULT_PORT: u16 = 11210;

/// Default advisory weight
pub const DEFAULT_WEIGHT: u32 = 1;

/// A single TAP server address
///
/// `weight` is advisory (carried for future load distribution) and has no
/// effect on the protocol itself. `down_at` records the epoch second of
/// the last failure; a connect attempt within the same second fails fast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or IP address
    pub host: String,

    /// TCP port (default 11210)
    pub port: u16,

    /// Advisory weight (default 1)
    pub weight: u32,

    /// Epoch second of the last failure, if any
    pub down_at: Option<u64>,
}

impl Endpoint {
    /// Parse an address string of the form `host[:port[:weight]]`
    pub fn parse(address: &str) -> Result<Self> {
        let parts: Vec<&str> = address.split(':').collect();
        if parts.len() > 3 {
            return Err(TapError::Config(format!(
                "malformed address {:?}: expected host[:port[:weight]]",
                address
            )));
        }

        let host = parts[0];
        if host.is_empty() {
            return Err(TapError::Config(format!(
                "malformed address {:?}: empty host",
                address
            )));
        }

        let port = match parts.get(1) {
            Some(p) => p.parse::<u16>().map_err(|_| {
                TapError::Config(format!("malformed address {:?}: bad port {:?}", address, p))
            })?,
            None => DEFAULT_PORT,
        };

        let weight = match parts.get(2) {
            Some(w) => w.parse::<u32>().map_err(|_| {
                TapError::Config(format!(
                    "malformed address {:?}: bad weight {:?}",
                    address, w
                ))
            })?,
            None => DEFAULT_WEIGHT,
        };

        Ok(Self {
            host: host.to_string(),
            port,
            weight,
            down_at: None,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
