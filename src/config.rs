//! Configuration for tapstream
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a tapstream client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// How long to wait for a TCP connect to complete (milliseconds)
    pub connect_timeout_ms: u64,

    /// How long a single read may stall before the connection is
    /// considered dead (milliseconds, 0 disables the bound)
    pub read_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Checkpoint Configuration
    // -------------------------------------------------------------------------
    /// Directory for file-backed checkpoint records
    pub checkpoint_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 15_000,
            read_timeout_ms: 15_000,
            checkpoint_dir: PathBuf::from("./tapstream_data"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the per-read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the checkpoint directory
    pub fn checkpoint_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.checkpoint_dir = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
