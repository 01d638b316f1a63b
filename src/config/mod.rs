//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::error::ConfigError;
use crate::session::SessionOptions;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// NVML session settings
    pub nvml: NvmlConfig,
    /// File this configuration was loaded from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.bind_addr()?;
        for (key, value) in [
            ("nvml.query_timeout_ms", self.nvml.query_timeout_ms),
            ("nvml.queue_timeout_ms", self.nvml.queue_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// General configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allow cross-origin requests from any origin
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::InvalidValue {
            key: "server.host".to_string(),
            message: format!("'{}' is not an IP address", self.host),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// NVML session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NvmlConfig {
    /// Serve mock data instead of querying NVML
    pub mock: bool,
    /// Upper bound on each device query in milliseconds, once it runs
    pub query_timeout_ms: u64,
    /// Upper bound on waiting behind earlier queries in milliseconds
    pub queue_timeout_ms: u64,
}

impl Default for NvmlConfig {
    fn default() -> Self {
        Self {
            mock: false,
            query_timeout_ms: 2000,
            queue_timeout_ms: 5000,
        }
    }
}

impl NvmlConfig {
    /// Convert to session options
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            mock: self.mock,
            query_timeout: Duration::from_millis(self.query_timeout_ms),
            queue_timeout: Duration::from_millis(self.queue_timeout_ms),
        }
    }
}
