//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must exist and parse; without one the default
    /// locations are tried and silently skipped.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => {
                let config = ConfigFile::load(path)?;
                log::info!("Loaded config from {}", path);
                Some(config)
            }
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.config.general.verbose = true;
        }
        self
    }

    /// Override with CLI mock flag
    pub fn with_mock(mut self, mock: bool) -> Self {
        if mock {
            self.config.nvml.mock = true;
        }
        self
    }

    /// Override with CLI host
    pub fn with_host(mut self, host: Option<String>) -> Self {
        if let Some(h) = host {
            self.config.server.host = h;
        }
        self
    }

    /// Override with CLI port
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(p) = port {
            self.config.server.port = p;
        }
        self
    }

    /// Override with CLI --no-cors flag
    pub fn with_no_cors(mut self, no_cors: bool) -> Self {
        if no_cors {
            self.config.server.cors = false;
        }
        self
    }

    /// Override with CLI query timeout
    pub fn with_query_timeout(mut self, timeout_ms: Option<u64>) -> Self {
        if let Some(t) = timeout_ms {
            self.config.nvml.query_timeout_ms = t;
        }
        self
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
