//! Configuration file loading
//!
//! Handles loading configuration from TOML files.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let mut config: Config = toml::from_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load configuration from the first default location that parses
    pub fn load_default() -> Option<Config> {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first of `paths` that exists and parses
    ///
    /// Files that exist but fail to load are reported and skipped.
    pub fn load_first(paths: &[PathBuf]) -> Option<Config> {
        paths
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load(path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Ignoring config file {}: {}", path.display(), e);
                    None
                }
            })
    }

    /// Get default configuration file paths
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // System-wide config
        paths.push(PathBuf::from("/etc/nvml-rest/config.toml"));

        // User config
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("nvml-rest/config.toml"));
        }

        // Current directory
        paths.push(PathBuf::from("nvml-rest.toml"));

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_paths_not_empty() {
        let paths = ConfigFile::default_paths();
        assert!(!paths.is_empty());
        assert_eq!(paths[0], PathBuf::from("/etc/nvml-rest/config.toml"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigFile::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9100\ncors = false").unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert!(!config.server.cors);
        assert_eq!(config.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_first_skips_broken_file() {
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        writeln!(broken, "[server\nport = ").unwrap();
        let mut valid = tempfile::NamedTempFile::new().unwrap();
        writeln!(valid, "[server]\nport = 9200").unwrap();

        let paths = vec![
            PathBuf::from("/nonexistent/nvml-rest.toml"),
            broken.path().to_path_buf(),
            valid.path().to_path_buf(),
        ];
        let config = ConfigFile::load_first(&paths).unwrap();
        assert_eq!(config.server.port, 9200);
        assert_eq!(config.source.as_deref(), Some(valid.path()));

        assert!(ConfigFile::load_first(&paths[..2]).is_none());
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        assert!(matches!(
            ConfigFile::load(file.path()),
            Err(ConfigError::TomlError(_))
        ));
    }
}
