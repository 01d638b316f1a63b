//! Unified error types for nvml-rest
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from NVML operations
    #[error("NVML error: {0}")]
    Nvml(#[from] NvmlError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// GPU not found by index
    #[error("GPU not found: {0}")]
    GpuNotFound(u32),

    /// HTTP server failure (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// IO error (file operations, sockets)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from NVML wrapper operations
///
/// Every per-metric accessor reports its outcome with this type; the
/// telemetry service decides what a failure degrades to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NvmlError {
    /// Failed to initialize NVML library
    #[error("Failed to initialize NVML: {0}")]
    InitializationFailed(String),

    /// NVML library not found
    #[error("NVML library not found. Is the NVIDIA driver installed?")]
    LibraryNotFound,

    /// Device not found at index
    #[error("GPU device not found at index {0}")]
    DeviceNotFound(u32),

    /// Handle was issued by another session or the session is gone
    #[error("Invalid device handle for GPU {0}")]
    InvalidHandle(u32),

    /// Operation not supported by this GPU
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Insufficient permissions
    #[error("Insufficient permissions: {0}")]
    InsufficientPermissions(String),

    /// GPU is lost (fallen off bus, etc.)
    #[error("GPU is lost or has become inaccessible")]
    GpuLost,

    /// The query did not complete within the configured timeout
    #[error("Query timed out after {0} ms")]
    Timeout(u64),

    /// The session queue is full or the worker did not pick the query up in time
    #[error("NVML session is busy")]
    Busy,

    /// The session worker has stopped
    #[error("NVML session is closed")]
    SessionClosed,

    /// Unknown NVML error
    #[error("NVML error: {0}")]
    Unknown(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
