//! nvml-rest - REST API for NVIDIA GPU telemetry
//!
//! This library exposes GPU identity, memory, utilization, power and
//! thermal readings gathered through NVIDIA's NVML library. Metrics a
//! device cannot report degrade to null instead of failing the request.
//!
//! # Modules
//!
//! - [`api`]: HTTP routes and JSON error mapping
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models
//! - [`error`]: Error types
//! - [`mock`]: Simulated devices used when NVML is unavailable
//! - [`nvml`]: NVML abstraction layer
//! - [`services`]: Telemetry aggregation
//! - [`session`]: Process-wide NVML session

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod mock;
pub mod nvml;
pub mod services;
pub mod session;

pub use error::{AppError, Result};
