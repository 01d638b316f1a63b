//! Service layer
//!
//! Business logic on top of the device session.

pub mod telemetry;

pub use telemetry::Telemetry;
