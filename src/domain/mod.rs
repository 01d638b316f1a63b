//! Domain models for nvml-rest
//!
//! Value types shared by the device layer, the telemetry service and the
//! HTTP surface. All of them serialize to the JSON shapes served by the API.

pub mod compute;
pub mod fan;
pub mod gpu;
pub mod health;
pub mod memory;
pub mod performance;
pub mod power;
pub mod thermal;

pub use compute::ComputeMode;
pub use fan::FanSpeed;
pub use gpu::{GpuInfo, GpuList};
pub use health::{HealthReport, ServiceStatus};
pub use memory::MemoryInfo;
pub use performance::{PerformanceState, Utilization};
pub use power::PowerReading;
pub use thermal::Temperature;
