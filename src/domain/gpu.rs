//! GPU information domain type
//!
//! Provides the GpuInfo record served for each device and the GpuList
//! returned for the whole fleet.

use crate::domain::{
    ComputeMode, FanSpeed, MemoryInfo, PerformanceState, Temperature, Utilization,
};
use serde::Serialize;
use std::fmt;

/// Full telemetry snapshot for one GPU
///
/// `memory` is always present (zeroed when the query failed); every other
/// metric is `None` when the device does not support it or the query failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuInfo {
    /// GPU index (0-based, stable for the process lifetime only)
    pub id: u32,
    /// GPU name (e.g., "NVIDIA GeForce RTX 4090")
    pub name: String,
    /// Vendor-assigned GPU UUID
    pub uuid: String,
    /// Framebuffer memory
    pub memory: MemoryInfo,
    /// GPU and memory utilization
    pub utilization: Option<Utilization>,
    /// Current power draw in watts
    pub power_usage: Option<f64>,
    /// Power management limit in watts
    pub power_limit: Option<f64>,
    /// Core temperature in Celsius
    pub temperature: Option<Temperature>,
    /// Fan speed percentage
    pub fan_speed: Option<FanSpeed>,
    /// Current P-state
    pub performance_state: Option<PerformanceState>,
    /// Compute mode
    pub compute_mode: Option<ComputeMode>,
    /// Whether persistence mode is enabled
    pub persistence_mode: Option<bool>,
}

impl GpuInfo {
    /// Create a record with only the required fields populated
    pub fn new(id: u32, name: String, uuid: String, memory: MemoryInfo) -> Self {
        Self {
            id,
            name,
            uuid,
            memory,
            utilization: None,
            power_usage: None,
            power_limit: None,
            temperature: None,
            fan_speed: None,
            performance_state: None,
            compute_mode: None,
            persistence_mode: None,
        }
    }

    /// Get a short display name
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("NVIDIA ").unwrap_or(&self.name)
    }
}

impl fmt::Display for GpuInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.name)
    }
}

/// All GPUs on the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuList {
    /// Number of devices reported by the driver
    pub count: u32,
    /// Records that could be assembled, ordered by index
    pub gpus: Vec<GpuInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GpuInfo {
        GpuInfo::new(
            0,
            "NVIDIA GeForce RTX 4090".to_string(),
            "GPU-xxx".to_string(),
            MemoryInfo::new(10, 4, 6),
        )
    }

    #[test]
    fn test_gpu_info_display() {
        assert_eq!(sample().to_string(), "[0] NVIDIA GeForce RTX 4090");
        assert_eq!(sample().short_name(), "GeForce RTX 4090");
    }

    #[test]
    fn test_missing_metrics_serialize_as_null() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], 0);
        assert_eq!(value["memory"]["used"], 6);
        assert!(value["utilization"].is_null());
        assert!(value["power_usage"].is_null());
        assert!(value["temperature"].is_null());
        assert!(value["persistence_mode"].is_null());
    }

    #[test]
    fn test_populated_metrics_serialize_flat() {
        let mut info = sample();
        info.utilization = Some(Utilization::new(30, 25));
        info.power_usage = Some(125.5);
        info.temperature = Some(Temperature::new(65));
        info.fan_speed = Some(FanSpeed::new(45));
        info.performance_state = Some(PerformanceState::P0);
        info.compute_mode = Some(ComputeMode::Default);

        let value = serde_json::to_value(info).unwrap();
        assert_eq!(value["utilization"]["gpu"], 30);
        assert_eq!(value["power_usage"], 125.5);
        assert_eq!(value["temperature"], 65);
        assert_eq!(value["fan_speed"], 45);
        assert_eq!(value["performance_state"], "P0");
        assert_eq!(value["compute_mode"], "Default");
    }
}
