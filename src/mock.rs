//! Mock implementations
//!
//! Provides the simulated GPU fleet served in mock mode, and fault injection
//! for exercising the degrade-to-null policy without real hardware.

use crate::domain::{
    ComputeMode, FanSpeed, MemoryInfo, PerformanceState, PowerReading, Temperature, Utilization,
};
use crate::error::NvmlError;
use crate::nvml::{GpuDevice, GpuManager, Metric};

use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Name reported by the mock GPU
pub const MOCK_NAME: &str = "NVIDIA Mock GPU";
/// UUID reported by the mock GPU
pub const MOCK_UUID: &str = "GPU-12345678-9abc-def0-1234-567890abcdef";
/// 16 GiB of framebuffer
pub const MOCK_MEMORY_TOTAL: u64 = 16 * 1024 * 1024 * 1024;
/// 8 GiB free
pub const MOCK_MEMORY_FREE: u64 = 8 * 1024 * 1024 * 1024;
/// 125.5 W
pub const MOCK_POWER_USAGE_MW: u32 = 125_500;
/// 250 W
pub const MOCK_POWER_LIMIT_MW: u32 = 250_000;

/// Mock GPU device
#[derive(Debug, Clone)]
pub struct MockDevice {
    index: u32,
    name: String,
    uuid: String,
    memory: MemoryInfo,
    utilization: Utilization,
    power_usage: PowerReading,
    power_limit: PowerReading,
    temperature: Temperature,
    fan_speed: FanSpeed,
    performance_state: PerformanceState,
    compute_mode: ComputeMode,
    persistence_mode: bool,
    failures: HashSet<Metric>,
    delays: HashMap<Metric, Duration>,
}

impl MockDevice {
    /// Create a new mock device with the standard mock readings
    pub fn new(index: u32) -> Self {
        Self {
            index,
            name: MOCK_NAME.to_string(),
            uuid: MOCK_UUID.to_string(),
            memory: MemoryInfo::from_total_free(MOCK_MEMORY_TOTAL, MOCK_MEMORY_FREE),
            utilization: Utilization::new(30, 25),
            power_usage: PowerReading::from_milliwatts(MOCK_POWER_USAGE_MW),
            power_limit: PowerReading::from_milliwatts(MOCK_POWER_LIMIT_MW),
            temperature: Temperature::new(65),
            fan_speed: FanSpeed::new(45),
            performance_state: PerformanceState::P0,
            compute_mode: ComputeMode::Default,
            persistence_mode: true,
            failures: HashSet::new(),
            delays: HashMap::new(),
        }
    }

    /// Builder: set compute mode
    pub fn with_compute_mode(mut self, mode: ComputeMode) -> Self {
        self.compute_mode = mode;
        self
    }

    /// Builder: make a metric fail with `NotSupported`
    pub fn with_failure(mut self, metric: Metric) -> Self {
        self.failures.insert(metric);
        self
    }

    /// Builder: make a metric take `delay` before answering
    pub fn with_delay(mut self, metric: Metric, delay: Duration) -> Self {
        self.delays.insert(metric, delay);
        self
    }

    fn check(&self, metric: Metric) -> Result<(), NvmlError> {
        if let Some(delay) = self.delays.get(&metric) {
            std::thread::sleep(*delay);
        }
        if self.failures.contains(&metric) {
            return Err(NvmlError::NotSupported(format!(
                "{} not available on mock GPU {}",
                metric, self.index
            )));
        }
        Ok(())
    }
}

impl GpuDevice for MockDevice {
    fn index(&self) -> u32 {
        self.index
    }

    fn name(&self) -> Result<String, NvmlError> {
        self.check(Metric::Name)?;
        Ok(self.name.clone())
    }

    fn uuid(&self) -> Result<String, NvmlError> {
        self.check(Metric::Uuid)?;
        Ok(self.uuid.clone())
    }

    fn memory_info(&self) -> Result<MemoryInfo, NvmlError> {
        self.check(Metric::Memory)?;
        Ok(self.memory)
    }

    fn utilization(&self) -> Result<Utilization, NvmlError> {
        self.check(Metric::Utilization)?;
        Ok(self.utilization)
    }

    fn power_usage(&self) -> Result<PowerReading, NvmlError> {
        self.check(Metric::PowerUsage)?;
        Ok(self.power_usage)
    }

    fn power_limit(&self) -> Result<PowerReading, NvmlError> {
        self.check(Metric::PowerLimit)?;
        Ok(self.power_limit)
    }

    fn temperature(&self) -> Result<Temperature, NvmlError> {
        self.check(Metric::Temperature)?;
        Ok(self.temperature)
    }

    fn fan_speed(&self) -> Result<FanSpeed, NvmlError> {
        self.check(Metric::FanSpeed)?;
        Ok(self.fan_speed)
    }

    fn performance_state(&self) -> Result<PerformanceState, NvmlError> {
        self.check(Metric::PerformanceState)?;
        Ok(self.performance_state)
    }

    fn compute_mode(&self) -> Result<ComputeMode, NvmlError> {
        self.check(Metric::ComputeMode)?;
        Ok(self.compute_mode)
    }

    fn persistence_mode(&self) -> Result<bool, NvmlError> {
        self.check(Metric::PersistenceMode)?;
        Ok(self.persistence_mode)
    }
}

/// Mock GPU manager
#[derive(Debug, Clone)]
pub struct MockManager {
    devices: Vec<MockDevice>,
    unreachable: HashSet<u32>,
    driver_version: String,
}

impl MockManager {
    /// Create a new mock manager with the specified number of devices
    pub fn new(device_count: u32) -> Self {
        Self::with_devices((0..device_count).map(MockDevice::new).collect())
    }

    /// Create a mock manager with custom devices
    pub fn with_devices(devices: Vec<MockDevice>) -> Self {
        Self {
            devices,
            unreachable: HashSet::new(),
            driver_version: "535.154.05".to_string(),
        }
    }

    /// Builder: keep `index` in the device count but fail its handle lookup
    pub fn with_unreachable(mut self, index: u32) -> Self {
        self.unreachable.insert(index);
        self
    }
}

impl Default for MockManager {
    /// The single-GPU fleet served in mock mode
    fn default() -> Self {
        Self::new(1)
    }
}

impl GpuManager for MockManager {
    fn device_count(&self) -> Result<u32, NvmlError> {
        Ok(self.devices.len() as u32)
    }

    fn device_by_index(&self, index: u32) -> Result<Box<dyn GpuDevice + '_>, NvmlError> {
        if self.unreachable.contains(&index) {
            return Err(NvmlError::GpuLost);
        }
        self.devices
            .get(index as usize)
            .map(|d| Box::new(d) as Box<dyn GpuDevice + '_>)
            .ok_or(NvmlError::DeviceNotFound(index))
    }

    fn driver_version(&self) -> Result<String, NvmlError> {
        Ok(self.driver_version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_device_readings() {
        let device = MockDevice::new(0);
        assert_eq!(device.index(), 0);
        assert_eq!(device.name().unwrap(), "NVIDIA Mock GPU");
        assert_eq!(device.uuid().unwrap(), MOCK_UUID);
        assert_eq!(device.memory_info().unwrap().total, 17_179_869_184);
        assert_eq!(device.memory_info().unwrap().used, 8_589_934_592);
        assert_eq!(device.power_usage().unwrap().as_watts(), 125.5);
        assert_eq!(device.power_limit().unwrap().as_watts(), 250.0);
        assert_eq!(device.performance_state().unwrap().to_string(), "P0");
        assert!(device.persistence_mode().unwrap());
    }

    #[test]
    fn test_mock_device_failure_injection() {
        let device = MockDevice::new(0).with_failure(Metric::Temperature);
        assert!(matches!(
            device.temperature(),
            Err(NvmlError::NotSupported(_))
        ));
        assert_eq!(device.fan_speed().unwrap().as_percentage(), 45);
    }

    #[test]
    fn test_mock_manager_device_by_index() {
        let manager = MockManager::new(2);
        assert_eq!(manager.device_count().unwrap(), 2);
        assert_eq!(manager.device_by_index(1).unwrap().index(), 1);
        assert!(matches!(
            manager.device_by_index(5),
            Err(NvmlError::DeviceNotFound(5))
        ));
    }

    #[test]
    fn test_mock_manager_unreachable_device() {
        let manager = MockManager::new(2).with_unreachable(1);
        assert_eq!(manager.device_count().unwrap(), 2);
        assert!(manager.device_by_index(0).is_ok());
        assert!(manager.device_by_index(1).is_err());
    }

    #[test]
    fn test_default_fleet_has_one_gpu() {
        let manager = MockManager::default();
        assert_eq!(manager.device_count().unwrap(), 1);
        assert!(manager.device_by_index(1).is_err());
    }
}
