//! Trait definitions for GPU queries
//!
//! These traits abstract over NVML so the session can be driven by the real
//! library or by the mock fleet.

use crate::domain::{
    ComputeMode, FanSpeed, MemoryInfo, PerformanceState, PowerReading, Temperature, Utilization,
};
use crate::error::NvmlError;

/// Read-only queries against one GPU
///
/// Every accessor reports its own outcome; a failure in one says nothing
/// about the others.
pub trait GpuDevice {
    /// Get the GPU index
    fn index(&self) -> u32;

    /// Get the GPU name
    fn name(&self) -> Result<String, NvmlError>;

    /// Get the GPU UUID
    fn uuid(&self) -> Result<String, NvmlError>;

    /// Get memory (VRAM) information
    fn memory_info(&self) -> Result<MemoryInfo, NvmlError>;

    /// Get GPU and memory utilization rates
    fn utilization(&self) -> Result<Utilization, NvmlError>;

    /// Get current power draw
    fn power_usage(&self) -> Result<PowerReading, NvmlError>;

    /// Get power management limit
    fn power_limit(&self) -> Result<PowerReading, NvmlError>;

    /// Get current core temperature
    fn temperature(&self) -> Result<Temperature, NvmlError>;

    /// Get speed of the first fan
    fn fan_speed(&self) -> Result<FanSpeed, NvmlError>;

    /// Get current performance state (P-state)
    fn performance_state(&self) -> Result<PerformanceState, NvmlError>;

    /// Get compute mode
    fn compute_mode(&self) -> Result<ComputeMode, NvmlError>;

    /// Get whether persistence mode is enabled
    fn persistence_mode(&self) -> Result<bool, NvmlError>;
}

impl<T: GpuDevice + ?Sized> GpuDevice for &T {
    fn index(&self) -> u32 {
        (**self).index()
    }

    fn name(&self) -> Result<String, NvmlError> {
        (**self).name()
    }

    fn uuid(&self) -> Result<String, NvmlError> {
        (**self).uuid()
    }

    fn memory_info(&self) -> Result<MemoryInfo, NvmlError> {
        (**self).memory_info()
    }

    fn utilization(&self) -> Result<Utilization, NvmlError> {
        (**self).utilization()
    }

    fn power_usage(&self) -> Result<PowerReading, NvmlError> {
        (**self).power_usage()
    }

    fn power_limit(&self) -> Result<PowerReading, NvmlError> {
        (**self).power_limit()
    }

    fn temperature(&self) -> Result<Temperature, NvmlError> {
        (**self).temperature()
    }

    fn fan_speed(&self) -> Result<FanSpeed, NvmlError> {
        (**self).fan_speed()
    }

    fn performance_state(&self) -> Result<PerformanceState, NvmlError> {
        (**self).performance_state()
    }

    fn compute_mode(&self) -> Result<ComputeMode, NvmlError> {
        (**self).compute_mode()
    }

    fn persistence_mode(&self) -> Result<bool, NvmlError> {
        (**self).persistence_mode()
    }
}

/// Trait for discovering GPUs
///
/// Object safe: the session worker owns a `Box<dyn GpuManager>` and never
/// learns whether it is talking to NVML or to the mock fleet.
pub trait GpuManager: Send {
    /// Get the number of GPU devices
    fn device_count(&self) -> Result<u32, NvmlError>;

    /// Get a device by index
    fn device_by_index(&self, index: u32) -> Result<Box<dyn GpuDevice + '_>, NvmlError>;

    /// Get driver version
    fn driver_version(&self) -> Result<String, NvmlError>;

    /// Release the underlying library session
    fn shutdown(self: Box<Self>) -> Result<(), NvmlError> {
        Ok(())
    }
}
