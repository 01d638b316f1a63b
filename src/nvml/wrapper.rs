//! NVML manager implementation
//!
//! Provides the main interface for NVML initialization and device discovery.

use crate::error::NvmlError;
use crate::nvml::device::NvmlDevice;
use crate::nvml::traits::{GpuDevice, GpuManager};

use nvml_wrapper::Nvml;

/// NVML manager for GPU discovery
pub struct NvmlManager {
    nvml: Nvml,
}

impl NvmlManager {
    /// Initialize NVML and create a new manager
    pub fn new() -> Result<Self, NvmlError> {
        let nvml = Nvml::init().map_err(|e| match e {
            nvml_wrapper::error::NvmlError::LibloadingError(_) => NvmlError::LibraryNotFound,
            nvml_wrapper::error::NvmlError::DriverNotLoaded => {
                NvmlError::InitializationFailed("NVIDIA driver not loaded".to_string())
            }
            other => NvmlError::InitializationFailed(other.to_string()),
        })?;

        Ok(Self { nvml })
    }
}

impl GpuManager for NvmlManager {
    fn device_count(&self) -> Result<u32, NvmlError> {
        self.nvml
            .device_count()
            .map_err(|e| NvmlError::Unknown(e.to_string()))
    }

    fn device_by_index(&self, index: u32) -> Result<Box<dyn GpuDevice + '_>, NvmlError> {
        let device = self.nvml.device_by_index(index).map_err(|e| match e {
            nvml_wrapper::error::NvmlError::NotFound
            | nvml_wrapper::error::NvmlError::InvalidArg => NvmlError::DeviceNotFound(index),
            other => NvmlDevice::convert_error(other),
        })?;

        Ok(Box::new(NvmlDevice::new(device, index)))
    }

    fn driver_version(&self) -> Result<String, NvmlError> {
        self.nvml
            .sys_driver_version()
            .map_err(|e| NvmlError::Unknown(e.to_string()))
    }

    fn shutdown(self: Box<Self>) -> Result<(), NvmlError> {
        self.nvml
            .shutdown()
            .map_err(|e| NvmlError::Unknown(e.to_string()))
    }
}
