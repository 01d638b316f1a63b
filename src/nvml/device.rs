//! NVML device implementation
//!
//! Real implementation of GpuDevice trait using nvml-wrapper.

use crate::domain::{
    ComputeMode, FanSpeed, MemoryInfo, PerformanceState, PowerReading, Temperature, Utilization,
};
use crate::error::NvmlError;
use crate::nvml::traits::GpuDevice;

use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
use nvml_wrapper::Device;

/// NVML device wrapper implementing GpuDevice trait
pub struct NvmlDevice<'a> {
    device: Device<'a>,
    index: u32,
}

impl<'a> NvmlDevice<'a> {
    /// Create a new NVML device wrapper
    pub fn new(device: Device<'a>, index: u32) -> Self {
        Self { device, index }
    }

    /// Convert NVML error to our error type
    pub(crate) fn convert_error(err: nvml_wrapper::error::NvmlError) -> NvmlError {
        use nvml_wrapper::error::NvmlError as NE;
        match err {
            NE::NotSupported => {
                NvmlError::NotSupported("Operation not supported by this GPU".to_string())
            }
            NE::NoPermission => {
                NvmlError::InsufficientPermissions("Insufficient permissions".to_string())
            }
            NE::GpuLost => NvmlError::GpuLost,
            _ => NvmlError::Unknown(err.to_string()),
        }
    }
}

impl GpuDevice for NvmlDevice<'_> {
    fn index(&self) -> u32 {
        self.index
    }

    fn name(&self) -> Result<String, NvmlError> {
        self.device.name().map_err(Self::convert_error)
    }

    fn uuid(&self) -> Result<String, NvmlError> {
        self.device.uuid().map_err(Self::convert_error)
    }

    fn memory_info(&self) -> Result<MemoryInfo, NvmlError> {
        let mem = self.device.memory_info().map_err(Self::convert_error)?;

        Ok(MemoryInfo::new(mem.total, mem.free, mem.used))
    }

    fn utilization(&self) -> Result<Utilization, NvmlError> {
        let util = self
            .device
            .utilization_rates()
            .map_err(Self::convert_error)?;

        Ok(Utilization::new(util.gpu, util.memory))
    }

    fn power_usage(&self) -> Result<PowerReading, NvmlError> {
        let usage_mw = self.device.power_usage().map_err(Self::convert_error)?;
        Ok(PowerReading::from_milliwatts(usage_mw))
    }

    fn power_limit(&self) -> Result<PowerReading, NvmlError> {
        let limit_mw = self
            .device
            .power_management_limit()
            .map_err(Self::convert_error)?;
        Ok(PowerReading::from_milliwatts(limit_mw))
    }

    fn temperature(&self) -> Result<Temperature, NvmlError> {
        let temp = self
            .device
            .temperature(TemperatureSensor::Gpu)
            .map_err(Self::convert_error)?;
        Ok(Temperature::new(temp))
    }

    fn fan_speed(&self) -> Result<FanSpeed, NvmlError> {
        let speed = self.device.fan_speed(0).map_err(Self::convert_error)?;
        Ok(FanSpeed::new(speed))
    }

    fn performance_state(&self) -> Result<PerformanceState, NvmlError> {
        let state = self
            .device
            .performance_state()
            .map_err(Self::convert_error)?;

        // nvml-wrapper returns PerformanceState enum, convert to our type
        match PerformanceState::from_raw(state as u32) {
            PerformanceState::Unknown => Err(NvmlError::Unknown(
                "Driver reported an unknown performance state".to_string(),
            )),
            known => Ok(known),
        }
    }

    fn compute_mode(&self) -> Result<ComputeMode, NvmlError> {
        use nvml_wrapper::enum_wrappers::device::ComputeMode as NvmlComputeMode;

        match self.device.compute_mode() {
            Ok(NvmlComputeMode::Default) => Ok(ComputeMode::Default),
            Ok(NvmlComputeMode::ExclusiveThread) => Ok(ComputeMode::ExclusiveThread),
            Ok(NvmlComputeMode::Prohibited) => Ok(ComputeMode::Prohibited),
            Ok(NvmlComputeMode::ExclusiveProcess) => Ok(ComputeMode::ExclusiveProcess),
            // Codes newer than the bindings arrive as UnexpectedVariant
            Err(nvml_wrapper::error::NvmlError::UnexpectedVariant(code)) => {
                Ok(ComputeMode::from_raw(code))
            }
            Err(e) => Err(Self::convert_error(e)),
        }
    }

    fn persistence_mode(&self) -> Result<bool, NvmlError> {
        self.device
            .is_in_persistent_mode()
            .map_err(Self::convert_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_error() {
        use nvml_wrapper::error::NvmlError as NE;

        assert!(matches!(
            NvmlDevice::convert_error(NE::NotSupported),
            NvmlError::NotSupported(_)
        ));
        assert!(matches!(
            NvmlDevice::convert_error(NE::NoPermission),
            NvmlError::InsufficientPermissions(_)
        ));
        assert_eq!(NvmlDevice::convert_error(NE::GpuLost), NvmlError::GpuLost);
        assert!(matches!(
            NvmlDevice::convert_error(NE::Unknown),
            NvmlError::Unknown(_)
        ));
    }
}
