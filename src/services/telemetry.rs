//! Telemetry aggregation
//!
//! Turns device indices into [`GpuInfo`] records. Each metric is fetched on
//! its own; a failing metric is logged and degrades to its default without
//! affecting the rest of the record.

use crate::domain::{GpuInfo, GpuList, HealthReport, MemoryInfo, Utilization};
use crate::error::NvmlError;
use crate::nvml::Metric;
use crate::session::{DeviceHandle, Session};

use std::sync::Arc;

/// Name and UUID reported when the query fails
pub const UNKNOWN: &str = "Unknown";

/// Read-only telemetry over a shared session
#[derive(Debug, Clone)]
pub struct Telemetry {
    session: Arc<Session>,
}

impl Telemetry {
    /// Create a telemetry service over `session`
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Number of devices in the session
    pub fn device_count(&self) -> u32 {
        self.session.device_count()
    }

    /// Validate a client-supplied device id against the current count
    pub fn checked_index(&self, device_id: i64) -> Option<u32> {
        u32::try_from(device_id)
            .ok()
            .filter(|&index| index < self.device_count())
    }

    /// Resolve a device index to a handle
    pub fn handle(&self, index: u32) -> Option<DeviceHandle> {
        self.session.device_handle(index)
    }

    /// Memory info for one device
    ///
    /// `None` only when the device does not exist; a failing query yields
    /// zeroed memory.
    pub fn memory_info(&self, index: u32) -> Option<MemoryInfo> {
        let handle = self.handle(index)?;
        Some(self.memory(&handle))
    }

    fn memory(&self, handle: &DeviceHandle) -> MemoryInfo {
        degrade(Metric::Memory, handle, self.session.memory_info(handle))
            .unwrap_or_else(MemoryInfo::zeroed)
    }

    /// Utilization, `None` if the query fails
    pub fn utilization(&self, handle: &DeviceHandle) -> Option<Utilization> {
        degrade(Metric::Utilization, handle, self.session.utilization(handle))
    }

    /// Assemble the full record for one device
    ///
    /// `None` means the device does not exist; a device that exists but
    /// fails some queries still yields a record with those fields empty.
    pub fn gpu_info(&self, index: u32) -> Option<GpuInfo> {
        let handle = self.handle(index)?;
        let session = &self.session;

        let memory = self.memory(&handle);
        let name = degrade(Metric::Name, &handle, session.name(&handle))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let uuid = degrade(Metric::Uuid, &handle, session.uuid(&handle))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let mut info = GpuInfo::new(index, name, uuid, memory);
        info.utilization = self.utilization(&handle);
        info.power_usage = degrade(Metric::PowerUsage, &handle, session.power_usage(&handle))
            .map(|p| p.as_watts());
        info.power_limit = degrade(Metric::PowerLimit, &handle, session.power_limit(&handle))
            .map(|p| p.as_watts());
        info.temperature = degrade(Metric::Temperature, &handle, session.temperature(&handle));
        info.fan_speed = degrade(Metric::FanSpeed, &handle, session.fan_speed(&handle));
        info.performance_state = degrade(
            Metric::PerformanceState,
            &handle,
            session.performance_state(&handle),
        );
        info.compute_mode = degrade(Metric::ComputeMode, &handle, session.compute_mode(&handle));
        info.persistence_mode = degrade(
            Metric::PersistenceMode,
            &handle,
            session.persistence_mode(&handle),
        );

        Some(info)
    }

    /// Records for every device, by ascending index
    ///
    /// `count` is the device count at call time. Devices whose handle cannot
    /// be resolved are left out of `gpus`, so `gpus.len()` may be smaller.
    pub fn all_gpus(&self) -> GpuList {
        let count = self.device_count();
        let gpus: Vec<GpuInfo> = (0..count).filter_map(|index| self.gpu_info(index)).collect();

        if gpus.len() < count as usize {
            log::warn!(
                "Assembled {} of {} GPU records; missing devices were skipped",
                gpus.len(),
                count
            );
        }

        GpuList { count, gpus }
    }

    /// Health report for the `/` endpoint
    pub fn health(&self) -> HealthReport {
        HealthReport::new(self.session.is_real(), self.device_count())
    }
}

/// Map a query outcome to an optional value, logging the failure
fn degrade<T>(metric: Metric, handle: &DeviceHandle, outcome: Result<T, NvmlError>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("Failed to get {} for {}: {}", metric, handle, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDevice, MockManager};
    use crate::session::{SessionMode, SessionOptions};

    use std::time::Duration;

    fn telemetry_with_timeout(manager: MockManager, query_timeout: Duration) -> Telemetry {
        let options = SessionOptions {
            query_timeout,
            ..SessionOptions::default()
        };
        let session = Session::with_manager(SessionMode::Mock, Box::new(manager), &options).unwrap();
        Telemetry::new(Arc::new(session))
    }

    fn telemetry(manager: MockManager) -> Telemetry {
        telemetry_with_timeout(manager, Duration::from_millis(500))
    }

    #[test]
    fn test_checked_index() {
        let telemetry = telemetry(MockManager::new(2));
        assert_eq!(telemetry.checked_index(0), Some(0));
        assert_eq!(telemetry.checked_index(1), Some(1));
        assert_eq!(telemetry.checked_index(2), None);
        assert_eq!(telemetry.checked_index(-1), None);
        assert_eq!(telemetry.checked_index(i64::MAX), None);
    }

    #[test]
    fn test_failed_memory_is_zeroed() {
        let device = MockDevice::new(0).with_failure(Metric::Memory);
        let telemetry = telemetry(MockManager::with_devices(vec![device]));

        let info = telemetry.gpu_info(0).unwrap();
        assert_eq!(info.memory, MemoryInfo::zeroed());
        assert_eq!(info.name, "NVIDIA Mock GPU");
    }

    #[test]
    fn test_memory_info_view() {
        let telemetry = telemetry(MockManager::new(2).with_unreachable(1));
        assert_eq!(telemetry.memory_info(0).map(|m| m.total_mb()), Some(16384));
        assert_eq!(telemetry.memory_info(1), None);
        assert_eq!(telemetry.memory_info(2), None);
    }

    #[test]
    fn test_failed_identity_is_unknown() {
        let device = MockDevice::new(0)
            .with_failure(Metric::Name)
            .with_failure(Metric::Uuid);
        let telemetry = telemetry(MockManager::with_devices(vec![device]));

        let info = telemetry.gpu_info(0).unwrap();
        assert_eq!(info.name, UNKNOWN);
        assert_eq!(info.uuid, UNKNOWN);
        assert_eq!(info.fan_speed.map(|f| f.as_percentage()), Some(45));
    }

    #[test]
    fn test_every_optional_metric_can_fail() {
        let device = Metric::ALL
            .iter()
            .fold(MockDevice::new(0), |d, &m| d.with_failure(m));
        let telemetry = telemetry(MockManager::with_devices(vec![device]));

        let info = telemetry.gpu_info(0).unwrap();
        assert_eq!(info, GpuInfo::new(0, UNKNOWN.into(), UNKNOWN.into(), MemoryInfo::zeroed()));
    }

    #[test]
    fn test_slow_metric_does_not_null_its_siblings() {
        let device =
            MockDevice::new(0).with_delay(Metric::Temperature, Duration::from_millis(400));
        let telemetry = telemetry_with_timeout(
            MockManager::with_devices(vec![device]),
            Duration::from_millis(100),
        );

        let info = telemetry.gpu_info(0).unwrap();
        assert_eq!(info.temperature, None);
        assert_eq!(info.fan_speed.map(|f| f.as_percentage()), Some(45));
        assert_eq!(
            info.performance_state.map(|p| p.to_string()),
            Some("P0".to_string())
        );
        assert_eq!(info.compute_mode, Some(crate::domain::ComputeMode::Default));
        assert_eq!(info.persistence_mode, Some(true));

        // The next request still sees the device
        assert_eq!(telemetry.device_count(), 1);
        assert_eq!(telemetry.health().gpu_count, 1);
    }

    #[test]
    fn test_all_gpus_skips_unreachable_devices() {
        let telemetry = telemetry(MockManager::new(3).with_unreachable(1));

        let list = telemetry.all_gpus();
        assert_eq!(list.count, 3);
        let ids: Vec<u32> = list.gpus.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_health_limited_in_mock_mode() {
        let telemetry = telemetry(MockManager::default());
        let report = telemetry.health();
        assert_eq!(report.status, crate::domain::ServiceStatus::Limited);
        assert_eq!(report.gpu_count, 1);
    }
}
