//! Device access session
//!
//! A [`Session`] owns the connection to the GPU management library (or the
//! mock fleet standing in for it), decides the session mode once at
//! construction, and answers per-metric queries through opaque
//! [`DeviceHandle`]s.
//!
//! Accessors return the raw outcome of each query. Deciding what a failure
//! degrades to is left to [`crate::services::Telemetry`].

mod handle;
mod worker;

pub use handle::DeviceHandle;

use crate::domain::{
    ComputeMode, FanSpeed, MemoryInfo, PerformanceState, PowerReading, Temperature, Utilization,
};
use crate::error::NvmlError;
use crate::mock::MockManager;
use crate::nvml::{GpuDevice, GpuManager, NvmlManager};
use worker::{Deadlines, Worker, QUEUE_DEPTH};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// How the session is backed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// NVML initialized; readings come from the hardware
    Real,
    /// Mock data, either requested or because no NVML library is installed
    Mock,
    /// NVML failed to initialize; serving mock data instead
    Fallback,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => write!(f, "real"),
            Self::Mock => write!(f, "mock"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Options for opening a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Serve mock data without touching NVML
    pub mock: bool,
    /// Upper bound on each query, counted from when it starts running
    pub query_timeout: Duration,
    /// Upper bound on waiting behind earlier queries
    pub queue_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mock: false,
            query_timeout: Duration::from_secs(2),
            queue_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of initializing the management library
pub type InitOutcome = Result<Box<dyn GpuManager>, NvmlError>;

/// An open device access session
pub struct Session {
    id: u64,
    mode: SessionMode,
    deadlines: Deadlines,
    worker: Worker,
}

impl Session {
    /// Open a session, deciding between real and mock mode
    ///
    /// Never fails because of NVML: any initialization failure falls back to
    /// mock data. Only failing to start the worker thread is an error.
    pub fn open(options: &SessionOptions) -> std::io::Result<Self> {
        Self::open_with(options, || {
            NvmlManager::new().map(|manager| Box::new(manager) as Box<dyn GpuManager>)
        })
    }

    /// Open a session with an explicit library initializer
    ///
    /// `init` is not called when mock mode is requested.
    pub fn open_with<F>(options: &SessionOptions, init: F) -> std::io::Result<Self>
    where
        F: FnOnce() -> InitOutcome,
    {
        if options.mock {
            log::info!("Mock mode requested, serving simulated GPU data");
            return Self::with_manager(
                SessionMode::Mock,
                Box::new(MockManager::default()),
                options,
            );
        }

        match init() {
            Ok(manager) => {
                log::info!("NVML initialized successfully");
                Self::with_manager(SessionMode::Real, manager, options)
            }
            Err(NvmlError::LibraryNotFound) => {
                log::info!("NVML library not found, serving simulated GPU data");
                Self::with_manager(SessionMode::Mock, Box::new(MockManager::default()), options)
            }
            Err(e) => {
                log::error!("Failed to initialize NVML: {}", e);
                log::warn!("No usable NVIDIA driver; running in limited mode with mock data");
                Self::with_manager(
                    SessionMode::Fallback,
                    Box::new(MockManager::default()),
                    options,
                )
            }
        }
    }

    /// Open a session over an explicit manager
    pub fn with_manager(
        mode: SessionMode,
        manager: Box<dyn GpuManager>,
        options: &SessionOptions,
    ) -> std::io::Result<Self> {
        let worker = Worker::spawn(manager, QUEUE_DEPTH)?;
        Ok(Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            mode,
            deadlines: Deadlines {
                queue: options.queue_timeout,
                query: options.query_timeout,
            },
            worker,
        })
    }

    /// Session mode decided at construction
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Whether a real NVML session is active
    pub fn is_real(&self) -> bool {
        self.mode == SessionMode::Real
    }

    /// Number of devices; `0` if the query fails
    pub fn device_count(&self) -> u32 {
        match self.worker.call(self.deadlines, |manager| manager.device_count()) {
            Ok(count) => count,
            Err(e) => {
                log::error!("Failed to get device count: {}", e);
                0
            }
        }
    }

    /// Resolve a device index to a handle; `None` if there is no such device
    pub fn device_handle(&self, index: u32) -> Option<DeviceHandle> {
        let lookup = self.worker.call(self.deadlines, move |manager| {
            manager.device_by_index(index).map(|_| ())
        });

        match lookup {
            Ok(()) => Some(DeviceHandle::new(self.id, index)),
            Err(e) => {
                log::error!("Failed to get device handle for device {}: {}", index, e);
                None
            }
        }
    }

    /// Driver version string
    pub fn driver_version(&self) -> Result<String, NvmlError> {
        self.worker
            .call(self.deadlines, |manager| manager.driver_version())
    }

    /// Run one query against the device behind `handle`
    fn query<T, F>(&self, handle: &DeviceHandle, query: F) -> Result<T, NvmlError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn GpuDevice) -> Result<T, NvmlError> + Send + 'static,
    {
        if handle.session_id() != self.id {
            return Err(NvmlError::InvalidHandle(handle.index()));
        }

        let index = handle.index();
        self.worker.call(self.deadlines, move |manager| {
            let device = manager.device_by_index(index)?;
            query(device.as_ref())
        })
    }

    pub fn name(&self, handle: &DeviceHandle) -> Result<String, NvmlError> {
        self.query(handle, |device| device.name())
    }

    pub fn uuid(&self, handle: &DeviceHandle) -> Result<String, NvmlError> {
        self.query(handle, |device| device.uuid())
    }

    pub fn memory_info(&self, handle: &DeviceHandle) -> Result<MemoryInfo, NvmlError> {
        self.query(handle, |device| device.memory_info())
    }

    pub fn utilization(&self, handle: &DeviceHandle) -> Result<Utilization, NvmlError> {
        self.query(handle, |device| device.utilization())
    }

    pub fn power_usage(&self, handle: &DeviceHandle) -> Result<PowerReading, NvmlError> {
        self.query(handle, |device| device.power_usage())
    }

    pub fn power_limit(&self, handle: &DeviceHandle) -> Result<PowerReading, NvmlError> {
        self.query(handle, |device| device.power_limit())
    }

    pub fn temperature(&self, handle: &DeviceHandle) -> Result<Temperature, NvmlError> {
        self.query(handle, |device| device.temperature())
    }

    pub fn fan_speed(&self, handle: &DeviceHandle) -> Result<FanSpeed, NvmlError> {
        self.query(handle, |device| device.fan_speed())
    }

    pub fn performance_state(&self, handle: &DeviceHandle) -> Result<PerformanceState, NvmlError> {
        self.query(handle, |device| device.performance_state())
    }

    pub fn compute_mode(&self, handle: &DeviceHandle) -> Result<ComputeMode, NvmlError> {
        self.query(handle, |device| device.compute_mode())
    }

    pub fn persistence_mode(&self, handle: &DeviceHandle) -> Result<bool, NvmlError> {
        self.query(handle, |device| device.persistence_mode())
    }

    /// Tear the session down, releasing NVML in real mode
    ///
    /// Dropping the session does the same; this makes the point explicit.
    pub fn shutdown(mut self) {
        log::debug!("Closing {} session {}", self.mode, self.id);
        self.worker.shutdown();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("deadlines", &self.deadlines)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceStatus;
    use crate::mock::{MockDevice, MOCK_NAME, MOCK_UUID};
    use crate::nvml::Metric;
    use crate::services::Telemetry;

    use std::sync::Arc;

    fn options() -> SessionOptions {
        SessionOptions {
            query_timeout: Duration::from_millis(500),
            ..SessionOptions::default()
        }
    }

    fn mock_session(manager: MockManager) -> Session {
        Session::with_manager(SessionMode::Mock, Box::new(manager), &options()).unwrap()
    }

    fn health_of(session: Session) -> (ServiceStatus, u32) {
        let report = Telemetry::new(Arc::new(session)).health();
        (report.status, report.gpu_count)
    }

    #[test]
    fn test_requested_mock_mode_skips_init() {
        let options = SessionOptions {
            mock: true,
            ..options()
        };
        let session =
            Session::open_with(&options, || unreachable!("init must not run")).unwrap();
        assert_eq!(session.mode(), SessionMode::Mock);
        assert!(!session.is_real());
        assert_eq!(session.device_count(), 1);
        assert_eq!(health_of(session), (ServiceStatus::Limited, 1));
    }

    #[test]
    fn test_successful_init_is_real() {
        let session = Session::open_with(&options(), || {
            Ok(Box::new(MockManager::new(2)) as Box<dyn GpuManager>)
        })
        .unwrap();
        assert_eq!(session.mode(), SessionMode::Real);
        assert!(session.is_real());
        assert_eq!(health_of(session), (ServiceStatus::Ok, 2));
    }

    #[test]
    fn test_missing_library_serves_mock_data() {
        let session = Session::open_with(&options(), || Err(NvmlError::LibraryNotFound)).unwrap();
        assert_eq!(session.mode(), SessionMode::Mock);
        assert_eq!(health_of(session), (ServiceStatus::Limited, 1));
    }

    #[test]
    fn test_failed_init_falls_back_to_mock_gpu() {
        let session = Session::open_with(&options(), || {
            Err(NvmlError::InitializationFailed("driver mismatch".to_string()))
        })
        .unwrap();
        assert_eq!(session.mode(), SessionMode::Fallback);

        let handle = session.device_handle(0).unwrap();
        assert_eq!(session.name(&handle).unwrap(), MOCK_NAME);
        assert_eq!(health_of(session), (ServiceStatus::Limited, 1));
    }

    #[test]
    fn test_mock_handles_only_for_index_zero() {
        let session = mock_session(MockManager::default());
        assert!(session.device_handle(0).is_some());
        assert!(session.device_handle(1).is_none());
        assert!(session.device_handle(u32::MAX).is_none());
    }

    #[test]
    fn test_accessors_report_outcomes() {
        let device = MockDevice::new(0).with_failure(Metric::FanSpeed);
        let session = mock_session(MockManager::with_devices(vec![device]));
        let handle = session.device_handle(0).unwrap();

        assert_eq!(session.uuid(&handle).unwrap(), MOCK_UUID);
        assert!(session.fan_speed(&handle).is_err());
        assert_eq!(session.temperature(&handle).unwrap().as_celsius(), 65);
    }

    #[test]
    fn test_count_after_slow_query() {
        let device =
            MockDevice::new(0).with_delay(Metric::PersistenceMode, Duration::from_millis(300));
        let options = SessionOptions {
            query_timeout: Duration::from_millis(50),
            ..SessionOptions::default()
        };
        let session = Session::with_manager(
            SessionMode::Mock,
            Box::new(MockManager::with_devices(vec![device])),
            &options,
        )
        .unwrap();
        let handle = session.device_handle(0).unwrap();

        assert_eq!(session.persistence_mode(&handle), Err(NvmlError::Timeout(50)));
        assert_eq!(session.device_count(), 1);
    }

    #[test]
    fn test_handle_from_other_session_is_rejected() {
        let first = mock_session(MockManager::default());
        let second = mock_session(MockManager::default());
        let foreign = first.device_handle(0).unwrap();

        assert_eq!(
            second.name(&foreign),
            Err(NvmlError::InvalidHandle(0))
        );
        assert!(first.name(&foreign).is_ok());
    }

    #[test]
    fn test_session_mode_display() {
        assert_eq!(SessionMode::Real.to_string(), "real");
        assert_eq!(SessionMode::Fallback.to_string(), "fallback");
    }
}
