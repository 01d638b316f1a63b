//! Session worker thread
//!
//! The worker owns the GPU manager. Queries are shipped to it as closures and
//! answered over a per-query reply channel, so access to the library is
//! serialized and every caller can stop waiting after its timeout.
//!
//! A caller waits in two phases: first for the worker to pick its job up
//! (bounded by the queue timeout), then for the job itself (bounded by the
//! query timeout, measured from the moment the job starts). A job whose
//! caller already gave up is dropped without touching the library.

use crate::error::NvmlError;
use crate::nvml::GpuManager;

use std::sync::mpsc::{self, RecvTimeoutError, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

type Job = Box<dyn FnOnce(&dyn GpuManager) + Send>;

/// Queries accepted ahead of the one running
pub(crate) const QUEUE_DEPTH: usize = 64;

enum Reply<T> {
    Started,
    Done(Result<T, NvmlError>),
}

/// Bounds on how long a caller waits
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadlines {
    /// Waiting for the worker to start the job
    pub(crate) queue: Duration,
    /// Waiting for a started job to finish
    pub(crate) query: Duration,
}

pub(crate) struct Worker {
    sender: Option<SyncSender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start the worker thread, moving `manager` onto it
    pub(crate) fn spawn(manager: Box<dyn GpuManager>, depth: usize) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::sync_channel::<Job>(depth.max(1));

        let handle = thread::Builder::new()
            .name("nvml-session".to_string())
            .spawn(move || {
                log::debug!("NVML session worker started");
                for job in receiver {
                    job(manager.as_ref());
                }

                match manager.shutdown() {
                    Ok(()) => log::info!("NVML session shut down"),
                    Err(e) => log::error!("Failed to shut down NVML: {}", e),
                }
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Run `query` on the worker within `deadlines`
    pub(crate) fn call<T, F>(&self, deadlines: Deadlines, query: F) -> Result<T, NvmlError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn GpuManager) -> Result<T, NvmlError> + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(NvmlError::SessionClosed)?;
        // Room for both replies, so the worker never blocks on a reply
        let (reply_tx, reply_rx) = mpsc::sync_channel(2);

        let job: Job = Box::new(move |manager| {
            if reply_tx.send(Reply::Started).is_err() {
                log::debug!("Skipping query abandoned by its caller");
                return;
            }
            let _ = reply_tx.send(Reply::Done(query(manager)));
        });

        sender.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => NvmlError::Busy,
            TrySendError::Disconnected(_) => NvmlError::SessionClosed,
        })?;

        match reply_rx.recv_timeout(deadlines.queue) {
            Ok(Reply::Started) => {}
            Ok(Reply::Done(outcome)) => return outcome,
            Err(RecvTimeoutError::Timeout) => return Err(NvmlError::Busy),
            Err(RecvTimeoutError::Disconnected) => return Err(NvmlError::SessionClosed),
        }

        match reply_rx.recv_timeout(deadlines.query) {
            Ok(Reply::Done(outcome)) => outcome,
            Ok(Reply::Started) | Err(RecvTimeoutError::Disconnected) => {
                Err(NvmlError::SessionClosed)
            }
            Err(RecvTimeoutError::Timeout) => {
                Err(NvmlError::Timeout(deadlines.query.as_millis() as u64))
            }
        }
    }

    /// Stop accepting queries, drain the queue and join the thread
    pub(crate) fn shutdown(&mut self) {
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("NVML session worker panicked");
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDevice, MockManager};
    use crate::nvml::Metric;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    fn deadlines(queue_ms: u64, query_ms: u64) -> Deadlines {
        Deadlines {
            queue: Duration::from_millis(queue_ms),
            query: Duration::from_millis(query_ms),
        }
    }

    fn sleep_job(ms: u64) -> impl FnOnce(&dyn GpuManager) -> Result<(), NvmlError> + Send {
        move |_| {
            thread::sleep(Duration::from_millis(ms));
            Ok(())
        }
    }

    #[test]
    fn test_call_returns_outcome() {
        let worker = Worker::spawn(Box::new(MockManager::new(3)), QUEUE_DEPTH).unwrap();
        let count = worker.call(deadlines(1000, 1000), |m| m.device_count());
        assert_eq!(count, Ok(3));
    }

    #[test]
    fn test_call_times_out() {
        let slow = MockDevice::new(0).with_delay(Metric::Name, Duration::from_millis(300));
        let worker =
            Worker::spawn(Box::new(MockManager::with_devices(vec![slow])), QUEUE_DEPTH).unwrap();

        let outcome = worker.call(deadlines(1000, 20), |m| m.device_by_index(0)?.name());
        assert_eq!(outcome, Err(NvmlError::Timeout(20)));
    }

    #[test]
    fn test_query_timeout_starts_when_job_runs() {
        let worker = Worker::spawn(Box::new(MockManager::default()), QUEUE_DEPTH).unwrap();

        assert_eq!(
            worker.call(deadlines(1000, 50), sleep_job(250)),
            Err(NvmlError::Timeout(50))
        );
        // Queued behind the overrunning job; its own clock has not started yet
        assert_eq!(
            worker.call(deadlines(1000, 50), |m| m.device_count()),
            Ok(1)
        );
    }

    #[test]
    fn test_abandoned_job_is_skipped() {
        let worker = Worker::spawn(Box::new(MockManager::default()), QUEUE_DEPTH).unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        assert!(worker.call(deadlines(1000, 10), sleep_job(200)).is_err());

        let counter = Arc::clone(&runs);
        let abandoned = worker.call(deadlines(10, 1000), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert_eq!(abandoned, Err(NvmlError::Busy));

        let counter = Arc::clone(&runs);
        let seen = worker.call(deadlines(1000, 1000), move |_| {
            Ok(counter.load(Ordering::SeqCst))
        });
        assert_eq!(seen, Ok(0));
    }

    #[test]
    fn test_full_queue_rejects_immediately() {
        let worker = Worker::spawn(Box::new(MockManager::default()), 1).unwrap();

        // Occupy the worker, then fill the single queue slot
        assert!(worker.call(deadlines(1000, 10), sleep_job(300)).is_err());
        assert_eq!(
            worker.call(deadlines(10, 10), |m| m.device_count()),
            Err(NvmlError::Busy)
        );

        let started = Instant::now();
        assert_eq!(
            worker.call(deadlines(1000, 1000), |m| m.device_count()),
            Err(NvmlError::Busy)
        );
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn test_call_after_shutdown_is_rejected() {
        let mut worker = Worker::spawn(Box::new(MockManager::default()), QUEUE_DEPTH).unwrap();
        worker.shutdown();

        let outcome = worker.call(deadlines(1000, 1000), |m| m.device_count());
        assert_eq!(outcome, Err(NvmlError::SessionClosed));
    }
}
