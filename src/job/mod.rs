//! # Print Job Executor
//!
//! Runs one job against one device and reports exactly one [`PrintResult`].
//!
//! ## States
//!
//! ```text
//! Idle → Connecting → Connected → Writing → Cutting → Closed
//!   └──────────┴───────────┴──────────┴─────────→ Failed(reason)
//! ```
//!
//! - The operation list is encoded before the device is touched, so a bad
//!   receipt fails without any I/O.
//! - Opening is bounded by the connection timeout; writing by the transport's
//!   fixed write timeout. Nothing is retried.
//! - Once opened, the connection is closed on every path before the result
//!   is produced. A close failure after a successful print is appended to
//!   the message as a warning; after a failure it is logged and the
//!   original reason is kept.
//! - Jobs for the same device key wait for each other ([`DeviceLocks`]).
//!   The connect timeout starts once the device is acquired.
//! - An open that outlives the connect timeout keeps the device held until
//!   it settles; whatever it opened is closed before the next job starts.
//! - Each job runs as its own task. A caller that stops waiting does not
//!   stop the job, so an opened device is still closed.

mod locks;

pub use locks::DeviceLocks;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::OwnedMutexGuard;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::catalog::DeviceDescriptor;
use crate::error::PrintError;
use crate::ir::{PrintOperation, encode};
use crate::printer::PrinterProfile;
use crate::receipt::{Receipt, compose, test_page};
use crate::transport::{Connection, Transport};

/// Connect timeout when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// How long a timed-out open may keep the device held before it is abandoned.
const LATE_OPEN_GRACE: Duration = Duration::from_secs(10);

pub const RECEIPT_PRINTED: &str = "Receipt printed successfully!";
pub const TEST_SUCCEEDED: &str = "Printer test successful!";

/// Everything needed to reach one printer for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    pub profile: PrinterProfile,
    pub device: DeviceDescriptor,
    pub timeout: Duration,
}

impl ConnectionSpec {
    pub fn new(profile: PrinterProfile, device: DeviceDescriptor) -> Self {
        Self {
            profile,
            device,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Connecting,
    Connected,
    Writing,
    Cutting,
    Closed,
    Failed(PrintError),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Closed | JobState::Failed(_))
    }
}

/// Caller-facing outcome of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintResult {
    pub success: bool,
    pub message: String,
}

impl PrintResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(err: &PrintError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
        }
    }
}

impl From<PrintError> for PrintResult {
    fn from(err: PrintError) -> Self {
        Self::failure(&err)
    }
}

/// Result plus the states the job passed through.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub result: PrintResult,
    pub states: Vec<JobState>,
}

/// Runs jobs over a shared transport.
#[derive(Clone)]
pub struct JobExecutor {
    transport: Arc<dyn Transport>,
    locks: DeviceLocks,
}

impl JobExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            locks: DeviceLocks::new(),
        }
    }

    /// Compose, encode and print a receipt.
    pub async fn run_job(&self, spec: ConnectionSpec, receipt: &Receipt) -> JobOutcome {
        self.run_operations(spec, compose(receipt), RECEIPT_PRINTED)
            .await
    }

    /// Open, check liveness, print the test page, close.
    pub async fn test_connection(&self, spec: ConnectionSpec) -> JobOutcome {
        self.run_operations(spec, test_page(), TEST_SUCCEEDED).await
    }

    /// Run an arbitrary operation list; `success` is the message on success.
    pub async fn run_operations(
        &self,
        spec: ConnectionSpec,
        ops: Vec<PrintOperation>,
        success: &'static str,
    ) -> JobOutcome {
        let job_id = Uuid::new_v4();
        let span = info_span!(
            "print_job",
            %job_id,
            device = %spec.device.path,
            profile = %spec.profile
        );
        let job = Job {
            transport: Arc::clone(&self.transport),
            locks: self.locks.clone(),
            spec,
            ops,
            success,
            states: vec![JobState::Idle],
        };

        match tokio::spawn(job.execute().instrument(span)).await {
            Ok(outcome) => outcome,
            Err(e) => JobOutcome {
                result: PrintResult {
                    success: false,
                    message: format!("print job aborted: {}", e),
                },
                states: Vec::new(),
            },
        }
    }
}

type OpenTask = JoinHandle<Result<Box<dyn Connection>, PrintError>>;

/// Wait for an open that outlived the connect timeout, close whatever it
/// produced, then release the device.
async fn settle_late_open(mut open: OpenTask, device: OwnedMutexGuard<()>) {
    match tokio::time::timeout(LATE_OPEN_GRACE, &mut open).await {
        Ok(Ok(Ok(mut conn))) => {
            debug!("late open finished, closing it");
            if let Err(e) = conn.close().await {
                warn!(error = %e, "closing a late-opened device failed");
            }
        }
        Ok(Ok(Err(e))) => debug!(error = %e, "late open failed"),
        Ok(Err(e)) => debug!(error = %e, "late open task failed"),
        Err(_) => {
            open.abort();
            warn!(
                grace_ms = LATE_OPEN_GRACE.as_millis() as u64,
                "device open still pending, releasing the device"
            );
        }
    }
    drop(device);
}

struct Job {
    transport: Arc<dyn Transport>,
    locks: DeviceLocks,
    spec: ConnectionSpec,
    ops: Vec<PrintOperation>,
    success: &'static str,
    states: Vec<JobState>,
}

impl Job {
    async fn execute(mut self) -> JobOutcome {
        info!(ops = self.ops.len(), "print job started");

        let bytes = match encode(&self.ops, self.spec.profile) {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(e),
        };

        let device = self.locks.acquire(self.spec.device.key()).await;
        self.enter(JobState::Connecting);

        let mut open: OpenTask = {
            let transport = Arc::clone(&self.transport);
            let target = self.spec.device.clone();
            tokio::spawn(async move { transport.open(&target).await })
        };
        let mut conn = match tokio::time::timeout(self.spec.timeout, &mut open).await {
            Ok(Ok(Ok(conn))) => conn,
            Ok(Ok(Err(e))) => return self.fail(e),
            Ok(Err(e)) => {
                let err = PrintError::DeviceUnavailable(format!("open task failed: {}", e));
                return self.fail(err);
            }
            Err(_) => {
                // The device stays held until the late open has settled
                tokio::spawn(settle_late_open(open, device).in_current_span());
                let err = PrintError::ConnectionTimeout(format!(
                    "{} did not open within {} ms",
                    self.spec.device.path,
                    self.spec.timeout.as_millis()
                ));
                return self.fail(err);
            }
        };
        self.enter(JobState::Connected);

        let printed = self.print(conn.as_mut(), &bytes).await;
        let closed = conn.close().await;

        match (printed, closed) {
            (Ok(()), Ok(())) => {
                let message = self.success.to_string();
                self.finish(message)
            }
            (Ok(()), Err(close_err)) => {
                warn!(error = %close_err, "closing the device failed after printing");
                let message = format!("{} (warning: {})", self.success, close_err);
                self.finish(message)
            }
            (Err(e), Ok(())) => self.fail(e),
            (Err(e), Err(close_err)) => {
                warn!(error = %close_err, "closing the device failed");
                self.fail(e)
            }
        }
    }

    async fn print(&mut self, conn: &mut dyn Connection, bytes: &[u8]) -> Result<(), PrintError> {
        if !conn.is_connected().await {
            return Err(PrintError::NotConnected);
        }
        self.enter(JobState::Writing);
        conn.write_all(bytes).await?;
        self.enter(JobState::Cutting);
        Ok(())
    }

    fn enter(&mut self, state: JobState) {
        debug!(?state, "job state");
        self.states.push(state);
    }

    fn finish(mut self, message: String) -> JobOutcome {
        self.enter(JobState::Closed);
        info!(%message, "print job finished");
        JobOutcome {
            result: PrintResult::ok(message),
            states: self.states,
        }
    }

    fn fail(mut self, err: PrintError) -> JobOutcome {
        info!(error = %err, kind = err.kind(), "print job failed");
        let result = PrintResult::failure(&err);
        self.enter(JobState::Failed(err));
        JobOutcome {
            result,
            states: self.states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        written: Mutex<Vec<u8>>,
        closes: Mutex<usize>,
    }

    struct FakeTransport {
        connected: bool,
        fail_write: bool,
        fail_close: bool,
        recorder: Arc<Recorder>,
    }

    impl FakeTransport {
        fn new() -> Self {
            Self {
                connected: true,
                fail_write: false,
                fail_close: false,
                recorder: Arc::default(),
            }
        }
    }

    struct FakeConnection {
        connected: bool,
        fail_write: bool,
        fail_close: bool,
        recorder: Arc<Recorder>,
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn open(&self, _device: &DeviceDescriptor) -> Result<Box<dyn Connection>, PrintError> {
            Ok(Box::new(FakeConnection {
                connected: self.connected,
                fail_write: self.fail_write,
                fail_close: self.fail_close,
                recorder: Arc::clone(&self.recorder),
            }))
        }
    }

    #[async_trait]
    impl Connection for FakeConnection {
        async fn is_connected(&mut self) -> bool {
            self.connected
        }

        async fn write_all(&mut self, data: &[u8]) -> Result<(), PrintError> {
            if self.fail_write {
                return Err(PrintError::write_failed("broken pipe", 7));
            }
            self.recorder.written.lock().unwrap().extend_from_slice(data);
            Ok(())
        }

        async fn close(&mut self) -> Result<(), PrintError> {
            *self.recorder.closes.lock().unwrap() += 1;
            if self.fail_close {
                return Err(PrintError::DeviceUnavailable("close failed".into()));
            }
            Ok(())
        }
    }

    fn spec() -> ConnectionSpec {
        ConnectionSpec::new(PrinterProfile::GenericA, DeviceDescriptor::serial("/dev/ttyUSB0"))
    }

    fn executor(transport: FakeTransport) -> (JobExecutor, Arc<Recorder>) {
        let recorder = Arc::clone(&transport.recorder);
        (JobExecutor::new(Arc::new(transport)), recorder)
    }

    #[tokio::test]
    async fn test_successful_job_walks_every_state() {
        let (exec, recorder) = executor(FakeTransport::new());
        let outcome = exec.test_connection(spec()).await;

        assert_eq!(outcome.result, PrintResult::ok(TEST_SUCCEEDED));
        assert_eq!(
            outcome.states,
            vec![
                JobState::Idle,
                JobState::Connecting,
                JobState::Connected,
                JobState::Writing,
                JobState::Cutting,
                JobState::Closed,
            ]
        );
        assert_eq!(*recorder.closes.lock().unwrap(), 1);
        let expected = encode(&test_page(), PrinterProfile::GenericA).unwrap();
        assert_eq!(*recorder.written.lock().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_not_connected_still_closes() {
        let (exec, recorder) = executor(FakeTransport {
            connected: false,
            ..FakeTransport::new()
        });
        let outcome = exec.test_connection(spec()).await;

        assert_eq!(outcome.result.message, "Printer not connected.");
        assert!(!outcome.result.success);
        assert_eq!(
            outcome.states.last(),
            Some(&JobState::Failed(PrintError::NotConnected))
        );
        assert_eq!(*recorder.closes.lock().unwrap(), 1);
        assert!(recorder.written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_reports_partial_print() {
        let (exec, recorder) = executor(FakeTransport {
            fail_write: true,
            ..FakeTransport::new()
        });
        let outcome = exec.run_job(spec(), &Receipt::new()).await;

        assert!(!outcome.result.success);
        assert!(outcome.result.message.starts_with("TransportWriteError"));
        assert!(outcome.result.message.contains("may have printed part"));
        assert_eq!(*recorder.closes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_close_failure_after_success_is_a_warning() {
        let (exec, _) = executor(FakeTransport {
            fail_close: true,
            ..FakeTransport::new()
        });
        let outcome = exec.run_job(spec(), &Receipt::new()).await;

        assert!(outcome.result.success);
        assert!(outcome.result.message.starts_with(RECEIPT_PRINTED));
        assert!(outcome.result.message.contains("close failed"));
        assert_eq!(outcome.states.last(), Some(&JobState::Closed));
    }

    #[tokio::test]
    async fn test_close_failure_does_not_mask_earlier_error() {
        let (exec, _) = executor(FakeTransport {
            connected: false,
            fail_close: true,
            ..FakeTransport::new()
        });
        let outcome = exec.test_connection(spec()).await;
        assert_eq!(outcome.result.message, "Printer not connected.");
    }

    #[tokio::test]
    async fn test_bad_operations_fail_before_any_io() {
        let (exec, recorder) = executor(FakeTransport::new());
        let outcome = exec
            .run_operations(spec(), vec![PrintOperation::Text("no cut".into())], TEST_SUCCEEDED)
            .await;

        assert!(!outcome.result.success);
        assert!(outcome.result.message.starts_with("EncodingError"));
        assert_eq!(outcome.states.len(), 2);
        assert_eq!(outcome.states[0], JobState::Idle);
        assert_eq!(*recorder.closes.lock().unwrap(), 0);
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(spec().timeout, Duration::from_millis(3000));
        assert!(JobState::Closed.is_terminal());
        assert!(!JobState::Writing.is_terminal());
    }

    /// Opens after a per-call delay and logs every device interaction.
    #[derive(Default)]
    struct SlowOpen {
        delays: Mutex<Vec<Duration>>,
        events: Arc<Mutex<Vec<&'static str>>>,
    }

    struct LoggedConnection {
        events: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Transport for SlowOpen {
        async fn open(&self, _device: &DeviceDescriptor) -> Result<Box<dyn Connection>, PrintError> {
            let delay = {
                let mut delays = self.delays.lock().unwrap();
                if delays.is_empty() {
                    Duration::ZERO
                } else {
                    delays.remove(0)
                }
            };
            self.events.lock().unwrap().push("open");
            tokio::time::sleep(delay).await;
            self.events.lock().unwrap().push("opened");
            Ok(Box::new(LoggedConnection {
                events: Arc::clone(&self.events),
            }))
        }
    }

    #[async_trait]
    impl Connection for LoggedConnection {
        async fn is_connected(&mut self) -> bool {
            true
        }

        async fn write_all(&mut self, _data: &[u8]) -> Result<(), PrintError> {
            self.events.lock().unwrap().push("write");
            Ok(())
        }

        async fn close(&mut self) -> Result<(), PrintError> {
            self.events.lock().unwrap().push("close");
            Ok(())
        }
    }

    fn slow_open(delays: Vec<Duration>) -> (JobExecutor, Arc<Mutex<Vec<&'static str>>>) {
        let transport = SlowOpen {
            delays: Mutex::new(delays),
            ..SlowOpen::default()
        };
        let events = Arc::clone(&transport.events);
        (JobExecutor::new(Arc::new(transport)), events)
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_open_is_closed_before_next_job_opens() {
        let (exec, events) = slow_open(vec![Duration::from_millis(500)]);

        let first = exec
            .test_connection(spec().with_timeout(Duration::from_millis(100)))
            .await;
        assert!(first.result.message.starts_with("ConnectionTimeout"));

        let second = exec.test_connection(spec()).await;
        assert!(second.result.success, "{}", second.result.message);
        assert_eq!(
            *events.lock().unwrap(),
            vec!["open", "opened", "close", "open", "opened", "write", "close"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_that_never_settles_is_abandoned_after_grace() {
        let (exec, events) = slow_open(vec![Duration::from_secs(3600)]);
        let started = tokio::time::Instant::now();

        let first = exec
            .test_connection(spec().with_timeout(Duration::from_millis(100)))
            .await;
        assert!(first.result.message.starts_with("ConnectionTimeout"));
        assert!(started.elapsed() < Duration::from_millis(200));

        let second = exec.test_connection(spec()).await;
        assert!(second.result.success);
        assert!(started.elapsed() >= LATE_OPEN_GRACE);
        assert_eq!(
            *events.lock().unwrap(),
            vec!["open", "open", "opened", "write", "close"]
        );
    }
}
