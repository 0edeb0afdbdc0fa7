//! The three boundary operations.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::schema::{DeviceInfo, PrintRequest, PrinterConfigRequest, ProfileInfo};
use crate::catalog::DeviceCatalog;
use crate::job::{DEFAULT_TIMEOUT_MS, JobExecutor, PrintResult};
use crate::printer::PrinterProfile;
use crate::transport::{SystemTransport, Transport};

/// Entry point for callers. Holds no printer handle: every call builds its
/// own connection settings from the request.
#[derive(Clone)]
pub struct PrintService {
    catalog: Arc<DeviceCatalog>,
    executor: JobExecutor,
    default_timeout: Duration,
}

impl PrintService {
    pub fn new(catalog: DeviceCatalog, transport: Arc<dyn Transport>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            executor: JobExecutor::new(transport),
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Host devices over the system transports.
    pub fn system() -> Self {
        Self::new(DeviceCatalog::system(), Arc::new(SystemTransport::default()))
    }

    /// Connect timeout for requests that do not set `timeoutMs`.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Every reachable device. Never fails; problems yield an empty list.
    pub async fn list_devices(&self) -> Vec<DeviceInfo> {
        let catalog = Arc::clone(&self.catalog);
        match tokio::task::spawn_blocking(move || catalog.list_devices()).await {
            Ok(devices) => devices.iter().map(DeviceInfo::from).collect(),
            Err(e) => {
                warn!(error = %e, "device enumeration task failed, reporting no devices");
                Vec::new()
            }
        }
    }

    /// Open the device, check it is alive, print a test page.
    pub async fn test_connection(&self, config: &PrinterConfigRequest) -> PrintResult {
        let spec = match config.to_spec(self.default_timeout) {
            Ok(spec) => spec,
            Err(e) => {
                info!(error = %e, printer_type = %config.printer_type, "connection test rejected");
                return e.into();
            }
        };
        self.executor.test_connection(spec).await.result
    }

    /// Compose, encode and print a receipt.
    pub async fn print_receipt(&self, request: &PrintRequest) -> PrintResult {
        let (spec, receipt) = match request.prepare(self.default_timeout) {
            Ok(prepared) => prepared,
            Err(e) => {
                info!(error = %e, "print request rejected");
                return e.into();
            }
        };
        self.executor.run_job(spec, &receipt).await.result
    }

    /// Supported printer profiles.
    pub fn profiles(&self) -> Vec<ProfileInfo> {
        PrinterProfile::ALL.into_iter().map(ProfileInfo::from).collect()
    }
}
