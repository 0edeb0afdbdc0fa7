//! # Boundary Scenarios
//!
//! End-to-end runs of `listDevices`, `testConnection` and `printReceipt`
//! against a simulated transport that records every byte, open and close.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;

use tillprint::PrintError;
use tillprint::api::{PrintRequest, PrintService, PrinterConfigRequest};
use tillprint::catalog::{DeviceCatalog, DeviceDescriptor, DeviceSource};
use tillprint::transport::{Connection, Transport};

// ============================================================================
// SIMULATED TRANSPORT
// ============================================================================

#[derive(Clone, Copy)]
enum Device {
    Connected,
    Disconnected,
    /// `open` never completes
    Hang,
}

#[derive(Default)]
struct Recorded {
    opens: AtomicUsize,
    closes: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    written: Mutex<Vec<u8>>,
}

impl Recorded {
    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn written(&self) -> Vec<u8> {
        self.written.lock().unwrap().clone()
    }
}

struct SimulatedTransport {
    device: Device,
    write_delay: Duration,
    fail_write: bool,
    recorded: Arc<Recorded>,
}

impl SimulatedTransport {
    fn new(device: Device) -> Self {
        Self {
            device,
            write_delay: Duration::ZERO,
            fail_write: false,
            recorded: Arc::default(),
        }
    }
}

struct SimulatedConnection {
    connected: bool,
    write_delay: Duration,
    fail_write: bool,
    closed: AtomicBool,
    recorded: Arc<Recorded>,
}

#[async_trait]
impl Transport for SimulatedTransport {
    async fn open(&self, _device: &DeviceDescriptor) -> Result<Box<dyn Connection>, PrintError> {
        self.recorded.opens.fetch_add(1, Ordering::SeqCst);
        let connected = match self.device {
            Device::Connected => true,
            Device::Disconnected => false,
            Device::Hang => return std::future::pending().await,
        };
        let active = self.recorded.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.recorded.max_active.fetch_max(active, Ordering::SeqCst);
        Ok(Box::new(SimulatedConnection {
            connected,
            write_delay: self.write_delay,
            fail_write: self.fail_write,
            closed: AtomicBool::new(false),
            recorded: Arc::clone(&self.recorded),
        }))
    }
}

#[async_trait]
impl Connection for SimulatedConnection {
    async fn is_connected(&mut self) -> bool {
        self.connected
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), PrintError> {
        if !self.write_delay.is_zero() {
            tokio::time::sleep(self.write_delay).await;
        }
        if self.fail_write {
            let half = data.len() / 2;
            self.recorded.written.lock().unwrap().extend_from_slice(&data[..half]);
            return Err(PrintError::write_failed("device went away", half));
        }
        self.recorded.written.lock().unwrap().extend_from_slice(data);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), PrintError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.recorded.closes.fetch_add(1, Ordering::SeqCst);
            self.recorded.active.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

struct FailingSource;

impl DeviceSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn enumerate(&self) -> Result<Vec<DeviceDescriptor>, PrintError> {
        Err(PrintError::DeviceUnavailable("enumeration threw".into()))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn service(transport: SimulatedTransport) -> (PrintService, Arc<Recorded>) {
    let recorded = Arc::clone(&transport.recorded);
    let service = PrintService::new(DeviceCatalog::with_sources(Vec::new()), Arc::new(transport));
    (service, recorded)
}

fn config(printer_type: &str, interface: &str) -> PrinterConfigRequest {
    serde_json::from_value(json!({
        "type": printer_type,
        "interface": interface,
        "connectionType": "serial"
    }))
    .unwrap()
}

fn widget_request(interface: &str) -> PrintRequest {
    serde_json::from_value(json!({
        "config": {"type": "GENERIC_A", "interface": interface, "connectionType": "serial"},
        "content": {
            "items": [{"name": "Widget", "qty": 2, "price": "5.00"}],
            "total": "10.00"
        }
    }))
    .unwrap()
}

fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[tokio::test]
async fn scenario_a_test_connection_succeeds() {
    let (service, recorded) = service(SimulatedTransport::new(Device::Connected));

    let result = service.test_connection(&config("GENERIC_A", "COM3")).await;

    assert!(result.success);
    assert_eq!(result.message, "Printer test successful!");
    assert_eq!(recorded.opens(), 1);
    assert_eq!(recorded.closes(), 1);
    assert!(recorded.written().ends_with(&[0x1D, 0x56, 0x41, 0x03]));
}

#[tokio::test]
async fn scenario_b_not_connected() {
    let (service, recorded) = service(SimulatedTransport::new(Device::Disconnected));

    let result = service.test_connection(&config("GENERIC_A", "COM3")).await;

    assert!(!result.success);
    assert_eq!(result.message, "Printer not connected.");
    assert_eq!(recorded.closes(), 1);
    assert!(recorded.written().is_empty());
}

#[tokio::test]
async fn scenario_c_receipt_stream_order() {
    let (service, recorded) = service(SimulatedTransport::new(Device::Connected));

    let result = service.print_receipt(&widget_request("/dev/ttyUSB0")).await;
    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Receipt printed successfully!");

    let bytes = recorded.written();
    let row = format!("{:<25}{:>4}{:>13}\n", "Widget", "2x", "5.00");
    let rule = format!("{}\n", "-".repeat(42));

    let at_row = find_from(&bytes, row.as_bytes(), 0).expect("table row");
    let at_rule = find_from(&bytes, rule.as_bytes(), at_row).expect("rule after row");
    let at_right = find_from(&bytes, &[0x1B, 0x61, 0x02], at_rule).expect("right align");
    let at_bold = find_from(&bytes, &[0x1B, 0x45, 0x01], at_right).expect("emphasis on");
    let at_total = find_from(&bytes, b"TOTAL: 10.00\n", at_bold).expect("total line");
    let at_cut = find_from(&bytes, &[0x1D, 0x56, 0x41, 0x03], at_total).expect("cut");
    assert_eq!(at_cut + 4, bytes.len(), "cut is the last thing written");
    assert_eq!(recorded.closes(), 1);
}

#[tokio::test]
async fn scenario_d_enumeration_failure_yields_empty_list() {
    let service = PrintService::new(
        DeviceCatalog::with_sources(vec![Box::new(FailingSource)]),
        Arc::new(SimulatedTransport::new(Device::Connected)),
    );
    assert!(service.list_devices().await.is_empty());
}

#[tokio::test]
async fn scenario_e_unknown_profile_touches_no_device() {
    let (service, recorded) = service(SimulatedTransport::new(Device::Connected));

    let result = service.test_connection(&config("unknown-vendor", "COM3")).await;

    assert!(!result.success);
    assert!(result.message.contains("UnknownProfile"), "{}", result.message);
    assert_eq!(recorded.opens(), 0);
}

// ============================================================================
// EXECUTION PROPERTIES
// ============================================================================

#[tokio::test(start_paused = true)]
async fn hung_open_times_out_within_bound() {
    let (service, recorded) = service(SimulatedTransport::new(Device::Hang));
    let mut cfg = config("GENERIC_A", "/dev/ttyUSB0");
    cfg.timeout_ms = Some(250);

    let started = tokio::time::Instant::now();
    let result = service.test_connection(&cfg).await;
    let elapsed = started.elapsed();

    assert!(!result.success);
    assert!(result.message.starts_with("ConnectionTimeout"), "{}", result.message);
    assert!(elapsed >= Duration::from_millis(250));
    assert!(elapsed < Duration::from_millis(300), "took {:?}", elapsed);
    assert_eq!(recorded.opens(), 1);
    assert_eq!(recorded.closes(), 0);
}

#[tokio::test(start_paused = true)]
async fn default_connect_timeout_is_three_seconds() {
    let (service, _) = service(SimulatedTransport::new(Device::Hang));

    let started = tokio::time::Instant::now();
    let result = service.test_connection(&config("GENERIC_A", "COM3")).await;

    assert!(result.message.starts_with("ConnectionTimeout"));
    assert!(started.elapsed() >= Duration::from_millis(3000));
    assert!(started.elapsed() < Duration::from_millis(3100));
}

#[tokio::test(start_paused = true)]
async fn same_device_jobs_never_overlap() {
    let (service, recorded) = service(SimulatedTransport {
        write_delay: Duration::from_millis(50),
        ..SimulatedTransport::new(Device::Connected)
    });

    let request = widget_request("/dev/ttyUSB0");
    let (first, second) = tokio::join!(
        service.print_receipt(&request),
        service.print_receipt(&request)
    );

    assert!(first.success && second.success);
    assert_eq!(recorded.opens(), 2);
    assert_eq!(recorded.closes(), 2);
    assert_eq!(recorded.max_active.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn different_devices_run_side_by_side() {
    let (service, recorded) = service(SimulatedTransport {
        write_delay: Duration::from_millis(50),
        ..SimulatedTransport::new(Device::Connected)
    });

    let req_a = widget_request("/dev/ttyUSB0");
    let req_b = widget_request("/dev/ttyUSB1");
    let (a, b) = tokio::join!(
        service.print_receipt(&req_a),
        service.print_receipt(&req_b)
    );

    assert!(a.success && b.success);
    assert_eq!(recorded.max_active.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn abandoned_caller_still_closes_the_device() {
    let (service, recorded) = service(SimulatedTransport {
        write_delay: Duration::from_millis(100),
        ..SimulatedTransport::new(Device::Connected)
    });

    let request = widget_request("/dev/ttyUSB0");
    let gave_up =
        tokio::time::timeout(Duration::from_millis(10), service.print_receipt(&request)).await;
    assert!(gave_up.is_err());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(recorded.opens(), 1);
    assert_eq!(recorded.closes(), 1);
    assert!(!recorded.written().is_empty());
}

#[tokio::test]
async fn write_failure_closes_and_flags_partial_print() {
    let (service, recorded) = service(SimulatedTransport {
        fail_write: true,
        ..SimulatedTransport::new(Device::Connected)
    });

    let result = service.print_receipt(&widget_request("/dev/ttyUSB0")).await;

    assert!(!result.success);
    assert!(result.message.starts_with("TransportWriteError"));
    assert!(result.message.contains("may have printed part"));
    assert_eq!(recorded.closes(), 1);
}

#[tokio::test]
async fn zero_price_single_item_prints() {
    let (service, _) = service(SimulatedTransport::new(Device::Connected));
    let request: PrintRequest = serde_json::from_value(json!({
        "config": {"type": "EPSON", "interface": "COM3", "connectionType": "serial"},
        "content": {"items": [{"name": "Free sample", "qty": 1, "price": "0.00"}]}
    }))
    .unwrap();

    let result = service.print_receipt(&request).await;
    assert!(result.success, "{}", result.message);
}

#[tokio::test]
async fn malformed_usb_key_is_rejected_before_open() {
    let (service, recorded) = service(SimulatedTransport::new(Device::Connected));
    let cfg: PrinterConfigRequest = serde_json::from_value(json!({
        "type": "GENERIC_B",
        "interface": "usb:04b8",
        "connectionType": "usb"
    }))
    .unwrap();

    let result = service.test_connection(&cfg).await;

    assert!(!result.success);
    assert!(result.message.starts_with("EncodingError"));
    assert_eq!(recorded.opens(), 0);
}

#[tokio::test]
async fn bad_receipt_field_is_rejected_before_open() {
    let (service, recorded) = service(SimulatedTransport::new(Device::Connected));
    let request: PrintRequest = serde_json::from_value(json!({
        "config": {"type": "GENERIC_A", "interface": "COM3", "connectionType": "serial"},
        "content": {"items": [{"name": "Widget", "qty": 1, "price": "5.005"}]}
    }))
    .unwrap();

    let result = service.print_receipt(&request).await;

    assert!(!result.success);
    assert!(result.message.starts_with("EncodingError"));
    assert_eq!(recorded.opens(), 0);
}
