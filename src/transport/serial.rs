//! # Serial Transport
//!
//! Writes to an OS device node: a USB-serial adapter (`/dev/ttyUSB0`), a
//! built-in UART (`/dev/ttyS0`), or the kernel line-printer driver
//! (`/dev/usb/lp0`).
//!
//! ## TTY Configuration
//!
//! TTYs are switched to raw mode so binary data is transmitted without
//! modification:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, etc. cleared
//! - **No output processing**: OPOST cleared (no CR/LF translation)
//! - **8-bit characters**: CS8, no parity
//! - **No software flow control**: 0x11/0x13 appear in raster data
//!
//! Line-printer nodes are not TTYs; they are written as-is.
//!
//! ## Chunked Writes
//!
//! Data goes out in 4096-byte chunks on a blocking thread. The descriptor is
//! non-blocking, so the thread polls for writability and checks a cancel
//! flag between attempts. The number of bytes handed to the kernel is
//! tracked so a failed write can report how much of the job may already
//! have printed.
//!
//! When a write outlives its timeout the writer is cancelled and pending
//! output is discarded. The connection keeps the writer's handle, and
//! [`close`](Connection::close) waits for it to stop before the descriptor
//! is released.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{Connection, Transport, WRITE_TIMEOUT};
use crate::catalog::DeviceDescriptor;
use crate::error::PrintError;

/// Chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// How long the writer waits for the device before rechecking the cancel flag
const POLL_INTERVAL: Duration = Duration::from_millis(50);

type WriteTask = JoinHandle<(File, Result<(), PrintError>)>;

/// Opens serial and line-printer device nodes.
#[derive(Debug, Clone, Copy)]
pub struct SerialTransport {
    write_timeout: Duration,
}

impl Default for SerialTransport {
    fn default() -> Self {
        Self {
            write_timeout: WRITE_TIMEOUT,
        }
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn open(&self, device: &DeviceDescriptor) -> Result<Box<dyn Connection>, PrintError> {
        let path = device.path.clone();
        let file = {
            let path = path.clone();
            tokio::task::spawn_blocking(move || open_port(&path))
                .await
                .map_err(|e| PrintError::DeviceUnavailable(format!("open task failed: {}", e)))??
        };
        debug!(path = %path, "serial port opened");
        Ok(Box::new(SerialConnection {
            path,
            file: Some(file),
            write_timeout: self.write_timeout,
            stopping: None,
        }))
    }
}

/// An open device node.
pub struct SerialConnection {
    path: String,
    /// `None` once closed, or while a cancelled writer still owns the handle
    file: Option<File>,
    write_timeout: Duration,
    /// Writer that outlived its timeout
    stopping: Option<WriteTask>,
}

#[async_trait]
impl Connection for SerialConnection {
    async fn is_connected(&mut self) -> bool {
        self.file.is_some() && Path::new(&self.path).exists()
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), PrintError> {
        if self.stopping.is_some() {
            return Err(PrintError::write_failed("an earlier write is still stopping", 0));
        }
        let mut file = self
            .file
            .take()
            .ok_or_else(|| PrintError::write_failed("port is closed", 0))?;
        let handle = raw_handle(&file);

        let written = Arc::new(AtomicUsize::new(0));
        let cancel = Arc::new(AtomicBool::new(false));
        let mut task: WriteTask = {
            let written = Arc::clone(&written);
            let cancel = Arc::clone(&cancel);
            let data = data.to_vec();
            tokio::task::spawn_blocking(move || {
                let result = write_chunked(&mut file, &data, &written, &cancel);
                (file, result)
            })
        };

        match tokio::time::timeout(self.write_timeout, &mut task).await {
            Ok(Ok((file, result))) => {
                self.file = Some(file);
                result
            }
            Ok(Err(e)) => Err(PrintError::write_failed(
                format!("writer task failed: {}", e),
                written.load(Ordering::Relaxed),
            )),
            Err(_) => {
                // The task still owns the descriptor, so the handle stays valid
                cancel.store(true, Ordering::Release);
                discard_output(handle);
                let sent = written.load(Ordering::Relaxed);
                warn!(path = %self.path, sent, "write timed out, stopping the writer");
                self.stopping = Some(task);
                Err(PrintError::write_failed(
                    format!(
                        "write did not finish within {} ms",
                        self.write_timeout.as_millis()
                    ),
                    sent,
                ))
            }
        }
    }

    async fn close(&mut self) -> Result<(), PrintError> {
        if let Some(task) = self.stopping.take() {
            match tokio::time::timeout(self.write_timeout, task).await {
                Ok(Ok((file, _))) => self.file = Some(file),
                Ok(Err(e)) => {
                    return Err(PrintError::DeviceUnavailable(format!(
                        "writer for {} failed: {}",
                        self.path, e
                    )));
                }
                Err(_) => {
                    return Err(PrintError::DeviceUnavailable(format!(
                        "writer for {} did not stop within {} ms",
                        self.path,
                        self.write_timeout.as_millis()
                    )));
                }
            }
        }

        let Some(file) = self.file.take() else {
            return Ok(());
        };
        debug!(path = %self.path, "closing serial port");
        close_file(file).map_err(|e| {
            PrintError::DeviceUnavailable(format!("closing {} failed: {}", self.path, e))
        })
    }
}

fn open_port(path: &str) -> Result<File, PrintError> {
    let mut options = OpenOptions::new();
    options.write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK);
    }

    let file = options
        .open(path)
        .map_err(|e| PrintError::DeviceUnavailable(format!("cannot open {}: {}", path, e)))?;

    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        match configure_tty_raw(file.as_raw_fd()) {
            Ok(()) => {}
            Err(e) if e.raw_os_error() == Some(libc::ENOTTY) => {
                debug!(path, "not a tty, writing without line configuration");
            }
            Err(e) => {
                return Err(PrintError::DeviceUnavailable(format!(
                    "cannot configure {}: {}",
                    path, e
                )));
            }
        }
    }

    Ok(file)
}

fn write_chunked(
    file: &mut File,
    data: &[u8],
    written: &AtomicUsize,
    cancel: &AtomicBool,
) -> Result<(), PrintError> {
    let failed = |e: io::Error| {
        PrintError::write_failed(format!("write failed: {}", e), written.load(Ordering::Relaxed))
    };

    for chunk in data.chunks(CHUNK_SIZE) {
        write_chunk(file, chunk, written, cancel).map_err(failed)?;
    }
    file.flush().map_err(failed)?;
    drain(file).map_err(failed)
}

/// Write one chunk, polling while the device is not ready for more.
fn write_chunk(
    file: &mut File,
    mut chunk: &[u8],
    written: &AtomicUsize,
    cancel: &AtomicBool,
) -> io::Result<()> {
    while !chunk.is_empty() {
        if cancel.load(Ordering::Acquire) {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "write cancelled"));
        }
        match file.write(chunk) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => {
                written.fetch_add(n, Ordering::Relaxed);
                chunk = &chunk[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => wait_writable(file)?,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(unix)]
fn wait_writable(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let mut fds = libc::pollfd {
        fd: file.as_raw_fd(),
        events: libc::POLLOUT,
        revents: 0,
    };
    if unsafe { libc::poll(&mut fds, 1, POLL_INTERVAL.as_millis() as libc::c_int) } < 0 {
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn wait_writable(_file: &File) -> io::Result<()> {
    std::thread::sleep(POLL_INTERVAL);
    Ok(())
}

#[cfg(unix)]
type RawHandle = std::os::unix::io::RawFd;

#[cfg(not(unix))]
type RawHandle = ();

#[cfg(unix)]
fn raw_handle(file: &File) -> RawHandle {
    use std::os::unix::io::AsRawFd;
    file.as_raw_fd()
}

#[cfg(not(unix))]
fn raw_handle(_file: &File) -> RawHandle {}

/// Drop queued output so a blocked `tcdrain` returns. No-op on non-TTYs.
#[cfg(unix)]
fn discard_output(fd: RawHandle) {
    unsafe {
        libc::tcflush(fd, libc::TCOFLUSH);
    }
}

#[cfg(not(unix))]
fn discard_output(_handle: RawHandle) {}

/// Block until the kernel has pushed everything out of the port.
#[cfg(unix)]
fn drain(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    if unsafe { libc::tcdrain(file.as_raw_fd()) } == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ENOTTY) | Some(libc::EINVAL) => Ok(()),
        _ => Err(err),
    }
}

#[cfg(not(unix))]
fn drain(_file: &File) -> io::Result<()> {
    Ok(())
}

/// Close explicitly so the error is observable instead of lost in `Drop`.
#[cfg(unix)]
fn close_file(file: File) -> io::Result<()> {
    use std::os::unix::io::IntoRawFd;

    let fd = file.into_raw_fd();
    if unsafe { libc::close(fd) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn close_file(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

/// Configure a file descriptor for raw TTY mode.
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB (then CS8 is set)
#[cfg(unix)]
fn configure_tty_raw(fd: i32) -> io::Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8 | libc::CLOCAL;

    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
