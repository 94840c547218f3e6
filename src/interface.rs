//! Port access and the register handshake
//!
//! Two seams live here. [`PortAccess`] is the raw view of the two I/O
//! ports; [`IoPorts`] is its real implementation on top of `ioperm` and
//! `inb`/`outb`. [`EcTransport`] drives the controller's
//! read/write-register handshake over a `PortAccess` and exposes the
//! result as [`EcInterface`], the single-register seam everything above
//! the transport is generic over.
//!
//! The controller accepts one transaction at a time and offers no
//! framing to tell interleaved transactions apart, so a transport must
//! never be shared between concurrently running operations. Every
//! method takes `&mut self`, which enforces this within a process; the
//! advisory lock taken by [`IoPorts::acquire`] extends it to other
//! processes using this crate.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use log::trace;

use crate::{TransportError, READ_REGISTER, STATUS_IBF, STATUS_OBF, WRITE_REGISTER};

/// Path of the advisory lock serializing register access across processes
const LOCK_PATH: &str = "/run/lock/acer-ec.lock";

/// Raw access to the controller's I/O ports
pub trait PortAccess {
    /// Read one byte from `port`
    fn inb(&mut self, port: u16) -> u8;

    /// Write one byte to `port`
    fn outb(&mut self, port: u16, value: u8);
}

/// Register-level interface to the controller
///
/// Implemented by [`EcTransport`] for real hardware and by mock
/// interfaces in tests.
pub trait EcInterface {
    /// Error produced by a failed register operation
    type Error;

    /// Read the register at `register`
    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error>;

    /// Write `value` to the register at `register`
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;
}

/// Real port access via `ioperm`
///
/// Holds the advisory lock file for the life of the process; there is
/// no explicit release, port permission ends when the process exits.
pub struct IoPorts {
    _lock: File,
}

impl IoPorts {
    /// Acquire access to the given I/O ports
    ///
    /// Takes the advisory lock first (blocking until any other instance
    /// finishes), then requests permission for each port. Safe to call
    /// more than once.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::PermissionDenied`] if the lock file
    /// cannot be opened or `ioperm` refuses (typically: not root).
    pub fn acquire(ports: &[u16]) -> Result<Self, TransportError> {
        let lock = lock_file().map_err(TransportError::PermissionDenied)?;
        for &port in ports {
            let ret = unsafe { libc::ioperm(libc::c_ulong::from(port), 1, 1) };
            if ret != 0 {
                return Err(TransportError::PermissionDenied(io::Error::last_os_error()));
            }
        }
        Ok(Self { _lock: lock })
    }
}

impl PortAccess for IoPorts {
    fn inb(&mut self, port: u16) -> u8 {
        unsafe { x86::io::inb(port) }
    }

    fn outb(&mut self, port: u16, value: u8) {
        unsafe { x86::io::outb(port, value) }
    }
}

fn lock_file() -> io::Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(LOCK_PATH)
        .or_else(|_| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .open(std::env::temp_dir().join("acer-ec.lock"))
        })?;
    let ret = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(file)
}

/// Busy-wait tuning for the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Sleep between status polls
    pub poll_interval: Duration,
    /// Polls of one readiness bit before declaring a stall
    pub max_polls: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_micros(100),
            max_polls: 10_000,
        }
    }
}

/// The register handshake over a pair of I/O ports
///
/// A register read is three port operations, a write is three, each
/// gated on a readiness bit of the status port:
///
/// ```text
/// read:   wait !IBF, out cmd  0x80   write:  wait !IBF, out cmd  0x81
///         wait !IBF, out data addr           wait !IBF, out data addr
///         wait  OBF, in  data                wait !IBF, out data value
/// ```
///
/// The controller exposes no completion signal beyond the two status
/// bits, so each wait polls with a short sleep in between. Waits are
/// bounded: a controller that never becomes ready produces
/// [`TransportError::ProtocolStall`] instead of hanging forever.
pub struct EcTransport<P> {
    ports: P,
    command_port: u16,
    data_port: u16,
    config: TransportConfig,
}

impl<P> EcTransport<P> {
    /// Create a transport on the standard port pair (`0x66`/`0x62`)
    pub fn default(ports: P) -> Self {
        Self::new(ports, crate::COMMAND_PORT, crate::DATA_PORT)
    }

    /// Create a transport on a custom port pair
    ///
    /// For controllers wired to non-standard addresses. The ports are
    /// fixed per board; they are never probed at runtime.
    pub fn new(ports: P, command_port: u16, data_port: u16) -> Self {
        Self {
            ports,
            command_port,
            data_port,
            config: TransportConfig::default(),
        }
    }

    /// Replace the busy-wait tuning
    pub fn with_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Consume the transport and return the port handle
    pub fn release(self) -> P {
        self.ports
    }
}

impl<P: PortAccess> EcTransport<P> {
    /// Poll the status port until `status & mask == want`
    fn wait(&mut self, mask: u8, want: u8) -> Result<(), TransportError> {
        let mut status = self.ports.inb(self.command_port);
        for _ in 0..self.config.max_polls {
            if status & mask == want {
                return Ok(());
            }
            if !self.config.poll_interval.is_zero() {
                std::thread::sleep(self.config.poll_interval);
            }
            status = self.ports.inb(self.command_port);
        }
        if status & mask == want {
            return Ok(());
        }
        Err(TransportError::ProtocolStall {
            port: self.command_port,
            status,
        })
    }

    /// Wait until the controller has consumed the last byte written
    fn wait_write_ready(&mut self) -> Result<(), TransportError> {
        self.wait(STATUS_IBF, 0)
    }

    /// Wait until the controller has a byte ready on the data port
    fn wait_read_ready(&mut self) -> Result<(), TransportError> {
        self.wait(STATUS_OBF, STATUS_OBF)
    }
}

impl<P: PortAccess> EcInterface for EcTransport<P> {
    type Error = TransportError;

    fn read_register(&mut self, register: u8) -> Result<u8, TransportError> {
        self.wait_write_ready()?;
        self.ports.outb(self.command_port, READ_REGISTER);
        self.wait_write_ready()?;
        self.ports.outb(self.data_port, register);
        self.wait_read_ready()?;
        let value = self.ports.inb(self.data_port);
        trace!("register {register:#04x} -> {value:#04x}");
        Ok(value)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), TransportError> {
        self.wait_write_ready()?;
        self.ports.outb(self.command_port, WRITE_REGISTER);
        self.wait_write_ready()?;
        self.ports.outb(self.data_port, register);
        self.wait_write_ready()?;
        self.ports.outb(self.data_port, value);
        trace!("register {register:#04x} <- {value:#04x}");
        Ok(())
    }
}
