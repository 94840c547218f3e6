#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod device;
pub mod interface;
pub mod registers;
pub mod status;

// Re-export main types
pub use device::{Ec, FieldValue};
pub use interface::{EcInterface, EcTransport, IoPorts, PortAccess, TransportConfig};
pub use registers::{Encoding, Field, FIELDS};
pub use status::{Reporter, Status};

/// Default command/status port of the controller
///
/// Reads return the status byte; writes issue a command opcode. This is
/// the standard ACPI EC port pair; boards wired differently can pass
/// their own ports to [`EcTransport::new`].
pub const COMMAND_PORT: u16 = 0x66;

/// Default data port of the controller
pub const DATA_PORT: u16 = 0x62;

/// Command opcode: begin a register read
pub const READ_REGISTER: u8 = 0x80;

/// Command opcode: begin a register write
pub const WRITE_REGISTER: u8 = 0x81;

/// Status bit: output buffer full
///
/// The controller has placed a byte on the data port and the host has
/// not read it yet.
pub const STATUS_OBF: u8 = 0x01;

/// Status bit: input buffer full
///
/// The controller has not consumed the last byte the host wrote; the
/// host must wait before writing again.
pub const STATUS_IBF: u8 = 0x02;

/// Transport-level errors
///
/// Produced below the register layer: acquiring the ports and driving
/// the handshake.
#[derive(Debug)]
pub enum TransportError {
    /// I/O port access could not be acquired (insufficient privilege)
    PermissionDenied(std::io::Error),
    /// The controller never asserted the awaited readiness bit
    ///
    /// Carries the port that was being polled and the last status byte
    /// observed before giving up.
    ProtocolStall {
        /// Port whose status was polled
        port: u16,
        /// Last status byte read
        status: u8,
    },
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PermissionDenied(err) => write!(f, "cannot access I/O ports: {err}"),
            Self::ProtocolStall { port, status } => write!(
                f,
                "controller not responding on port {port:#04x} (status {status:#04x})"
            ),
        }
    }
}

impl std::error::Error for TransportError {}

/// Driver errors, generic over the interface error
#[derive(Debug)]
pub enum Error<E> {
    /// Communication with the controller failed
    Bus(E),
    /// Register index outside `0..=255`
    ///
    /// Rejected before any hardware access is attempted.
    InvalidRegister(u16),
    /// The operation does not apply to the field's encoding
    /// (e.g. writing a flag value into a numeric field)
    EncodingMismatch {
        /// Tag of the offending field
        tag: &'static str,
    },
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

impl<E: core::fmt::Display> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "{err}"),
            Self::InvalidRegister(index) => {
                write!(f, "invalid register index {index} (valid range 0-255)")
            }
            Self::EncodingMismatch { tag } => {
                write!(f, "operation not supported by field '{tag}'")
            }
        }
    }
}

impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for Error<E> {}
