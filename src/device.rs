//! Feature-level driver
//!
//! [`Ec`] turns the byte-oriented register interface into typed
//! operations on named fields: read a flag under its mask and polarity,
//! flip it with a read-modify-write, assemble two-byte composites,
//! apply scale constants. It holds no state beyond the interface
//! handle; every call round-trips to the controller, so a value read
//! twice can legitimately differ.

use crate::interface::EcInterface;
use crate::registers::{Encoding, Field};
use crate::Error;

/// Decoded value of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Boolean field (after polarity)
    Flag(bool),
    /// Integer field (bit group, byte or two-byte composite)
    Int(u32),
    /// Scaled field: `raw / divisor`
    Scaled {
        /// Raw integer as read
        raw: u32,
        /// The field's scale constant
        divisor: u32,
    },
}

impl FieldValue {
    /// The value as a float (scaled fields divided down)
    pub fn as_f32(&self) -> f32 {
        match *self {
            Self::Flag(flag) => u8::from(flag) as f32,
            Self::Int(value) => value as f32,
            Self::Scaled { raw, divisor } => raw as f32 / divisor as f32,
        }
    }
}

impl core::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::Flag(true) => write!(f, "on"),
            Self::Flag(false) => write!(f, "off"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Scaled { raw, divisor } => {
                let digits = divisor.ilog10() as usize;
                write!(f, "{:.*}", digits, raw as f64 / f64::from(divisor))
            }
        }
    }
}

/// The feature-level driver
///
/// Generic over [`EcInterface`], so the same code runs against the real
/// transport and against a mock in tests.
pub struct Ec<I> {
    interface: I,
}

impl<I: EcInterface> Ec<I> {
    /// Create a driver over the given interface
    pub fn new(interface: I) -> Self {
        Self { interface }
    }

    /// Consume the driver and return the interface
    pub fn release(self) -> I {
        self.interface
    }

    /// Read the register at `register`, validating the index
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegister`] for indices above 255, before any
    /// hardware access.
    pub fn read_raw(&mut self, register: u16) -> Result<u8, Error<I::Error>> {
        let register = u8::try_from(register).map_err(|_| Error::InvalidRegister(register))?;
        Ok(self.interface.read_register(register)?)
    }

    /// Write `value` to the register at `register`, validating the index
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegister`] for indices above 255, before any
    /// hardware access.
    pub fn write_raw(&mut self, register: u16, value: u8) -> Result<(), Error<I::Error>> {
        let register = u8::try_from(register).map_err(|_| Error::InvalidRegister(register))?;
        Ok(self.interface.write_register(register, value)?)
    }

    /// Read a boolean field
    ///
    /// # Errors
    ///
    /// [`Error::EncodingMismatch`] if the field is not boolean.
    pub fn read_flag(&mut self, field: &Field) -> Result<bool, Error<I::Error>> {
        match field.encoding {
            Encoding::Flag { mask, inverted } => {
                let byte = self.interface.read_register(field.register)?;
                Ok((byte & mask != 0) != inverted)
            }
            Encoding::Above { mask, threshold } => {
                let byte = self.interface.read_register(field.register)?;
                Ok((byte & mask) > threshold)
            }
            _ => Err(Error::EncodingMismatch { tag: field.tag }),
        }
    }

    /// Set a boolean field
    ///
    /// Read-modify-write: every bit outside the field's mask is
    /// written back exactly as read. Another process writing the same
    /// register between the read and the write can lose its update;
    /// the advisory lock covers processes using this crate, nothing
    /// else.
    ///
    /// # Errors
    ///
    /// [`Error::EncodingMismatch`] if the field is not a plain flag.
    pub fn write_flag(&mut self, field: &Field, value: bool) -> Result<(), Error<I::Error>> {
        let Encoding::Flag { mask, inverted } = field.encoding else {
            return Err(Error::EncodingMismatch { tag: field.tag });
        };
        let current = self.interface.read_register(field.register)?;
        let next = if value != inverted {
            current | mask
        } else {
            current & !mask
        };
        Ok(self.interface.write_register(field.register, next)?)
    }

    /// Flip a boolean field, returning the new value
    pub fn toggle_flag(&mut self, field: &Field) -> Result<bool, Error<I::Error>> {
        let value = !self.read_flag(field)?;
        self.write_flag(field, value)?;
        Ok(value)
    }

    /// Set a level field, returning the raw byte stored
    ///
    /// The value is wrapped into the field's range (`n mod modulus`)
    /// and written directly; the field owns its whole register, so no
    /// read-modify-write is needed.
    ///
    /// # Errors
    ///
    /// [`Error::EncodingMismatch`] if the field is not a level.
    pub fn write_level(&mut self, field: &Field, value: u32) -> Result<u8, Error<I::Error>> {
        let Encoding::Level { modulus } = field.encoding else {
            return Err(Error::EncodingMismatch { tag: field.tag });
        };
        let raw = (value % u32::from(modulus)) as u8;
        self.interface.write_register(field.register, raw)?;
        Ok(raw)
    }

    /// Read and decode any field
    pub fn read_field(&mut self, field: &Field) -> Result<FieldValue, Error<I::Error>> {
        match field.encoding {
            Encoding::Flag { .. } | Encoding::Above { .. } => {
                Ok(FieldValue::Flag(self.read_flag(field)?))
            }
            Encoding::Bits { mask } => {
                let byte = self.interface.read_register(field.register)?;
                Ok(FieldValue::Int(u32::from(
                    (byte & mask) >> mask.trailing_zeros(),
                )))
            }
            Encoding::Byte | Encoding::Level { .. } => {
                let byte = self.interface.read_register(field.register)?;
                Ok(FieldValue::Int(u32::from(byte)))
            }
            Encoding::Word { high } => {
                let raw = self.read_word(field.register, high)?;
                Ok(FieldValue::Int(raw))
            }
            Encoding::Scaled { high, divisor } => {
                let raw = self.read_word(field.register, high)?;
                Ok(FieldValue::Scaled { raw, divisor })
            }
        }
    }

    /// Assemble `high * 256 + low`; the lower address holds the low byte
    fn read_word(&mut self, low: u8, high: u8) -> Result<u32, Error<I::Error>> {
        let low_byte = self.interface.read_register(low)?;
        let high_byte = self.interface.read_register(high)?;
        Ok(u32::from(high_byte) * 256 + u32::from(low_byte))
    }

    /// Read the whole register file
    pub fn snapshot(&mut self) -> Result<[u8; 256], Error<I::Error>> {
        let mut registers = [0u8; 256];
        for (index, slot) in registers.iter_mut().enumerate() {
            *slot = self.interface.read_register(index as u8)?;
        }
        Ok(registers)
    }
}
