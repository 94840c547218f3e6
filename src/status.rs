//! Status summary and register dumps
//!
//! Presentation only: everything here is assembled from fresh reads
//! through [`Ec`] and formatted for a terminal. The grid layouts and
//! the summary lines are load-bearing for scripts that scrape them, so
//! they are pinned by tests and must not drift.

use std::fmt;

use crate::device::{Ec, FieldValue};
use crate::interface::EcInterface;
use crate::registers::{self, FIELDS};
use crate::Error;

/// Immutable snapshot of the named features
///
/// Assembled on demand by [`Status::read`]; never cached. Reading
/// twice reads the hardware twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    /// Wireless radio on
    pub wireless: bool,
    /// Bluetooth radio on
    pub bluetooth: bool,
    /// 3G radio on, if a module is fitted
    pub wwan: Option<bool>,
    /// Touchpad enabled
    pub touchpad: bool,
    /// LCD backlight level (0-9 on healthy firmware)
    pub brightness: u8,
    /// CPU temperature in degrees C
    pub cpu_temp: u8,
    /// AC adapter plugged in
    pub ac_online: bool,
    /// Battery telemetry, if a battery is fitted
    pub battery: Option<BatteryStatus>,
}

/// Battery part of the status snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryStatus {
    /// Charge percentage
    pub percent: u8,
    /// Currently charging
    pub charging: bool,
    /// Currently discharging
    pub discharging: bool,
    /// Present voltage in millivolts
    pub voltage_mv: u32,
}

impl Status {
    /// Read a fresh snapshot from the controller
    pub fn read<I: EcInterface>(ec: &mut Ec<I>) -> Result<Self, Error<I::Error>> {
        let wwan = if ec.read_flag(&registers::WWAN_PRESENT)? {
            Some(ec.read_flag(&registers::WWAN)?)
        } else {
            None
        };
        let battery = if ec.read_flag(&registers::BATTERY_PRESENT)? {
            let voltage_mv = match ec.read_field(&registers::PRESENT_VOLTAGE)? {
                FieldValue::Scaled { raw, .. } => raw,
                _ => 0,
            };
            Some(BatteryStatus {
                percent: ec.read_raw(u16::from(registers::BATTERY_PERCENT.register))?,
                charging: ec.read_flag(&registers::BATTERY_CHARGING)?,
                discharging: ec.read_flag(&registers::BATTERY_DISCHARGING)?,
                voltage_mv,
            })
        } else {
            None
        };
        Ok(Self {
            wireless: ec.read_flag(&registers::WIRELESS)?,
            bluetooth: ec.read_flag(&registers::BLUETOOTH)?,
            wwan,
            touchpad: ec.read_flag(&registers::TOUCHPAD)?,
            brightness: ec.read_raw(u16::from(registers::BACKLIGHT.register))?,
            cpu_temp: ec.read_raw(u16::from(registers::CPU_TEMP.register))?,
            ac_online: ec.read_flag(&registers::AC_ADAPTER)?,
            battery,
        })
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "On"
    } else {
        "Off"
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wireless    : {}", on_off(self.wireless))?;
        writeln!(f, "Bluetooth   : {}", on_off(self.bluetooth))?;
        if let Some(wwan) = self.wwan {
            writeln!(f, "3G          : {}", on_off(wwan))?;
        }
        writeln!(f, "Touchpad    : {}", on_off(self.touchpad))?;
        write!(f, "Brightness  : [")?;
        for _ in 0..self.brightness {
            write!(f, "+")?;
        }
        for _ in self.brightness..9 {
            write!(f, "-")?;
        }
        writeln!(f, "]")?;
        writeln!(f, "Temperature : {}'C", self.cpu_temp)?;
        writeln!(
            f,
            "AC Adapter  : {}",
            if self.ac_online { "Online" } else { "Offline" }
        )?;
        match self.battery {
            Some(battery) => {
                let activity = if battery.charging {
                    "charging"
                } else if battery.discharging {
                    "discharging"
                } else {
                    "idle"
                };
                writeln!(f, "Battery     : {}% ({activity})", battery.percent)?;
                writeln!(f, "Voltage     : {:.3} V", battery.voltage_mv as f64 / 1000.0)?;
            }
            None => writeln!(f, "Battery     : Not present")?,
        }
        Ok(())
    }
}

/// Format all 256 registers as the 16-column hexadecimal grid
pub fn format_hex_grid(registers: &[u8; 256]) -> String {
    let mut out = String::from(
        "Dump registers (Hexadecimal)\n\n   \
         | 00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f\n\
         ---+------------------------------------------------",
    );
    for (index, value) in registers.iter().enumerate() {
        if index % 16 == 0 {
            out.push_str(&format!("\n{index:02x} | "));
        }
        out.push_str(&format!("{value:02x} "));
    }
    out.push('\n');
    out
}

/// Format all 256 registers as the 16-column decimal grid
pub fn format_dec_grid(registers: &[u8; 256]) -> String {
    let mut out = String::from(
        "Dump registers (Decimal)\n\n   \
         |   00   01   02   03   04   05   06   07   08   09   0a   0b   0c   0d   0e   0f\n\
         ---+--------------------------------------------------------------------------------",
    );
    for (index, value) in registers.iter().enumerate() {
        if index % 16 == 0 {
            out.push_str(&format!("\n{index:02x} | "));
        }
        out.push_str(&format!("{value:4} "));
    }
    out.push('\n');
    out
}

/// Read and format every named field, one `<tag> <value>` line each
pub fn format_fields<I: EcInterface>(ec: &mut Ec<I>) -> Result<String, Error<I::Error>> {
    let mut out = String::new();
    for field in FIELDS {
        let value = ec.read_field(field)?;
        out.push_str(&format!("{} {}\n", field.tag, value));
    }
    Ok(out)
}

/// Change announcements with an explicit quiet switch
///
/// The quiet flag is injected at construction; nothing here consults
/// process-global state.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    /// Create a reporter; `quiet` suppresses announcements
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Announce a feature change (`Bluetooth is now off.`)
    pub fn announce(&self, name: &str, on: bool) {
        if !self.quiet {
            println!("{name} is now {}.", if on { "on" } else { "off" });
        }
    }
}
