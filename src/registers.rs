//! The register field table
//!
//! Every named field the controller firmware is known to expose, with
//! its address, mask, polarity and encoding. This module only
//! *describes* the registers; all reading, writing and decoding happens
//! in [`crate::device`].
//!
//! Conventions, all verified against the chip rather than deduced from
//! naming:
//! - Two-byte values assemble as `high * 256 + low`, and the **lower**
//!   register address holds the **low** byte.
//! - A handful of fields are inverted: the bit being *set* means the
//!   feature is *off* (the touchpad is the notorious one).
//! - Scaled fields store a raw integer that is divided by a fixed,
//!   per-field constant on read (e.g. millivolts to volts by 1000).
//!
//! Within one register the masks of distinct fields never overlap,
//! with two documented exceptions: `rfst` is a combined view of the
//! three radio bits, and `bsta` is a combined view of the battery
//! status bits.

/// How a field's raw bits map to a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Single-bit boolean under `mask`
    ///
    /// With `inverted` polarity the bit being clear means `true`.
    Flag {
        /// Bit selecting the flag
        mask: u8,
        /// Bit clear means the feature is on
        inverted: bool,
    },
    /// Multi-bit value under `mask`, shifted down to bit 0
    Bits {
        /// Contiguous bits holding the value
        mask: u8,
    },
    /// Whole-byte unsigned value
    Byte,
    /// Whole-byte value wrapped into `0..modulus` on write
    Level {
        /// One past the largest stored value
        modulus: u8,
    },
    /// Two-byte little-endian value; the field's register holds the
    /// low byte, `high` holds the high byte
    Word {
        /// Register holding the high byte
        high: u8,
    },
    /// Two-byte value divided by `divisor` on read
    Scaled {
        /// Register holding the high byte
        high: u8,
        /// Fixed scale constant, a property of the field
        divisor: u32,
    },
    /// Boolean: masked byte compared against a raw threshold
    Above {
        /// Bits participating in the comparison
        mask: u8,
        /// Reads `true` when the masked byte exceeds this
        threshold: u8,
    },
}

/// One named field of the controller's register file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Four-letter tag used in dumps and lookups
    pub tag: &'static str,
    /// Human-readable description
    pub name: &'static str,
    /// Owning register (the low byte for two-byte fields)
    pub register: u8,
    /// Raw-to-value mapping
    pub encoding: Encoding,
}

const fn flag(tag: &'static str, name: &'static str, register: u8, mask: u8) -> Field {
    Field {
        tag,
        name,
        register,
        encoding: Encoding::Flag {
            mask,
            inverted: false,
        },
    }
}

const fn flag_inv(tag: &'static str, name: &'static str, register: u8, mask: u8) -> Field {
    Field {
        tag,
        name,
        register,
        encoding: Encoding::Flag {
            mask,
            inverted: true,
        },
    }
}

const fn bits(tag: &'static str, name: &'static str, register: u8, mask: u8) -> Field {
    Field {
        tag,
        name,
        register,
        encoding: Encoding::Bits { mask },
    }
}

const fn byte(tag: &'static str, name: &'static str, register: u8) -> Field {
    Field {
        tag,
        name,
        register,
        encoding: Encoding::Byte,
    }
}

const fn word(tag: &'static str, name: &'static str, low: u8, high: u8) -> Field {
    Field {
        tag,
        name,
        register: low,
        encoding: Encoding::Word { high },
    }
}

const fn scaled(
    tag: &'static str,
    name: &'static str,
    low: u8,
    high: u8,
    divisor: u32,
) -> Field {
    Field {
        tag,
        name,
        register: low,
        encoding: Encoding::Scaled { high, divisor },
    }
}

/// Wireless radio power (0xbb bit 0)
pub const WIRELESS: Field = flag("wlan", "wireless radio", 0xbb, 0x01);

/// Bluetooth radio power (0xbb bit 1)
pub const BLUETOOTH: Field = flag("blue", "bluetooth radio", 0xbb, 0x02);

/// 3G radio power (0xbb bit 2)
pub const WWAN: Field = flag("wwan", "3G radio", 0xbb, 0x04);

/// 3G module fitted (0xbb bit 6)
pub const WWAN_PRESENT: Field = flag("wwex", "3G module fitted", 0xbb, 0x40);

/// Touchpad enable (0x9e bit 3, inverted: set means disabled)
pub const TOUCHPAD: Field = flag_inv("tpad", "touchpad", 0x9e, 0x08);

/// Keyboard backlight (0xba bit 0)
pub const KBD_BACKLIGHT: Field = flag("kbbl", "keyboard backlight", 0xba, 0x01);

/// LCD backlight level, 0-9 (whole register 0xb9)
pub const BACKLIGHT: Field = Field {
    tag: "brig",
    name: "lcd backlight level",
    register: 0xb9,
    encoding: Encoding::Level { modulus: 10 },
};

/// CPU temperature in degrees C (0xb0)
pub const CPU_TEMP: Field = byte("tmp0", "cpu temperature", 0xb0);

/// AC adapter present (0xa2 bit 0)
pub const AC_ADAPTER: Field = flag("acin", "ac adapter present", 0xa2, 0x01);

/// Lid closed (0xa3 bit 2)
pub const LID_CLOSED: Field = flag("lidc", "lid closed", 0xa3, 0x04);

/// Battery charge percentage (0xbf)
pub const BATTERY_PERCENT: Field = byte("bpct", "battery charge percent", 0xbf);

/// Battery remaining capacity in mAh (0xc2/0xc3)
pub const BATTERY_REMAINING: Field = word("rcap", "battery remaining capacity", 0xc2, 0xc3);

/// Battery present voltage in volts (0xc6/0xc7, raw millivolts)
pub const PRESENT_VOLTAGE: Field = scaled("pvol", "battery present voltage", 0xc6, 0xc7, 1000);

/// Battery fitted (0xd0 bit 4)
pub const BATTERY_PRESENT: Field = flag("bprs", "battery present", 0xd0, 0x10);

/// Battery charging (0xd0 bit 0)
pub const BATTERY_CHARGING: Field = flag("bchg", "battery charging", 0xd0, 0x01);

/// Battery discharging (0xd0 bit 1)
pub const BATTERY_DISCHARGING: Field = flag("bdis", "battery discharging", 0xd0, 0x02);

/// Every known field, ordered by register address
pub static FIELDS: &[Field] = &[
    // ==================== FIRMWARE AND SELF TEST ====================
    byte("fwmj", "firmware major version", 0x00),
    byte("fwmn", "firmware minor version", 0x01),
    byte("prot", "protocol revision", 0x02),
    byte("mach", "machine id", 0x03),
    byte("post", "last POST code", 0x04),
    flag("wdte", "watchdog enabled", 0x05, 0x01),
    flag("wdtf", "watchdog fired", 0x05, 0x02),
    bits("wdtp", "watchdog period select", 0x05, 0xf0),
    byte("evtp", "pending event count", 0x06),
    flag("evlo", "event queue overflow", 0x07, 0x01),
    flag("smie", "smi events enabled", 0x07, 0x02),
    flag("scie", "sci events enabled", 0x07, 0x04),
    flag("kbde", "keyboard events enabled", 0x07, 0x08),
    flag("tmev", "thermal event pending", 0x07, 0x10),
    flag("btev", "battery event pending", 0x07, 0x20),
    flag("lsev", "lid event pending", 0x07, 0x40),
    flag("hkev", "hotkey event pending", 0x07, 0x80),
    byte("hkcd", "last hotkey scancode", 0x08),
    byte("ecst", "self test result", 0x09),
    flag("ecbz", "controller busy", 0x0a, 0x01),
    flag("ecer", "controller error latch", 0x0a, 0x02),
    flag("ecrm", "ram test passed", 0x0a, 0x04),
    flag("ecck", "firmware checksum valid", 0x0a, 0x08),
    // ==================== KEYBOARD AND LEDS ====================
    flag("fnlk", "fn lock active", 0x10, 0x01),
    flag("fnsw", "fn key swapped", 0x10, 0x02),
    flag("nmlk", "num lock led", 0x10, 0x04),
    flag("cpsl", "caps lock led", 0x10, 0x08),
    flag("scrl", "scroll lock led", 0x10, 0x10),
    flag("ledp", "power led on", 0x11, 0x01),
    flag("ledc", "charge led on", 0x11, 0x02),
    flag("ledm", "mail led on", 0x11, 0x04),
    flag("ledw", "wireless led on", 0x11, 0x08),
    bits("ledb", "led blink mask", 0x11, 0xf0),
    byte("kbrp", "key repeat rate", 0x12),
    // ==================== GPIO ====================
    flag("gpi0", "gpio input 0", 0x20, 0x01),
    flag("gpi1", "gpio input 1", 0x20, 0x02),
    flag("gpi2", "gpio input 2", 0x20, 0x04),
    flag("gpi3", "gpio input 3", 0x20, 0x08),
    flag("gpi4", "gpio input 4", 0x20, 0x10),
    flag("gpi5", "gpio input 5", 0x20, 0x20),
    flag("gpi6", "gpio input 6", 0x20, 0x40),
    flag("gpi7", "gpio input 7", 0x20, 0x80),
    flag("gpo0", "gpio output 0", 0x21, 0x01),
    flag("gpo1", "gpio output 1", 0x21, 0x02),
    flag("gpo2", "gpio output 2", 0x21, 0x04),
    flag("gpo3", "gpio output 3", 0x21, 0x08),
    flag("gpo4", "gpio output 4", 0x21, 0x10),
    flag("gpo5", "gpio output 5", 0x21, 0x20),
    flag("gpo6", "gpio output 6", 0x21, 0x40),
    flag("gpo7", "gpio output 7", 0x21, 0x80),
    // ==================== DEVICE POWER AND WAKE ====================
    flag("usbp", "usb rail powered", 0x40, 0x01),
    flag("crdp", "card reader powered", 0x40, 0x02),
    flag("camp", "camera powered", 0x40, 0x04),
    flag("hdap", "hd audio powered", 0x40, 0x08),
    flag("lanp", "ethernet phy powered", 0x40, 0x10),
    flag("modp", "modem powered", 0x40, 0x20),
    flag("odds", "optical drive powered", 0x40, 0x40),
    flag("sdps", "sata drive powered", 0x40, 0x80),
    flag("usbw", "wake on usb", 0x41, 0x01),
    flag("lanw", "wake on lan", 0x41, 0x02),
    flag("lidw", "wake on lid", 0x41, 0x04),
    flag("rtcw", "wake on rtc", 0x41, 0x08),
    flag("kbdw", "wake on keyboard", 0x41, 0x10),
    flag("tpdw", "wake on touchpad", 0x41, 0x20),
    bits("wkpd", "pending wake source", 0x42, 0x0f),
    bits("slps", "sleep state", 0x42, 0x70),
    flag("dock", "docked", 0x44, 0x01),
    flag("tblt", "tablet mode", 0x44, 0x02),
    flag("rotl", "rotation lock", 0x44, 0x04),
    bits("dkid", "dock id", 0x44, 0xf0),
    // ==================== PERFORMANCE ====================
    flag("cpuf", "cpu fast mode", 0x50, 0x01),
    flag("cpth", "cpu throttled", 0x50, 0x02),
    flag("gpth", "gpu throttled", 0x50, 0x04),
    bits("psta", "power profile", 0x50, 0x18),
    byte("pl1w", "sustained power limit", 0x51),
    byte("pl2w", "burst power limit", 0x52),
    // ==================== FAN CURVE ====================
    byte("ft0t", "fan curve point 0 temperature", 0x60),
    byte("ft0d", "fan curve point 0 duty", 0x61),
    byte("ft1t", "fan curve point 1 temperature", 0x62),
    byte("ft1d", "fan curve point 1 duty", 0x63),
    // ==================== COUNTERS ====================
    word("s3ct", "suspend count", 0x70, 0x71),
    word("btct", "boot count", 0x72, 0x73),
    // ==================== AUDIO ====================
    flag("mute", "speaker mute", 0x90, 0x01),
    flag("spkb", "speaker beep active", 0x90, 0x02),
    flag("micm", "microphone muted", 0x90, 0x04),
    byte("vold", "volume level", 0x91),
    // ==================== INPUT ====================
    flag("tpex", "touchpad present", 0x9e, 0x01),
    TOUCHPAD,
    bits("kbdt", "keyboard type", 0x9e, 0x30),
    // ==================== ADAPTER AND LID ====================
    AC_ADAPTER,
    flag("acov", "adapter over voltage", 0xa2, 0x02),
    bits("acid", "adapter id", 0xa2, 0xf0),
    flag("lidp", "lid switch present", 0xa3, 0x01),
    LID_CLOSED,
    byte("acwt", "adapter rated wattage", 0xa4),
    scaled("acmv", "adapter voltage", 0xa5, 0xa6, 1000),
    scaled("acma", "adapter current", 0xa7, 0xa8, 1000),
    // ==================== THERMAL ====================
    byte("tcrt", "critical trip point", 0xa9),
    byte("tpsv", "passive trip point", 0xaa),
    byte("thot", "hot trip point", 0xab),
    flag("trps", "trip point reached", 0xac, 0x01),
    flag("tfrc", "fan forced to full", 0xac, 0x02),
    flag("tpas", "passive cooling active", 0xac, 0x04),
    byte("tfan", "fan target temperature", 0xad),
    byte("thys", "fan hysteresis", 0xae),
    byte("tavg", "average temperature", 0xaf),
    CPU_TEMP,
    byte("tmp1", "system temperature", 0xb1),
    byte("tmp2", "skin temperature", 0xb2),
    bits("tprf", "thermal profile", 0xb3, 0x03),
    word("fanr", "fan speed rpm", 0xb4, 0xb5),
    flag("ftac", "fan tachometer valid", 0xb6, 0x01),
    // suspect decode: compares the masked nibble against a raw
    // threshold instead of a count; matches the running firmware, so
    // kept until someone with the EC datasheet says otherwise
    Field {
        tag: "fcnt",
        name: "more than one fan",
        register: 0xb6,
        encoding: Encoding::Above {
            mask: 0xf0,
            threshold: 4,
        },
    },
    byte("fpwm", "fan duty cycle", 0xb7),
    // ==================== LIGHTS ====================
    BACKLIGHT,
    KBD_BACKLIGHT,
    flag("kbav", "keyboard backlight fitted", 0xba, 0x02),
    flag("blpw", "panel backlight powered", 0xba, 0x04),
    // ==================== RADIOS ====================
    WIRELESS,
    BLUETOOTH,
    WWAN,
    flag("wlex", "wireless module fitted", 0xbb, 0x10),
    flag("blex", "bluetooth module fitted", 0xbb, 0x20),
    WWAN_PRESENT,
    // alias: combined view of the wlan/blue/wwan bits
    bits("rfst", "radio state bits", 0xbb, 0x07),
    // ==================== AMBIENT LIGHT ====================
    byte("alsv", "ambient light sensor level", 0xbc),
    flag("alse", "ambient light sensor enabled", 0xbd, 0x01),
    // ==================== BATTERY ====================
    BATTERY_PERCENT,
    word("dcap", "battery design capacity", 0xc0, 0xc1),
    BATTERY_REMAINING,
    word("fcap", "battery last full capacity", 0xc4, 0xc5),
    PRESENT_VOLTAGE,
    scaled("dvol", "battery design voltage", 0xc8, 0xc9, 1000),
    word("crnt", "battery present rate", 0xca, 0xcb),
    word("cycl", "battery cycle count", 0xcc, 0xcd),
    scaled("btmp", "battery temperature", 0xce, 0xcf, 10),
    BATTERY_CHARGING,
    BATTERY_DISCHARGING,
    flag("bcrt", "battery level critical", 0xd0, 0x04),
    flag("bful", "battery charge complete", 0xd0, 0x08),
    BATTERY_PRESENT,
    // alias: combined view of the battery status bits
    bits("bsta", "battery status bits", 0xd0, 0x1f),
    bits("berr", "battery controller fault", 0xd1, 0x0f),
    byte("bmdl", "battery model code", 0xd2),
    word("bser", "battery serial number", 0xd3, 0xd4),
    byte("bvnd", "battery vendor code", 0xd5),
    // ==================== CHARGER ====================
    byte("chgi", "charger input current limit", 0xd8),
    scaled("chgv", "charger target voltage", 0xd9, 0xda, 1000),
    flag("chge", "charger enabled", 0xdb, 0x01),
    flag("chgf", "charger fault", 0xdb, 0x02),
    flag("acok", "charger reports ac good", 0xdb, 0x04),
    flag("otgp", "otg boost enabled", 0xdb, 0x08),
];

/// Find a field by its tag
pub fn lookup(tag: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|field| field.tag == tag)
}
