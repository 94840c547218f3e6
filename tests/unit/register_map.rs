//! Unit tests for the register field table
//!
//! The table is pure data, but data with invariants: masks must not
//! collide, composites must keep the low byte at the lower address,
//! tags must be usable in the fixed-width field dump.

use acer_ec::registers::{self, Encoding, FIELDS};

/// Tags that are intentional combined views of other fields' bits
const ALIASES: &[&str] = &["rfst", "bsta"];

/// Bits a field occupies in a given register
fn occupancy(field: &acer_ec::Field) -> Vec<(u8, u8)> {
    match field.encoding {
        Encoding::Flag { mask, .. } | Encoding::Bits { mask } | Encoding::Above { mask, .. } => {
            vec![(field.register, mask)]
        }
        Encoding::Byte | Encoding::Level { .. } => vec![(field.register, 0xff)],
        Encoding::Word { high } | Encoding::Scaled { high, .. } => {
            vec![(field.register, 0xff), (high, 0xff)]
        }
    }
}

#[test]
fn tags_are_four_characters_and_unique() {
    for field in FIELDS {
        assert_eq!(
            field.tag.len(),
            4,
            "tag '{}' must be exactly four characters",
            field.tag
        );
    }
    for (i, a) in FIELDS.iter().enumerate() {
        for b in &FIELDS[i + 1..] {
            assert_ne!(a.tag, b.tag, "duplicate tag '{}'", a.tag);
        }
    }
}

#[test]
fn masks_are_nonzero() {
    for field in FIELDS {
        for (register, mask) in occupancy(field) {
            assert_ne!(
                mask, 0,
                "field '{}' occupies no bits of register {register:#04x}",
                field.tag
            );
        }
    }
}

#[test]
fn masks_do_not_overlap_within_a_register() {
    for (i, a) in FIELDS.iter().enumerate() {
        for b in &FIELDS[i + 1..] {
            if ALIASES.contains(&a.tag) || ALIASES.contains(&b.tag) {
                continue;
            }
            for (reg_a, mask_a) in occupancy(a) {
                for (reg_b, mask_b) in occupancy(b) {
                    if reg_a == reg_b {
                        assert_eq!(
                            mask_a & mask_b,
                            0,
                            "fields '{}' and '{}' overlap in register {reg_a:#04x}",
                            a.tag,
                            b.tag
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn composites_keep_the_low_byte_at_the_lower_address() {
    for field in FIELDS {
        if let Encoding::Word { high } | Encoding::Scaled { high, .. } = field.encoding {
            assert_eq!(
                high,
                field.register + 1,
                "field '{}': high byte must sit just above the low byte",
                field.tag
            );
        }
    }
}

#[test]
fn lookup_resolves_known_tags() {
    assert_eq!(registers::lookup("wlan"), Some(&registers::WIRELESS));
    assert_eq!(registers::lookup("blue"), Some(&registers::BLUETOOTH));
    assert_eq!(registers::lookup("tpad"), Some(&registers::TOUCHPAD));
    assert_eq!(registers::lookup("rcap"), Some(&registers::BATTERY_REMAINING));
    assert_eq!(registers::lookup("nope"), None);
}

#[test]
fn touchpad_polarity_is_inverted() {
    // bit 3 of 0x9e set means the touchpad is OFF; this has bitten
    // people before, so pin it
    assert_eq!(
        registers::TOUCHPAD.encoding,
        Encoding::Flag {
            mask: 0x08,
            inverted: true
        }
    );
    assert_eq!(registers::TOUCHPAD.register, 0x9e);
}

#[test]
fn radio_bits_match_the_chip() {
    assert_eq!(registers::WIRELESS.register, 0xbb);
    assert_eq!(
        registers::WIRELESS.encoding,
        Encoding::Flag {
            mask: 0x01,
            inverted: false
        }
    );
    assert_eq!(
        registers::BLUETOOTH.encoding,
        Encoding::Flag {
            mask: 0x02,
            inverted: false
        }
    );
}

#[test]
fn voltage_fields_scale_by_a_thousand() {
    match registers::PRESENT_VOLTAGE.encoding {
        Encoding::Scaled { divisor, .. } => assert_eq!(divisor, 1000),
        other => panic!("present voltage should be scaled, got {other:?}"),
    }
}
