//! Integration test: a full session against a plausible machine

use acer_ec::registers::{BACKLIGHT, BLUETOOTH, TOUCHPAD};
use acer_ec::Status;

use crate::common::create_mock_ec;
use crate::common::mock_interface::MockInterface;

/// Seed the register file the way a running laptop would look
fn seed_laptop(interface: &MockInterface) {
    interface.set_register(0xbb, 0x33); // wlan+bt on, both fitted
    interface.set_register(0x9e, 0x01); // touchpad fitted and enabled
    interface.set_register(0xb9, 4); // mid brightness
    interface.set_register(0xb0, 52); // cpu at 52'C
    interface.set_register(0xa2, 0x01); // on mains
    interface.set_register(0xd0, 0x11); // battery present, charging
    interface.set_register(0xbf, 78); // 78%
    interface.set_register(0xc2, 0x64); // 356 mAh remaining
    interface.set_register(0xc3, 0x01);
    interface.set_register(0xc6, 0x5c); // 11.1 V
    interface.set_register(0xc7, 0x2b);
}

#[test]
fn status_toggle_and_backlight_session() {
    let (mut ec, interface) = create_mock_ec();
    seed_laptop(&interface);

    let status = Status::read(&mut ec).unwrap();
    assert!(status.wireless);
    assert!(status.bluetooth);
    assert_eq!(status.wwan, None, "no 3G module fitted");
    assert!(status.touchpad);
    assert_eq!(status.brightness, 4);
    assert_eq!(status.cpu_temp, 52);
    assert!(status.ac_online);
    let battery = status.battery.expect("battery is fitted");
    assert_eq!(battery.percent, 78);
    assert!(battery.charging);
    assert_eq!(battery.voltage_mv, 11100);

    // turn bluetooth off; the wireless bit and the presence bits must
    // survive the read-modify-write
    ec.write_flag(&BLUETOOTH, false).unwrap();
    assert_eq!(interface.get_register(0xbb), 0x31);

    // disable the touchpad (sets the inverted bit)
    ec.write_flag(&TOUCHPAD, false).unwrap();
    assert_eq!(interface.get_register(0x9e), 0x09);

    // out-of-range backlight request wraps
    ec.write_level(&BACKLIGHT, 13).unwrap();

    let status = Status::read(&mut ec).unwrap();
    assert!(!status.bluetooth);
    assert!(status.wireless, "wireless must be untouched");
    assert!(!status.touchpad);
    assert_eq!(status.brightness, 3);
}

#[test]
fn wwan_appears_once_the_module_is_fitted() {
    let (mut ec, interface) = create_mock_ec();
    seed_laptop(&interface);

    interface.set_register(0xbb, 0x73); // 3G fitted, radio off
    let status = Status::read(&mut ec).unwrap();
    assert_eq!(status.wwan, Some(false));

    interface.set_register(0xbb, 0x77); // 3G radio on
    let status = Status::read(&mut ec).unwrap();
    assert_eq!(status.wwan, Some(true));
}

#[test]
fn every_read_hits_the_hardware() {
    let (mut ec, interface) = create_mock_ec();
    seed_laptop(&interface);

    Status::read(&mut ec).unwrap();
    let first = interface.operation_count();
    assert!(first > 0);

    Status::read(&mut ec).unwrap();
    assert_eq!(
        interface.operation_count(),
        first * 2,
        "snapshots must not be cached"
    );
}
