//! Port enumeration and discovery against the real system

use cutkit_communication::{discover_device, list_ports};
use cutkit_core::known_devices;

#[test]
fn test_listed_ports_look_like_usb_serial() {
    // Enumeration may be unavailable in a sandbox; only check what it returns
    if let Ok(ports) = list_ports() {
        for port in ports {
            let name = port.port_name.as_str();
            assert!(
                name.starts_with("COM") || name.starts_with("/dev/tty") || name.starts_with("/dev/cu."),
                "unexpected port {}",
                name
            );
        }
    }
}

#[test]
fn test_discovery_only_returns_known_devices() {
    let devices = known_devices();
    if let Ok(Some((port, device))) = discover_device(&devices) {
        assert_eq!(port.vid, device.vendor_id);
        assert_eq!(port.pid, device.product_id);
    }
}
