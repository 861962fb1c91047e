//! Bus-master engine against the simulated bus: completion code mapping,
//! parameter validation before bus access, restart sequences.
mod helpers {
    include!("../../helpers/mod.rs");
}

use bus_bridge::core::StatusCode;
use helpers::{bridge, exchange, BusCall, TestBridge};

const EEPROM: u8 = 0x50;

/// Bridge already committed to master mode with one device on the bus.
fn master() -> TestBridge {
    let mut bridge = bridge();
    bridge.bus_mut().attach(EEPROM);
    let (status, _) = exchange(&mut bridge, 1, &[1, 0, 0x64, 0x00]);
    assert_eq!(status, StatusCode::Ok);
    bridge.bus_mut().calls.clear();
    bridge
}

#[test]
fn test_write_to_absent_device() {
    let mut bridge = master();
    let (status, payload) = exchange(&mut bridge, 3, &[0x21, 0xAA]);
    assert_eq!(status, StatusCode::NackOnAddress);
    assert!(payload.is_empty());
    assert_eq!(
        bridge.bus().calls,
        vec![
            BusCall::BeginTransmission(0x21),
            BusCall::Write(vec![0xAA]),
            BusCall::EndTransmission {
                stop: true,
                code: 2
            },
        ]
    );
}

#[test]
/// Address-only writes check that the device answers.
fn test_address_only_write() {
    let mut bridge = master();
    assert_eq!(exchange(&mut bridge, 3, &[EEPROM]).0, StatusCode::Ok);
    assert_eq!(
        exchange(&mut bridge, 3, &[0x51]).0,
        StatusCode::NackOnAddress
    );
}

#[test]
fn test_empty_write_never_touches_bus() {
    let mut bridge = master();
    let (status, _) = exchange(&mut bridge, 3, &[]);
    assert_eq!(status, StatusCode::BadParameters);
    assert!(bridge.bus().calls.is_empty());
    assert_eq!(bridge.diagnostics().parameter_errors, 1);
}

#[test]
/// Forced completion codes map onto the response taxonomy.
fn test_completion_codes() {
    let mut bridge = master();
    let cases = [
        (0, StatusCode::Ok),
        (1, StatusCode::DataTooLong),
        (2, StatusCode::NackOnAddress),
        (3, StatusCode::NackOnData),
        (4, StatusCode::OtherError),
        (5, StatusCode::OtherError),
    ];
    for (code, expected) in cases {
        bridge.bus_mut().forced_codes.push_back(code);
        let (status, _) = exchange(&mut bridge, 3, &[EEPROM, 0x00]);
        assert_eq!(status, expected, "code {code}");
    }
    assert_eq!(bridge.diagnostics().bus_errors, 5);
}

#[test]
fn test_read_validation() {
    let mut bridge = master();
    assert_eq!(
        exchange(&mut bridge, 4, &[EEPROM]).0,
        StatusCode::BadParameters
    );
    assert_eq!(
        exchange(&mut bridge, 4, &[EEPROM, 1, 2]).0,
        StatusCode::BadParameters
    );
    assert!(bridge.bus().calls.is_empty());
}

#[test]
/// A short read still answers OK with what arrived.
fn test_short_read() {
    let mut bridge = master();
    let device = bridge.bus_mut().attach(EEPROM);
    device.registers[..4].copy_from_slice(&[1, 2, 3, 4]);
    bridge.bus_mut().read_limit = Some(2);

    let (status, data) = exchange(&mut bridge, 4, &[EEPROM, 4]);
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(data, vec![1, 2]);
}

#[test]
/// Nothing answers: the read is empty, not an error.
fn test_read_from_absent_device() {
    let mut bridge = master();
    let (status, data) = exchange(&mut bridge, 4, &[0x22, 8]);
    assert_eq!(status, StatusCode::Ok);
    assert!(data.is_empty());
}

#[test]
/// The write phase keeps the bus, the read follows.
fn test_transaction() {
    let mut bridge = master();
    let device = bridge.bus_mut().attach(EEPROM);
    device.registers[0x40..0x42].copy_from_slice(&[0x12, 0x34]);

    let (status, data) = exchange(&mut bridge, 5, &[EEPROM, 2, 0x40]);
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(data, vec![0x12, 0x34]);
    assert_eq!(
        bridge.bus().calls,
        vec![
            BusCall::BeginTransmission(EEPROM),
            BusCall::Write(vec![0x40]),
            BusCall::EndTransmission {
                stop: false,
                code: 0
            },
            BusCall::RequestFrom {
                address: EEPROM,
                length: 2
            },
        ]
    );
}

#[test]
/// A failed write phase is closed with a stop and nothing is read.
fn test_transaction_failure_stops() {
    let mut bridge = master();
    bridge.bus_mut().forced_codes.push_back(3);

    let (status, data) = exchange(&mut bridge, 5, &[EEPROM, 2, 0x40]);
    assert_eq!(status, StatusCode::NackOnData);
    assert!(data.is_empty());

    let calls = &bridge.bus().calls;
    assert_eq!(
        calls[2],
        BusCall::EndTransmission {
            stop: false,
            code: 3
        }
    );
    assert!(matches!(calls[3], BusCall::EndTransmission { stop: true, .. }));
    assert!(!calls
        .iter()
        .any(|call| matches!(call, BusCall::RequestFrom { .. })));
}

#[test]
fn test_transaction_validation() {
    let mut bridge = master();
    assert_eq!(
        exchange(&mut bridge, 5, &[EEPROM, 2]).0,
        StatusCode::BadParameters
    );
    assert!(bridge.bus().calls.is_empty());
}
