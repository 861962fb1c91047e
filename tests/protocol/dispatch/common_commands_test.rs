//! Commands served in every mode, and the heartbeat running beside them.
mod helpers {
    include!("../../helpers/mod.rs");
}

use bus_bridge::{
    config::BridgeConfig,
    core::{PinMode, StatusCode},
};
use embedded_hal::digital::PinState;
use helpers::{bridge, bridge_with, exchange, TestBridge};

const LED: u8 = 13;

/// Advance the clock one housekeeping period per poll.
fn tick(bridge: &mut TestBridge, ticks: usize) {
    for _ in 0..ticks {
        bridge.clock_mut().advance(50);
        assert!(bridge.poll().ticked);
    }
}

fn counters(payload: &[u8]) -> Vec<u32> {
    payload
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[test]
fn test_default_version() {
    let mut bridge = bridge();
    let (status, payload) = exchange(&mut bridge, 0, &[]);
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(payload, b"bus-bridge 0.1.0 proto:1");
}

#[test]
fn test_configured_version() {
    let mut bridge = bridge_with(BridgeConfig::new().with_version("lab-rig 3 proto:1"));
    let (_, payload) = exchange(&mut bridge, 0, &[]);
    assert_eq!(payload, b"lab-rig 3 proto:1");
}

#[test]
/// Common commands keep working after the switch to master mode.
fn test_served_in_master_mode() {
    let mut bridge = bridge();
    exchange(&mut bridge, 1, &[1, 0, 0x64, 0x00]);
    assert_eq!(exchange(&mut bridge, 0, &[]).0, StatusCode::Ok);
    assert_eq!(exchange(&mut bridge, 7, &[2, 0x01]).0, StatusCode::Ok);
    assert_eq!(exchange(&mut bridge, 8, &[2, 0x12]).0, StatusCode::Ok);
    assert_eq!(bridge.pins().level(2), PinState::High);
}

#[test]
fn test_pin_validation() {
    let mut bridge = bridge();
    assert_eq!(exchange(&mut bridge, 7, &[3, 0x02]).0, StatusCode::BadParameters);
    assert_eq!(exchange(&mut bridge, 7, &[3]).0, StatusCode::BadParameters);
    assert_eq!(exchange(&mut bridge, 8, &[3, 0x13]).0, StatusCode::BadParameters);
    assert_eq!(exchange(&mut bridge, 8, &[3, 0x10, 0]).0, StatusCode::BadParameters);
    assert!(!bridge.pins().modes.contains_key(&3));
    assert_eq!(bridge.pins().writes_to(3), 0);
}

#[test]
/// Slow blink while the mode is undefined: ten ticks on, ten off.
fn test_heartbeat_undefined() {
    let mut bridge = bridge();
    assert_eq!(bridge.pins().modes.get(&LED), Some(&PinMode::DigitalOut));
    assert_eq!(bridge.pins().level(LED), PinState::Low);

    tick(&mut bridge, 1);
    assert_eq!(bridge.pins().level(LED), PinState::High);
    tick(&mut bridge, 9);
    assert_eq!(bridge.pins().level(LED), PinState::Low);
    tick(&mut bridge, 10);
    assert_eq!(bridge.pins().level(LED), PinState::High);
}

#[test]
/// One lit tick per cycle in master mode.
fn test_heartbeat_master() {
    let mut bridge = bridge();
    exchange(&mut bridge, 1, &[1, 0, 0x64, 0x00]);
    let before = bridge.pins().writes_to(LED);

    tick(&mut bridge, 40);
    // Ticks 20 and 40 light the LED, tick 21 clears it.
    assert_eq!(bridge.heartbeat().ticks(), 40);
    assert_eq!(bridge.pins().writes_to(LED) - before, 3);
    assert_eq!(bridge.pins().level(LED), PinState::High);
}

#[test]
/// Once the host owns the LED pin the heartbeat leaves it alone.
fn test_heartbeat_suspended_by_host() {
    let mut bridge = bridge();
    assert_eq!(exchange(&mut bridge, 7, &[LED, 0x01]).0, StatusCode::Ok);
    assert_eq!(exchange(&mut bridge, 8, &[LED, 0x10]).0, StatusCode::Ok);
    assert!(bridge.heartbeat().is_suspended());
    let before = bridge.pins().writes_to(LED);

    tick(&mut bridge, 30);
    assert_eq!(bridge.pins().writes_to(LED), before);
    assert_eq!(bridge.pins().level(LED), PinState::High);
}

#[test]
fn test_heartbeat_on_custom_pin() {
    let mut bridge = bridge_with(BridgeConfig::new().with_heartbeat_pin(2));
    tick(&mut bridge, 1);
    assert_eq!(bridge.pins().level(2), PinState::High);
    assert_eq!(bridge.pins().writes_to(LED), 0);

    // Pin 13 is an ordinary pin here.
    exchange(&mut bridge, 7, &[LED, 0x01]);
    assert!(!bridge.heartbeat().is_suspended());
}

#[test]
fn test_debug1() {
    let mut bridge = bridge();
    exchange(&mut bridge, 42, &[]);
    exchange(&mut bridge, 8, &[1]);
    exchange(&mut bridge, 0, &[]);

    let (status, payload) = exchange(&mut bridge, 51, &[]);
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(counters(&payload), vec![4, 1, 1, 0]);
}

#[test]
/// Debug2 reports transport counters, including the bytes of the request.
fn test_debug2() {
    let mut bridge = bridge();
    bridge.stream_mut().push_rx(&[0, 0]);
    exchange(&mut bridge, 0, &[]);

    let (status, payload) = exchange(&mut bridge, 52, &[]);
    assert_eq!(status, StatusCode::Ok);
    assert_eq!(counters(&payload), vec![6, 2, 1, 0]);
}
