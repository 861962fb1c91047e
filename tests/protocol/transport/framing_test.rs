//! Framing through the whole loop: split bursts, keepalives, slow transport,
//! back-pressure and the 254-byte response clip.
mod helpers {
    include!("../../helpers/mod.rs");
}

use bus_bridge::core::StatusCode;
use helpers::{bridge, exchange, frame, settle};

#[test]
/// A command trickling in one byte per poll is assembled unchanged.
fn test_byte_per_poll() {
    let mut bridge = bridge();
    let bytes = frame(8, &[4, 0x10]);

    for (index, &byte) in bytes.iter().enumerate() {
        bridge.stream_mut().push_rx(&[byte]);
        let report = bridge.poll();
        assert_eq!(report.bytes_read, 1);
        let last = index + 1 == bytes.len();
        assert_eq!(report.dispatched.is_some(), last, "byte {index}");
    }

    let responses = bridge.stream_mut().take_responses();
    assert_eq!(responses, vec![(StatusCode::Ok, vec![])]);
    assert_eq!(bridge.pins().level(4), embedded_hal::digital::PinState::High);
}

#[test]
/// Keepalive bytes between and before commands are skipped and counted.
fn test_keepalives() {
    let mut bridge = bridge();
    let mut bytes = vec![0, 0];
    bytes.extend(frame(0, &[]));
    bytes.push(0);
    bytes.extend(frame(51, &[]));
    bridge.stream_mut().push_rx(&bytes);
    settle(&mut bridge);

    let responses = bridge.stream_mut().take_responses();
    assert_eq!(responses.len(), 2);
    assert!(responses.iter().all(|(status, _)| *status == StatusCode::Ok));
    assert_eq!(bridge.diagnostics().keepalives, 3);
    assert_eq!(bridge.diagnostics().bytes_received, bytes.len() as u32);
}

#[test]
/// A ready command stops the reader; the next one stays in the transport.
fn test_ready_command_blocks_reading() {
    let mut bridge = bridge();
    let mut bytes = frame(0, &[]);
    bytes.extend(frame(0, &[]));
    bridge.stream_mut().push_rx(&bytes);

    let report = bridge.poll();
    assert_eq!(report.bytes_read, 2);
    assert_eq!(bridge.stream().rx.len(), 2);

    settle(&mut bridge);
    assert_eq!(bridge.stream_mut().take_responses().len(), 2);
}

#[test]
/// A transport accepting three bytes per write still receives every
/// response whole and in command order.
fn test_slow_transport() {
    let mut bridge = bridge();
    bridge.stream_mut().write_budget = Some(3);

    let mut bytes = Vec::new();
    for code in [0, 99, 51, 7] {
        bytes.extend(frame(code, &[]));
    }
    bridge.stream_mut().push_rx(&bytes);
    settle(&mut bridge);

    let statuses: Vec<StatusCode> = bridge
        .stream_mut()
        .take_responses()
        .into_iter()
        .map(|(status, _)| status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            StatusCode::Ok,
            StatusCode::WrongCommand,
            StatusCode::Ok,
            StatusCode::BadParameters,
        ]
    );
    assert_eq!(bridge.diagnostics().responses_sent, 4);
}

#[test]
/// Every ready command gets exactly one reply, whatever its code.
fn test_one_response_per_command() {
    let mut bridge = bridge();
    for code in 0..=u8::MAX {
        if code == 1 {
            // Init would change the mode under the loop.
            continue;
        }
        let (status, _) = exchange(&mut bridge, code, &[]);
        let expected = match code {
            0 | 51 | 52 => StatusCode::Ok,
            7 | 8 => StatusCode::BadParameters,
            _ => StatusCode::WrongCommand,
        };
        assert_eq!(status, expected, "code {code}");
    }
    assert_eq!(bridge.diagnostics().commands_dispatched, 255);
}

#[test]
/// A 255-byte read is clipped to 254 payload bytes on the wire.
fn test_long_read_is_clipped() {
    let mut bridge = bridge();
    bridge.bus_mut().attach(0x20);
    exchange(&mut bridge, 1, &[1, 0, 0x64, 0x00]);

    bridge.stream_mut().push_rx(&frame(4, &[0x20, 255]));
    settle(&mut bridge);

    assert_eq!(bridge.stream().tx[0], 255);
    assert_eq!(bridge.stream().tx.len(), 256);
    let responses = bridge.stream_mut().take_responses();
    assert_eq!(responses[0].0, StatusCode::Ok);
    assert_eq!(responses[0].1.len(), 254);
    assert_eq!(bridge.diagnostics().responses_truncated, 1);
}

#[test]
/// The largest frame the host can send is accepted.
fn test_largest_command() {
    let mut bridge = bridge();
    bridge.bus_mut().attach(0x30);
    exchange(&mut bridge, 1, &[1, 0, 0x64, 0x00]);

    let mut payload = vec![0x30];
    payload.extend((0..253).map(|i| i as u8));
    assert_eq!(frame(3, &payload)[0], 255);

    // 253 data bytes overflow the 32-byte bus buffer.
    let (status, _) = exchange(&mut bridge, 3, &payload);
    assert_eq!(status, StatusCode::DataTooLong);
}
