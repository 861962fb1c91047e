//! Mode-independent commands: version query, pin configuration, pin
//! write and the debug snapshots.
use embedded_hal::digital::PinState;

use crate::core::{CommandCode, Payload, PinAction, PinMode};
use crate::error::CommandError;
use crate::infra::params::{DigitalWriteParams, PinModeParams};
use crate::protocol::dispatch::diagnostics::Diagnostics;
use crate::protocol::dispatch::{to_payload, Handled};
use crate::protocol::housekeeping::Heartbeat;
use crate::protocol::transport::traits::digital_pins::DigitalPins;

/// Serve `code` if it is a common command, `None` otherwise.
pub fn handle<P: DigitalPins>(
    code: CommandCode,
    payload: &[u8],
    version: &str,
    diagnostics: &Diagnostics,
    pins: &mut P,
    heartbeat: &mut Heartbeat,
) -> Handled {
    let result = match code {
        CommandCode::Version => Ok(to_payload(version.as_bytes())),
        CommandCode::SetPinMode => set_pin_mode(payload, pins, heartbeat),
        CommandCode::DigitalWrite => digital_write(payload, pins),
        CommandCode::Debug1 => Ok(to_payload(&diagnostics.dispatch_snapshot())),
        CommandCode::Debug2 => Ok(to_payload(&diagnostics.transport_snapshot())),
        _ => return None,
    };
    Some(result)
}

fn set_pin_mode<P: DigitalPins>(
    payload: &[u8],
    pins: &mut P,
    heartbeat: &mut Heartbeat,
) -> Result<Payload, CommandError> {
    let params = PinModeParams::decode(payload)?;

    match params.mode {
        PinMode::DigitalOut => pins.set_mode(params.pin, PinMode::DigitalOut),
    }

    if params.pin == heartbeat.pin() {
        heartbeat.suspend();
    }

    Ok(Payload::new())
}

fn digital_write<P: DigitalPins>(payload: &[u8], pins: &mut P) -> Result<Payload, CommandError> {
    let params = DigitalWriteParams::decode(payload)?;

    let state = match params.action {
        PinAction::High => PinState::High,
        PinAction::Low => PinState::Low,
        PinAction::Toggle => !pins.read(params.pin),
    };
    pins.write(params.pin, state);

    Ok(Payload::new())
}
