//! Commands served while the device mode is still `Undefined`: only Init.
use crate::core::{CommandCode, Payload};
use crate::error::CommandError;
use crate::infra::params::InitParams;
use crate::protocol::dispatch::mode::ModeState;
use crate::protocol::dispatch::Handled;
use crate::protocol::transport::traits::i2c_master::I2cMaster;

pub fn handle<B: I2cMaster>(
    code: CommandCode,
    payload: &[u8],
    state: &mut ModeState,
    bus: &mut B,
) -> Handled {
    match code {
        CommandCode::Init => Some(init(payload, state, bus)),
        _ => None,
    }
}

/// Validate the Init record, bring the bus up and commit to master mode.
fn init<B: I2cMaster>(
    payload: &[u8],
    state: &mut ModeState,
    bus: &mut B,
) -> Result<Payload, CommandError> {
    let params = InitParams::decode(payload)?;

    state.enter_bus_master(params)?;
    bus.begin();
    bus.set_clock(params.clock_hz());

    Ok(Payload::new())
}
