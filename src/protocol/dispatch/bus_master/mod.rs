//! I2C master engine: Write, Read and combined Write+Restart+Read
//! transactions against the bus driver.
//!
//! Completion codes from the driver are translated with
//! [`BusError::check`]; a failed restart-write is always followed by a stop
//! so the bus is released before the error is reported.
use crate::core::{CommandCode, Payload};
use crate::error::{BusError, CommandError};
use crate::infra::params::{ReadParams, TransactionParams, WriteParams};
use crate::protocol::dispatch::Handled;
use crate::protocol::transport::traits::i2c_master::I2cMaster;

pub fn handle<B: I2cMaster>(code: CommandCode, payload: &[u8], bus: &mut B) -> Handled {
    // Read ends with its own reply; it never runs the Transaction logic.
    let result = match code {
        CommandCode::Write => write(payload, bus),
        CommandCode::Read => read(payload, bus),
        CommandCode::Transaction => transaction(payload, bus),
        _ => return None,
    };
    Some(result)
}

/// `[address][data...]`: one write terminated by a stop.
fn write<B: I2cMaster>(payload: &[u8], bus: &mut B) -> Result<Payload, CommandError> {
    let params = WriteParams::decode(payload)?;

    bus.begin_transmission(params.address);
    bus.write(params.data);
    let code = bus.end_transmission(true);

    if let Err(err) = BusError::check(code) {
        #[cfg(feature = "defmt")]
        defmt::warn!("Write to {=u8:#x} failed: {}", params.address, err);
        return Err(err.into());
    }

    Ok(Payload::new())
}

/// `[address][length]`: request and collect what the target returns.
fn read<B: I2cMaster>(payload: &[u8], bus: &mut B) -> Result<Payload, CommandError> {
    let params = ReadParams::decode(payload)?;
    Ok(collect(bus, params.address, params.length))
}

/// `[address][length][data...]`: write without stop, then read after a restart.
fn transaction<B: I2cMaster>(payload: &[u8], bus: &mut B) -> Result<Payload, CommandError> {
    let params = TransactionParams::decode(payload)?;

    bus.begin_transmission(params.address);
    bus.write(params.data);
    let code = bus.end_transmission(false);

    if let Err(err) = BusError::check(code) {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "Transaction write to {=u8:#x} failed: {}, releasing bus",
            params.address,
            err
        );
        // Nothing staged: this only emits the stop condition.
        if let Err(stop_err) = BusError::check(bus.end_transmission(true)) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Stop to {=u8:#x} failed too: {}", params.address, stop_err);
            #[cfg(not(feature = "defmt"))]
            let _ = stop_err;
        }
        return Err(err.into());
    }

    Ok(collect(bus, params.address, params.read_length))
}

/// Request `length` bytes and drain the receive buffer.
///
/// Bytes beyond the payload capacity are read and dropped. A short read is
/// not an error: the host compares the payload length with what it asked for.
fn collect<B: I2cMaster>(bus: &mut B, address: u8, length: u8) -> Payload {
    bus.request_from(address, length, true);

    let mut received = Payload::new();
    while bus.available() > 0 {
        let Some(byte) = bus.read() else {
            break;
        };
        let _ = received.push(byte);
    }

    #[cfg(feature = "defmt")]
    if received.len() < usize::from(length) {
        defmt::debug!(
            "Short read from {=u8:#x}: {} of {} bytes",
            address,
            received.len(),
            length
        );
    }

    received
}
