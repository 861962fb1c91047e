//! Parameter records carried by command payloads.
//!
//! Every record is decoded field by field after its length has been checked,
//! so a malformed payload is rejected before any bus or pin side effect.
//!
//! # Layouts (little endian)
//!
//! ```text
//! Init          : mode:1, secondary_address:1, clock_khz:2
//! Set-Pin-Mode  : pin:1, mode:1
//! Digital-Write : pin:1, status:1
//! Write         : address:1, data:N        (N >= 0)
//! Read          : address:1, length:1
//! Transaction   : address:1, length:1, data:N (N >= 1)
//! ```
use crate::core::{PinAction, PinMode, MODE_I2C_MASTER};
use crate::error::ParameterError;

//==================================================================================Helpers

fn exact<const N: usize>(payload: &[u8]) -> Result<[u8; N], ParameterError> {
    payload
        .try_into()
        .map_err(|_| ParameterError::InvalidLength {
            expected: N,
            got: payload.len(),
        })
}

fn at_least(payload: &[u8], minimum: usize) -> Result<(), ParameterError> {
    if payload.len() < minimum {
        return Err(ParameterError::TooShort {
            minimum,
            got: payload.len(),
        });
    }
    Ok(())
}

//==================================================================================Init

/// Settings requested by Init for the I2C master role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitParams {
    /// Own address on the bus; kept for a future slave role.
    pub secondary_address: u8,
    /// Bus clock in kHz.
    pub clock_khz: u16,
}

impl InitParams {
    pub const LEN: usize = 4;

    /// Decode the record; only the I2C master mode is accepted.
    pub fn decode(payload: &[u8]) -> Result<Self, ParameterError> {
        let [mode, secondary_address, clock_lo, clock_hi] = exact::<{ InitParams::LEN }>(payload)?;

        if mode != MODE_I2C_MASTER {
            return Err(ParameterError::UnsupportedMode(mode));
        }

        Ok(Self {
            secondary_address,
            clock_khz: u16::from_le_bytes([clock_lo, clock_hi]),
        })
    }

    /// Encode the record for the master role, as the host sends it.
    pub fn encode(&self) -> [u8; Self::LEN] {
        let [clock_lo, clock_hi] = self.clock_khz.to_le_bytes();
        [MODE_I2C_MASTER, self.secondary_address, clock_lo, clock_hi]
    }

    /// Bus clock in Hz.
    #[inline]
    pub fn clock_hz(&self) -> u32 {
        u32::from(self.clock_khz) * 1000
    }
}

//==================================================================================Pins

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinModeParams {
    pub pin: u8,
    pub mode: PinMode,
}

impl PinModeParams {
    pub fn decode(payload: &[u8]) -> Result<Self, ParameterError> {
        let [pin, mode] = exact::<2>(payload)?;
        let mode = PinMode::from_u8(mode).ok_or(ParameterError::UnsupportedPinMode(mode))?;
        Ok(Self { pin, mode })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitalWriteParams {
    pub pin: u8,
    pub action: PinAction,
}

impl DigitalWriteParams {
    pub fn decode(payload: &[u8]) -> Result<Self, ParameterError> {
        let [pin, status] = exact::<2>(payload)?;
        let action =
            PinAction::from_u8(status).ok_or(ParameterError::UnsupportedPinStatus(status))?;
        Ok(Self { pin, action })
    }
}

//==================================================================================Bus master

/// Write request: target address followed by the bytes to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteParams<'a> {
    pub address: u8,
    pub data: &'a [u8],
}

impl<'a> WriteParams<'a> {
    pub fn decode(payload: &'a [u8]) -> Result<Self, ParameterError> {
        at_least(payload, 1)?;
        Ok(Self {
            address: payload[0],
            data: &payload[1..],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadParams {
    pub address: u8,
    pub length: u8,
}

impl ReadParams {
    pub fn decode(payload: &[u8]) -> Result<Self, ParameterError> {
        let [address, length] = exact::<2>(payload)?;
        Ok(Self { address, length })
    }
}

/// Combined write, restart, read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionParams<'a> {
    pub address: u8,
    pub read_length: u8,
    pub data: &'a [u8],
}

impl<'a> TransactionParams<'a> {
    pub fn decode(payload: &'a [u8]) -> Result<Self, ParameterError> {
        at_least(payload, 3)?;
        Ok(Self {
            address: payload[0],
            read_length: payload[1],
            data: &payload[2..],
        })
    }
}
