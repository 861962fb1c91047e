//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (parameter validation, bus
//! completion codes, mode transition, response slot occupancy). None of them
//! crosses the transport: the dispatcher folds them into a status byte.
use crate::core::StatusCode;
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Validation failures detected before any bus or pin side effect.
pub enum ParameterError {
    /// Payload does not have the exact size the record requires.
    #[error("Invalid payload length -> expected: {expected}, got: {got}")]
    InvalidLength { expected: usize, got: usize },
    /// Payload is shorter than the minimum the command requires.
    #[error("Payload too short -> minimum: {minimum}, got: {got}")]
    TooShort { minimum: usize, got: usize },
    /// Init requested a mode this firmware cannot enter.
    #[error("Unsupported device mode: {0}")]
    UnsupportedMode(u8),
    /// Set-Pin-Mode requested an unknown pin configuration.
    #[error("Unsupported pin mode: {0:#04x}")]
    UnsupportedPinMode(u8),
    /// Digital-Write requested an unknown pin action.
    #[error("Unsupported pin status: {0:#04x}")]
    UnsupportedPinStatus(u8),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Non-zero completion codes reported by the bus driver.
pub enum BusError {
    /// Code 1: data did not fit the driver's transmit buffer.
    #[error("Data too long for transmit buffer")]
    DataTooLong,
    /// Code 2: target did not acknowledge its address.
    #[error("NACK on address")]
    NackOnAddress,
    /// Code 3: target did not acknowledge a data byte.
    #[error("NACK on data")]
    NackOnData,
    /// Code 4 or anything unknown.
    #[error("Other bus error (code {0})")]
    Other(u8),
}

impl BusError {
    /// Translate a driver completion code; `Ok(())` for code 0.
    pub const fn check(code: u8) -> Result<(), BusError> {
        match code {
            0 => Ok(()),
            1 => Err(BusError::DataTooLong),
            2 => Err(BusError::NackOnAddress),
            3 => Err(BusError::NackOnData),
            other => Err(BusError::Other(other)),
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            BusError::DataTooLong => StatusCode::DataTooLong,
            BusError::NackOnAddress => StatusCode::NackOnAddress,
            BusError::NackOnData => StatusCode::NackOnData,
            BusError::Other(_) => StatusCode::OtherError,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors produced while executing a recognized command.
pub enum CommandError {
    /// Request failed validation.
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    /// Bus transaction concluded with an error code.
    #[error(transparent)]
    Bus(#[from] BusError),
    /// Requested mode change is not allowed from the current mode.
    #[error(transparent)]
    Mode(#[from] ModeError),
}

impl CommandError {
    /// Status byte reported to the host for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            CommandError::Parameters(_) => StatusCode::BadParameters,
            CommandError::Bus(err) => err.status(),
            CommandError::Mode(_) => StatusCode::Error,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Rejected mode transitions.
pub enum ModeError {
    /// The mode was already committed; only a power cycle reverts it.
    #[error("Mode already committed")]
    AlreadyCommitted,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A message was offered to a slot that still holds an undrained one.
#[error("Response slot {slot} is busy")]
pub struct SlotBusy {
    pub slot: usize,
}

//==================================================================================HOST_HELPERS
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised by the host-side framing helpers.
pub enum FrameError {
    /// Payload cannot be described by a single length byte.
    #[error("Payload too long for one frame: {len} bytes")]
    PayloadTooLong { len: usize },
    /// Destination buffer cannot hold the frame.
    #[error("Buffer too small -> asked: {asked}, available: {available}")]
    BufferTooSmall { asked: usize, available: usize },
    /// Response is empty or its length byte disagrees with the bytes present.
    #[error("Truncated response")]
    Truncated,
    /// Response status byte is not a known status code.
    #[error("Unknown status code: {0}")]
    UnknownStatus(u8),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures seen by the host side of the link.
pub enum HostError {
    /// Device refused the command (wrong command, bad parameters, ...).
    #[error("Command refused with status {0:?}")]
    Protocol(StatusCode),
    /// Device ran the transfer and the bus reported a failure.
    #[error("Bus error: {0:?}")]
    Bus(StatusCode),
    /// Reply carries a payload the command never produces.
    #[error("Unexpected payload of {len} bytes")]
    UnexpectedPayload { len: usize },
    /// Bus answered with fewer bytes than requested.
    #[error("Short read -> expected: {expected}, got: {got}")]
    ShortRead { expected: usize, got: usize },
    /// Link went quiet in the middle of a response.
    #[error("Short response -> expected: {expected}, got: {got}")]
    Truncated { expected: usize, got: usize },
    /// Nothing arrived, or the link refused to take the command.
    #[error("Timeout")]
    Timeout,
    /// Frame could not be encoded or decoded.
    #[error(transparent)]
    Frame(#[from] FrameError),
    /// Request rejected before it was sent.
    #[error(transparent)]
    Parameters(#[from] ParameterError),
}
