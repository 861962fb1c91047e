//! Wire-level vocabulary shared by the framing layer, the dispatcher and the
//! host-side helpers: command codes, status codes, modes, pin settings and
//! buffer capacities.

/// Capacity of the command payload and of a message buffer.
pub const MAX_PAYLOAD: usize = 256;

/// Largest response payload that fits behind the length and status bytes.
///
/// The length byte tops out at 255 and counts the status byte, leaving 254.
pub const MAX_RESPONSE_PAYLOAD: usize = 254;

/// Default identification string returned by the Version command.
pub const DEFAULT_VERSION: &str = "bus-bridge 0.1.0 proto:1";

/// Bounded byte buffer used for command payloads and response bodies.
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD>;

/// Command identifiers accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommandCode {
    Version = 0,
    Init = 1,
    /// Reserved, no handler recognizes it.
    GetBusType = 2,
    Write = 3,
    Read = 4,
    Transaction = 5,
    SetPinMode = 7,
    DigitalWrite = 8,
    Debug1 = 51,
    Debug2 = 52,
    /// Reserved, no handler recognizes it.
    Debug3 = 53,
}

impl CommandCode {
    /// Map a raw wire byte onto a known command, `None` otherwise.
    pub const fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::Version,
            1 => Self::Init,
            2 => Self::GetBusType,
            3 => Self::Write,
            4 => Self::Read,
            5 => Self::Transaction,
            7 => Self::SetPinMode,
            8 => Self::DigitalWrite,
            51 => Self::Debug1,
            52 => Self::Debug2,
            53 => Self::Debug3,
            _ => return None,
        })
    }
}

impl From<CommandCode> for u8 {
    fn from(code: CommandCode) -> Self {
        code as u8
    }
}

/// Status byte leading every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StatusCode {
    Ok = 0,
    Error = 1,
    /// Reserved.
    CmdUnavailable = 2,
    WrongCommand = 3,
    BadParameters = 4,
    /// Reserved.
    ShortWrite = 5,
    NackOnAddress = 6,
    NackOnData = 7,
    DataTooLong = 8,
    OtherError = 9,
}

impl StatusCode {
    pub const fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::Ok,
            1 => Self::Error,
            2 => Self::CmdUnavailable,
            3 => Self::WrongCommand,
            4 => Self::BadParameters,
            5 => Self::ShortWrite,
            6 => Self::NackOnAddress,
            7 => Self::NackOnData,
            8 => Self::DataTooLong,
            9 => Self::OtherError,
            _ => return None,
        })
    }

    /// Whether the status reports a failed bus transfer rather than a
    /// refused command.
    pub const fn is_bus_error(self) -> bool {
        matches!(
            self,
            Self::ShortWrite
                | Self::NackOnAddress
                | Self::NackOnData
                | Self::DataTooLong
                | Self::OtherError
        )
    }
}

impl From<StatusCode> for u8 {
    fn from(status: StatusCode) -> Self {
        status as u8
    }
}

/// Operating mode of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMode {
    /// Power-on state, only Init and the common commands are served.
    #[default]
    Undefined,
    /// I2C master, entered through Init.
    BusMaster,
    /// Reserved, never entered.
    BusSlave,
}

/// Init mode byte selecting the I2C master role.
pub const MODE_I2C_MASTER: u8 = 1;

/// Pin configurations accepted by Set-Pin-Mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PinMode {
    DigitalOut = 0x01,
}

impl PinMode {
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0x01 => Some(Self::DigitalOut),
            _ => None,
        }
    }
}

/// Actions accepted by Digital-Write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PinAction {
    High = 0x10,
    Low = 0x11,
    Toggle = 0x12,
}

impl PinAction {
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0x10 => Some(Self::High),
            0x11 => Some(Self::Low),
            0x12 => Some(Self::Toggle),
            _ => None,
        }
    }
}

impl From<PinMode> for u8 {
    fn from(mode: PinMode) -> Self {
        mode as u8
    }
}

impl From<PinAction> for u8 {
    fn from(action: PinAction) -> Self {
        action as u8
    }
}
