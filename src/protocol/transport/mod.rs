//! Bridge transport layer: command reassembly, response serialization, the
//! outbound response channel, and the capability traits the firmware
//! implements (byte stream, I2C peripheral, digital pins, clock).
//!
//! ## Wire format
//!
//! ```text
//! host -> device : [N:1][code:1][payload:N-1]      N = 0 is a keepalive
//! device -> host : [N:1][status:1][payload:N-1]    payload <= 254 bytes
//! ```

pub mod command;
pub mod message;
pub mod response_channel;
pub mod traits;

/// Length byte value that carries no command.
pub const KEEPALIVE: u8 = 0;
