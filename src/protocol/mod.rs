//! High-level components of the bridge protocol: byte framing and response
//! channel, command dispatch with its mode state machine, the periodic
//! housekeeping, and the host end of the link.
pub mod dispatch;
pub mod host;
pub mod housekeeping;
pub mod transport;
