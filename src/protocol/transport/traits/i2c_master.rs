//! Buffered I2C master peripheral, modelled on the classic "two-wire"
//! driver found on most microcontroller cores: writes are staged between
//! `begin_transmission` and `end_transmission`, reads are requested up front
//! and then pulled from a receive buffer.
//!
//! # Completion codes
//!
//! `end_transmission` reports the standard codes:
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | data too long for the transmit buffer |
//! | 2 | NACK on address |
//! | 3 | NACK on data |
//! | 4 | other error |
//!
//! See [`BusError::check`](crate::error::BusError::check) for the translation.

/// Contract the bus-master engine drives.
///
/// Calls are blocking: `end_transmission` and `request_from` return once the
/// driver has concluded the transfer or hit its own timeout.
pub trait I2cMaster {
    /// Bring the peripheral up as bus master.
    fn begin(&mut self);
    /// Set the SCL frequency in Hz.
    fn set_clock(&mut self, hz: u32);
    /// Start staging a write to the 7-bit `address`.
    fn begin_transmission(&mut self, address: u8);
    /// Stage bytes for the pending write; returns how many were buffered.
    fn write(&mut self, data: &[u8]) -> usize;
    /// Send the staged write. `stop = false` keeps the bus for a repeated start.
    fn end_transmission(&mut self, stop: bool) -> u8;
    /// Read up to `length` bytes from `address` into the receive buffer and
    /// return how many were received.
    fn request_from(&mut self, address: u8, length: u8, stop: bool) -> usize;
    /// Bytes left in the receive buffer.
    fn available(&self) -> usize;
    /// Pop one byte from the receive buffer.
    fn read(&mut self) -> Option<u8>;
}
