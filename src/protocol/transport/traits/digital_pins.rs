//! Digital pin capability addressed by board pin number.
use embedded_hal::digital::PinState;

use crate::core::PinMode;

pub trait DigitalPins {
    /// Configure `pin`.
    fn set_mode(&mut self, pin: u8, mode: PinMode);
    /// Drive `pin` to `state`.
    fn write(&mut self, pin: u8, state: PinState);
    /// Current level of `pin`; for outputs this is the driven level.
    fn read(&mut self, pin: u8) -> PinState;
}
