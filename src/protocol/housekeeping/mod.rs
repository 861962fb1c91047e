//! Periodic housekeeping: a fixed-rate tick (20 Hz by default) driving the
//! heartbeat LED, independent from command processing.
//!
//! # Heartbeat pattern
//!
//! With the default 20 Hz rate one cycle lasts twenty ticks (one second):
//!
//! - `Undefined`: LED on for half the cycle, a steady 1 Hz blink.
//! - `BusMaster`: LED on for a single tick, a short pulse every second.
//!
//! Once the host takes over the LED pin through Set-Pin-Mode the heartbeat
//! stops for good.
use embassy_time::{Duration, Instant};
use embedded_hal::digital::PinState;

use crate::core::{DeviceMode, PinMode};
use crate::protocol::transport::traits::digital_pins::DigitalPins;

/// Ticks per heartbeat cycle.
const CYCLE_TICKS: u32 = 20;

#[derive(Debug, Clone)]
pub struct Heartbeat {
    pin: u8,
    period: Duration,
    last_tick: Option<Instant>,
    ticks: u32,
    level: PinState,
    suspended: bool,
}

impl Heartbeat {
    pub const fn new(pin: u8, period: Duration) -> Self {
        Self {
            pin,
            period,
            last_tick: None,
            ticks: 0,
            level: PinState::Low,
            suspended: false,
        }
    }

    #[inline]
    pub fn pin(&self) -> u8 {
        self.pin
    }

    #[inline]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Number of ticks elapsed since start.
    #[inline]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Configure the LED pin and anchor the tick schedule at `now`.
    pub fn start<P: DigitalPins>(&mut self, pins: &mut P, now: Instant) {
        self.last_tick = Some(now);
        if self.suspended {
            return;
        }
        pins.set_mode(self.pin, PinMode::DigitalOut);
        pins.write(self.pin, PinState::Low);
        self.level = PinState::Low;
    }

    /// Stop driving the LED pin; there is no way back.
    pub fn suspend(&mut self) {
        if !self.suspended {
            #[cfg(feature = "defmt")]
            defmt::info!("Heartbeat suspended, pin {} handed to host", self.pin);
        }
        self.suspended = true;
    }

    /// Run at most one tick if its period has elapsed.
    ///
    /// The schedule advances by exactly one period per tick so the average
    /// rate stays fixed even when the loop runs late. Returns `true` on a tick.
    pub fn poll<P: DigitalPins>(&mut self, now: Instant, mode: DeviceMode, pins: &mut P) -> bool {
        let Some(last) = self.last_tick else {
            self.start(pins, now);
            return false;
        };

        if now < last + self.period {
            return false;
        }

        self.last_tick = Some(last + self.period);
        self.ticks = self.ticks.wrapping_add(1);

        if self.suspended {
            return true;
        }

        let level = Self::pattern(mode, self.ticks % CYCLE_TICKS);
        if level != self.level {
            pins.write(self.pin, level);
            self.level = level;
        }

        true
    }

    fn pattern(mode: DeviceMode, phase: u32) -> PinState {
        let lit = match mode {
            DeviceMode::BusMaster => phase == 0,
            DeviceMode::Undefined | DeviceMode::BusSlave => phase < CYCLE_TICKS / 2,
        };
        PinState::from(lit)
    }
}
