//! Runtime configuration of the bridge.
//!
//! Everything the firmware may want to tune without touching the protocol
//! lives here; wire limits stay as constants in [`crate::core`].
//!
//! ```
//! use bus_bridge::config::BridgeConfig;
//!
//! let config = BridgeConfig::new()
//!     .with_heartbeat_pin(25)
//!     .with_tick_rate_hz(10)
//!     .with_version("my-board proto:1");
//!
//! assert_eq!(config.heartbeat_pin(), 25);
//! assert_eq!(config.tick_period().as_millis(), 100);
//! ```
use embassy_time::Duration;

use crate::core::DEFAULT_VERSION;

/// Pin driving the status LED on most boards.
pub const DEFAULT_HEARTBEAT_PIN: u8 = 13;

/// Housekeeping tick rate.
pub const DEFAULT_TICK_RATE_HZ: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    heartbeat_pin: u8,
    tick_period: Duration,
    version: &'static str,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeConfig {
    pub const fn new() -> Self {
        Self {
            heartbeat_pin: DEFAULT_HEARTBEAT_PIN,
            tick_period: Duration::from_hz(DEFAULT_TICK_RATE_HZ),
            version: DEFAULT_VERSION,
        }
    }

    /// Pin toggled by the heartbeat.
    pub const fn with_heartbeat_pin(mut self, pin: u8) -> Self {
        self.heartbeat_pin = pin;
        self
    }

    /// Housekeeping rate; zero is clamped to 1 Hz.
    pub const fn with_tick_rate_hz(mut self, hz: u64) -> Self {
        let hz = if hz == 0 { 1 } else { hz };
        self.tick_period = Duration::from_hz(hz);
        self
    }

    /// Identification string returned by the Version command.
    ///
    /// Strings longer than a response payload are clipped on the wire.
    pub const fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }

    #[inline]
    pub const fn heartbeat_pin(&self) -> u8 {
        self.heartbeat_pin
    }

    #[inline]
    pub const fn tick_period(&self) -> Duration {
        self.tick_period
    }

    #[inline]
    pub const fn version(&self) -> &'static str {
        self.version
    }
}
