//! Device mode state machine.
//!
//! ```text
//! Undefined --Init(master)--> BusMaster
//! ```
//!
//! The transition is one-way: only a power cycle brings the device back to
//! `Undefined`.
use crate::core::DeviceMode;
use crate::error::ModeError;
use crate::infra::params::InitParams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeState {
    mode: DeviceMode,
    master: Option<InitParams>,
}

impl ModeState {
    pub const fn new() -> Self {
        Self {
            mode: DeviceMode::Undefined,
            master: None,
        }
    }

    #[inline]
    pub fn mode(&self) -> DeviceMode {
        self.mode
    }

    /// Settings the master role was entered with.
    #[inline]
    pub fn master_settings(&self) -> Option<&InitParams> {
        self.master.as_ref()
    }

    /// Commit to the bus-master role.
    pub fn enter_bus_master(&mut self, params: InitParams) -> Result<(), ModeError> {
        if self.mode != DeviceMode::Undefined {
            return Err(ModeError::AlreadyCommitted);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Entering bus master mode at {} kHz", params.clock_khz);

        self.mode = DeviceMode::BusMaster;
        self.master = Some(params);
        Ok(())
    }
}
