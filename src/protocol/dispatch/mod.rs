//! Command dispatcher and mode state machine.
//!
//! A ready command goes through two stages, first recognizer wins:
//!
//! 1. the common handlers ([`common`]), served in every mode;
//! 2. the handler of the active mode ([`undefined`] or [`bus_master`]).
//!
//! When neither stage recognizes the code the dispatcher claims the command
//! itself with `WRONG_COMMAND`, so a ready command can never block the
//! transport forever. While the dispatch slot of the response channel still
//! holds an undrained reply the command is left untouched and retried on a
//! later poll.
use crate::core::{CommandCode, DeviceMode, Payload, StatusCode, MAX_PAYLOAD};
use crate::error::CommandError;
use crate::protocol::housekeeping::Heartbeat;
use crate::protocol::transport::command::Command;
use crate::protocol::transport::message::Rendered;
use crate::protocol::transport::response_channel::{ResponseChannel, DISPATCH_SLOT};
use crate::protocol::transport::traits::{digital_pins::DigitalPins, i2c_master::I2cMaster};

pub mod bus_master;
pub mod common;
pub mod diagnostics;
pub mod mode;
pub mod undefined;

use diagnostics::Diagnostics;
use mode::ModeState;

/// Outcome of a handler stage: `None` when the code is not its own,
/// otherwise the reply payload or the error to report.
pub type Handled = Option<Result<Payload, CommandError>>;

/// Capabilities a dispatch may act upon.
pub struct Peripherals<'a, B, P> {
    pub bus: &'a mut B,
    pub pins: &'a mut P,
    pub heartbeat: &'a mut Heartbeat,
}

/// Routes ready commands and owns the device mode.
pub struct Dispatcher {
    state: ModeState,
    diagnostics: Diagnostics,
    version: &'static str,
}

impl Dispatcher {
    pub const fn new(version: &'static str) -> Self {
        Self {
            state: ModeState::new(),
            diagnostics: Diagnostics::new(),
            version,
        }
    }

    #[inline]
    pub fn mode(&self) -> DeviceMode {
        self.state.mode()
    }

    #[inline]
    pub fn state(&self) -> &ModeState {
        &self.state
    }

    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[inline]
    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Dispatch the pending command, if any.
    ///
    /// Returns the status of the reply that was queued, or `None` when there
    /// was nothing to do (no ready command, or the reply slot is still busy).
    pub fn dispatch<B, P, const SLOTS: usize>(
        &mut self,
        command: &mut Command,
        responses: &mut ResponseChannel<SLOTS>,
        peripherals: &mut Peripherals<'_, B, P>,
    ) -> Option<StatusCode>
    where
        B: I2cMaster,
        P: DigitalPins,
    {
        if !command.is_ready() || responses.is_pending(DISPATCH_SLOT) {
            return None;
        }

        self.diagnostics.commands_dispatched = self.diagnostics.commands_dispatched.wrapping_add(1);

        let handled = command
            .command_code()
            .and_then(|code| self.route(code, command.payload(), peripherals));

        let (status, payload) = match handled {
            Some(Ok(payload)) => (StatusCode::Ok, payload),
            Some(Err(err)) => {
                self.diagnostics.record_error(&err);
                (err.status(), Payload::new())
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "Unclaimed command {} in mode {}",
                    command.code(),
                    self.state.mode()
                );
                self.diagnostics.wrong_commands = self.diagnostics.wrong_commands.wrapping_add(1);
                (StatusCode::WrongCommand, Payload::new())
            }
        };

        // The slot was checked free above.
        if let Ok(Rendered::Truncated { .. }) = responses.set(DISPATCH_SLOT, status, &payload) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Response clipped to the wire limit");
            self.diagnostics.responses_truncated =
                self.diagnostics.responses_truncated.wrapping_add(1);
        }

        command.reset();
        Some(status)
    }

    fn route<B, P>(
        &mut self,
        code: CommandCode,
        payload: &[u8],
        peripherals: &mut Peripherals<'_, B, P>,
    ) -> Handled
    where
        B: I2cMaster,
        P: DigitalPins,
    {
        if let Some(result) = common::handle(
            code,
            payload,
            self.version,
            &self.diagnostics,
            &mut *peripherals.pins,
            &mut *peripherals.heartbeat,
        ) {
            return Some(result);
        }

        match self.state.mode() {
            DeviceMode::Undefined => {
                undefined::handle(code, payload, &mut self.state, &mut *peripherals.bus)
            }
            DeviceMode::BusMaster => bus_master::handle(code, payload, &mut *peripherals.bus),
            DeviceMode::BusSlave => None,
        }
    }
}

/// Copy into a reply payload, dropping what exceeds its capacity.
pub(crate) fn to_payload(bytes: &[u8]) -> Payload {
    let kept = bytes.len().min(MAX_PAYLOAD);
    let mut payload = Payload::new();
    let _ = payload.extend_from_slice(&bytes[..kept]);
    payload
}
