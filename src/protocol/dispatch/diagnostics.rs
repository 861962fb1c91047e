//! Diagnostic counters reported by the debug commands. They never influence
//! dispatch; all of them wrap on overflow.
use crate::error::CommandError;
use crate::protocol::transport::command::Ingested;

/// Size of one debug snapshot on the wire.
pub const SNAPSHOT_LEN: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub commands_dispatched: u32,
    pub wrong_commands: u32,
    pub parameter_errors: u32,
    pub bus_errors: u32,
    pub bytes_received: u32,
    pub keepalives: u32,
    pub responses_sent: u32,
    pub responses_truncated: u32,
}

impl Diagnostics {
    pub const fn new() -> Self {
        Self {
            commands_dispatched: 0,
            wrong_commands: 0,
            parameter_errors: 0,
            bus_errors: 0,
            bytes_received: 0,
            keepalives: 0,
            responses_sent: 0,
            responses_truncated: 0,
        }
    }

    pub(crate) fn record_ingest(&mut self, ingested: Ingested) {
        self.bytes_received = self.bytes_received.wrapping_add(ingested.bytes as u32);
        self.keepalives = self.keepalives.wrapping_add(ingested.keepalives as u32);
    }

    pub(crate) fn record_error(&mut self, error: &CommandError) {
        match error {
            CommandError::Parameters(_) => {
                self.parameter_errors = self.parameter_errors.wrapping_add(1)
            }
            CommandError::Bus(_) => self.bus_errors = self.bus_errors.wrapping_add(1),
            CommandError::Mode(_) => {}
        }
    }

    /// Debug1: dispatcher counters.
    pub fn dispatch_snapshot(&self) -> [u8; SNAPSHOT_LEN] {
        pack([
            self.commands_dispatched,
            self.wrong_commands,
            self.parameter_errors,
            self.bus_errors,
        ])
    }

    /// Debug2: transport counters.
    pub fn transport_snapshot(&self) -> [u8; SNAPSHOT_LEN] {
        pack([
            self.bytes_received,
            self.keepalives,
            self.responses_sent,
            self.responses_truncated,
        ])
    }
}

fn pack(counters: [u32; 4]) -> [u8; SNAPSHOT_LEN] {
    let mut out = [0u8; SNAPSHOT_LEN];
    for (chunk, counter) in out.chunks_exact_mut(4).zip(counters) {
        chunk.copy_from_slice(&counter.to_le_bytes());
    }
    out
}
