//! The device loop.
//!
//! [`Bridge`] owns the four capabilities and every protocol component. One
//! call to [`Bridge::poll`] performs exactly one iteration:
//!
//! 1. read what the transport has buffered into the pending command;
//! 2. dispatch the command if it is complete;
//! 3. drain the response channel onto the transport;
//! 4. run the housekeeping tick if it is due.
//!
//! Nothing in the loop waits: bus transfers block only as long as the
//! driver takes to conclude them.
//!
//! # Example
//!
//! ```rust,ignore
//! use bus_bridge::{bridge::Bridge, config::BridgeConfig};
//!
//! let mut bridge = Bridge::new(uart, i2c, pins, clock, BridgeConfig::default());
//! bridge.run();
//! ```
use crate::config::BridgeConfig;
use crate::core::{DeviceMode, StatusCode};
use crate::protocol::dispatch::{diagnostics::Diagnostics, Dispatcher, Peripherals};
use crate::protocol::housekeeping::Heartbeat;
use crate::protocol::transport::command::Command;
use crate::protocol::transport::response_channel::{DrainResult, ResponseChannel};
use crate::protocol::transport::traits::{
    byte_stream::ByteStream, clock::Clock, digital_pins::DigitalPins, i2c_master::I2cMaster,
};

/// Number of outbound slots; the dispatcher is the only producer.
pub const RESPONSE_SLOTS: usize = 1;

/// What happened during one [`Bridge::poll`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Bytes taken from the transport.
    pub bytes_read: usize,
    /// Status of the reply queued by the dispatcher, if any.
    pub dispatched: Option<StatusCode>,
    /// A whole response left the device.
    pub response_sent: bool,
    /// The housekeeping tick ran.
    pub ticked: bool,
}

pub struct Bridge<S, B, P, C> {
    stream: S,
    bus: B,
    pins: P,
    clock: C,
    command: Command,
    responses: ResponseChannel<RESPONSE_SLOTS>,
    dispatcher: Dispatcher,
    heartbeat: Heartbeat,
}

impl<S, B, P, C> Bridge<S, B, P, C>
where
    S: ByteStream,
    B: I2cMaster,
    P: DigitalPins,
    C: Clock,
{
    /// Assemble the bridge and start the heartbeat.
    pub fn new(stream: S, bus: B, mut pins: P, clock: C, config: BridgeConfig) -> Self {
        let mut heartbeat = Heartbeat::new(config.heartbeat_pin(), config.tick_period());
        heartbeat.start(&mut pins, clock.now());

        #[cfg(feature = "defmt")]
        defmt::info!("Bridge up: {}", config.version());

        Self {
            stream,
            bus,
            pins,
            clock,
            command: Command::new(),
            responses: ResponseChannel::new(),
            dispatcher: Dispatcher::new(config.version()),
            heartbeat,
        }
    }

    /// Run one loop iteration.
    pub fn poll(&mut self) -> PollReport {
        let ingested = self.command.ingest(&mut self.stream);
        self.dispatcher.diagnostics_mut().record_ingest(ingested);

        let mut peripherals = Peripherals {
            bus: &mut self.bus,
            pins: &mut self.pins,
            heartbeat: &mut self.heartbeat,
        };
        let dispatched =
            self.dispatcher
                .dispatch(&mut self.command, &mut self.responses, &mut peripherals);

        let response_sent = matches!(
            self.responses.drain(&mut self.stream),
            DrainResult::Sent { .. }
        );
        if response_sent {
            let diagnostics = self.dispatcher.diagnostics_mut();
            diagnostics.responses_sent = diagnostics.responses_sent.wrapping_add(1);
        }

        let ticked = self
            .heartbeat
            .poll(self.clock.now(), self.dispatcher.mode(), &mut self.pins);

        PollReport {
            bytes_read: ingested.bytes,
            dispatched,
            response_sent,
            ticked,
        }
    }

    /// Poll forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    //==================================================================================Accessors

    #[inline]
    pub fn mode(&self) -> DeviceMode {
        self.dispatcher.mode()
    }

    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        self.dispatcher.diagnostics()
    }

    /// No command awaits dispatch and no reply awaits the transport.
    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.command.is_ready() && !self.responses.has_pending()
    }

    #[inline]
    pub fn heartbeat(&self) -> &Heartbeat {
        &self.heartbeat
    }

    /// Pending (or partially received) command.
    #[inline]
    pub fn command(&self) -> &Command {
        &self.command
    }

    #[inline]
    pub fn stream(&self) -> &S {
        &self.stream
    }

    #[inline]
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    #[inline]
    pub fn pins(&self) -> &P {
        &self.pins
    }

    #[inline]
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Give the capabilities back.
    pub fn release(self) -> (S, B, P, C) {
        (self.stream, self.bus, self.pins, self.clock)
    }
}
