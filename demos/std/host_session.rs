//! Host session example: the bridge wired to in-memory peripherals, driven by
//! a scripted host that frames commands and decodes the replies.
//!
//! ```bash
//! cargo run --example host_session
//! ```

use std::collections::VecDeque;

use bus_bridge::{
    bridge::Bridge,
    config::BridgeConfig,
    core::{PinAction, PinMode},
    error::HostError,
    protocol::{
        host::{HostLink, DEFAULT_CLOCK_KHZ},
        transport::traits::{
            byte_stream::ByteStream, clock::Clock, digital_pins::DigitalPins,
            i2c_master::I2cMaster,
        },
    },
};
use embassy_time::Instant;
use embedded_hal::digital::PinState;

// ============================================================================
// Peripherals
// ============================================================================

/// Serial link as seen from the device.
#[derive(Default)]
struct Link {
    to_device: VecDeque<u8>,
    to_host: VecDeque<u8>,
}

impl ByteStream for Link {
    fn available(&self) -> usize {
        self.to_device.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.to_device.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        // A small UART FIFO: eight bytes per call.
        let accepted = bytes.len().min(8);
        self.to_host.extend(&bytes[..accepted]);
        accepted
    }
}

/// One temperature sensor at 0x48 with a register pointer.
struct SensorBus {
    registers: [u8; 8],
    pointer: usize,
    target: u8,
    staged: Vec<u8>,
    rx: VecDeque<u8>,
}

const SENSOR: u8 = 0x48;

impl SensorBus {
    fn new() -> Self {
        Self {
            // 23.5 °C in the temperature register, config register cleared.
            registers: [0x17, 0x80, 0, 0, 0x4B, 0, 0x50, 0],
            pointer: 0,
            target: 0,
            staged: Vec::new(),
            rx: VecDeque::new(),
        }
    }
}

impl I2cMaster for SensorBus {
    fn begin(&mut self) {
        println!("  [i2c] begin");
    }

    fn set_clock(&mut self, hz: u32) {
        println!("  [i2c] clock {hz} Hz");
    }

    fn begin_transmission(&mut self, address: u8) {
        self.target = address;
        self.staged.clear();
    }

    fn write(&mut self, data: &[u8]) -> usize {
        self.staged.extend_from_slice(data);
        data.len()
    }

    fn end_transmission(&mut self, _stop: bool) -> u8 {
        if self.target != SENSOR {
            return 2;
        }
        if let Some((&pointer, data)) = self.staged.split_first() {
            self.pointer = usize::from(pointer) % self.registers.len();
            for (offset, &byte) in data.iter().enumerate() {
                let register = (self.pointer + offset) % self.registers.len();
                self.registers[register] = byte;
            }
        }
        self.staged.clear();
        0
    }

    fn request_from(&mut self, address: u8, length: u8, _stop: bool) -> usize {
        self.rx.clear();
        if address != SENSOR {
            return 0;
        }
        for offset in 0..usize::from(length) {
            let register = (self.pointer + offset) % self.registers.len();
            self.rx.push_back(self.registers[register]);
        }
        self.rx.len()
    }

    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

struct Board;

impl DigitalPins for Board {
    fn set_mode(&mut self, pin: u8, mode: PinMode) {
        println!("  [gpio] pin {pin} -> {mode:?}");
    }

    fn write(&mut self, pin: u8, state: PinState) {
        println!("  [gpio] pin {pin} = {state:?}");
    }

    fn read(&mut self, _pin: u8) -> PinState {
        PinState::Low
    }
}

struct WallClock(std::time::Instant);

impl Clock for WallClock {
    fn now(&self) -> Instant {
        Instant::from_micros(self.0.elapsed().as_micros() as u64)
    }
}

// ============================================================================
// Host side
// ============================================================================

type Device = Bridge<Link, SensorBus, Board, WallClock>;

/// Host end of the serial link; reading runs the device until it answers.
struct Serial<'a>(&'a mut Device);

impl ByteStream for Serial<'_> {
    fn available(&self) -> usize {
        self.0.stream().to_host.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        for _ in 0..64 {
            if let Some(byte) = self.0.stream_mut().to_host.pop_front() {
                return Some(byte);
            }
            self.0.poll();
        }
        None
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        println!("> {:02X?}", bytes);
        self.0.stream_mut().to_device.extend(bytes);
        bytes.len()
    }
}

fn main() -> Result<(), HostError> {
    println!("=== bus-bridge host session ===\n");

    let config = BridgeConfig::new().with_heartbeat_pin(2);
    let mut device = Bridge::new(
        Link::default(),
        SensorBus::new(),
        Board,
        WallClock(std::time::Instant::now()),
        config,
    );
    let mut host = HostLink::new(Serial(&mut device));

    // 1. Identification
    println!("1. version: {}\n", host.version()?);

    // 2. Bus commands are refused until Init
    println!("2. read before init: {:?}\n", host.read(SENSOR, 2));

    // 3. I2C master, no secondary address
    host.init_master(DEFAULT_CLOCK_KHZ)?;
    println!("3. master at {DEFAULT_CLOCK_KHZ} kHz\n");

    // 4. Temperature register through write + restart + read
    let raw = host.transaction(SENSOR, &[0x00], 2)?;
    let celsius = f32::from(i16::from_be_bytes([raw[0], raw[1]]) >> 4) * 0.0625;
    println!("4. temperature: {celsius:.2} °C\n");

    // 5. Configuration write, then an address nobody answers
    host.write(SENSOR, &[0x01, 0x60])?;
    println!("5. anyone at 0x49? {:?}\n", host.write(0x49, &[]));

    // 6. Pins
    host.set_pin_mode(7, PinMode::DigitalOut)?;
    host.digital_write(7, PinAction::High)?;
    println!();

    // 7. Counters
    let names = ["dispatched", "wrong", "bad parameters", "bus errors"];
    for (name, value) in names.iter().zip(host.debug1()?) {
        println!("  {name}: {value}");
    }
    let names = ["bytes received", "keepalives", "responses sent", "truncated"];
    for (name, value) in names.iter().zip(host.debug2()?) {
        println!("  {name}: {value}");
    }

    Ok(())
}
