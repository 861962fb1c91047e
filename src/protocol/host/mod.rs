//! Host side of the link: frames commands, reassembles responses from a
//! byte stream that may deliver them in pieces, and turns status bytes into
//! typed errors.
//!
//! ```rust,ignore
//! use bus_bridge::protocol::host::{HostLink, DEFAULT_CLOCK_KHZ};
//!
//! let mut host = HostLink::new(serial);
//! host.init_master(DEFAULT_CLOCK_KHZ)?;
//! host.write(0x48, &[0x01, 0x60])?;
//! let temperature = host.transaction(0x48, &[0x00], 2)?;
//! ```
use crate::core::{
    CommandCode, Payload, PinAction, PinMode, StatusCode, MAX_PAYLOAD, MAX_RESPONSE_PAYLOAD,
};
use crate::error::{FrameError, HostError, ParameterError};
use crate::infra::params::InitParams;
use crate::protocol::dispatch::diagnostics::SNAPSHOT_LEN;
use crate::protocol::transport::command::encode_command;
use crate::protocol::transport::message::decode_response;
use crate::protocol::transport::traits::byte_stream::ByteStream;

/// Consecutive empty reads or refused writes tolerated before giving up.
pub const DEFAULT_PATIENCE: u32 = 10_000;

/// Bus clock requested by [`HostLink::init_master`] callers by default.
pub const DEFAULT_CLOCK_KHZ: u16 = 400;

/// Body of a response.
pub type ResponsePayload = heapless::Vec<u8, MAX_RESPONSE_PAYLOAD>;

//==================================================================================Enums and Structs

/// One decoded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub payload: ResponsePayload,
}

impl Response {
    /// The payload when the status is OK, the matching error otherwise.
    pub fn into_result(self) -> Result<ResponsePayload, HostError> {
        match self.status {
            StatusCode::Ok => Ok(self.payload),
            status if status.is_bus_error() => Err(HostError::Bus(status)),
            status => Err(HostError::Protocol(status)),
        }
    }
}

/// Rebuilds responses byte by byte.
#[derive(Debug, Clone, Default)]
pub struct ResponseAssembler {
    frame: heapless::Vec<u8, MAX_PAYLOAD>,
}

impl ResponseAssembler {
    pub const fn new() -> Self {
        Self {
            frame: heapless::Vec::new(),
        }
    }

    /// Announced length of the response in progress.
    #[inline]
    pub fn expected(&self) -> Option<usize> {
        self.frame.first().map(|&len| usize::from(len))
    }

    /// Bytes received after the length byte.
    #[inline]
    pub fn received(&self) -> usize {
        self.frame.len().saturating_sub(1)
    }

    pub fn reset(&mut self) {
        self.frame.clear();
    }

    /// Feed one byte; returns the response it completes, if any.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Response>, HostError> {
        // A length byte tops out at 255, so a whole frame fits.
        let _ = self.frame.push(byte);

        let Some(expected) = self.expected() else {
            return Ok(None);
        };
        if self.received() < expected {
            return Ok(None);
        }

        let decoded = decode_response(&self.frame).and_then(|(status, payload)| {
            let payload = ResponsePayload::from_slice(payload)
                .map_err(|_| FrameError::PayloadTooLong { len: payload.len() })?;
            Ok(Response { status, payload })
        });
        self.frame.clear();

        Ok(Some(decoded?))
    }
}

/// Command issuer bound to the host end of a [`ByteStream`].
///
/// Calls are blocking: a request is written out completely, then the
/// stream is read until a whole response arrived or `patience` consecutive
/// reads came back empty.
pub struct HostLink<S> {
    stream: S,
    assembler: ResponseAssembler,
    patience: u32,
}

impl<S: ByteStream> HostLink<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            assembler: ResponseAssembler::new(),
            patience: DEFAULT_PATIENCE,
        }
    }

    /// Empty reads (or refused writes) tolerated in a row.
    pub fn with_patience(mut self, patience: u32) -> Self {
        self.patience = patience;
        self
    }

    #[inline]
    pub fn stream(&self) -> &S {
        &self.stream
    }

    #[inline]
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    //==================================================================================Raw exchange

    /// Frame a command and write all of it.
    pub fn send(&mut self, code: u8, payload: &[u8]) -> Result<(), HostError> {
        let mut frame = [0u8; MAX_PAYLOAD];
        let len = encode_command(code, payload, &mut frame)?;

        let mut sent = 0;
        let mut misses = 0;
        while sent < len {
            let accepted = self.stream.write(&frame[sent..len]);
            if accepted == 0 {
                misses += 1;
                if misses > self.patience {
                    return Err(HostError::Timeout);
                }
            } else {
                misses = 0;
                sent += accepted.min(len - sent);
            }
        }

        Ok(())
    }

    /// Take whatever is buffered without waiting.
    pub fn poll_response(&mut self) -> Result<Option<Response>, HostError> {
        while self.stream.available() > 0 {
            let Some(byte) = self.stream.read_byte() else {
                break;
            };
            if let Some(response) = self.assembler.feed(byte)? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }

    /// Wait for the next whole response.
    pub fn receive(&mut self) -> Result<Response, HostError> {
        let mut misses = 0;
        loop {
            match self.stream.read_byte() {
                Some(byte) => {
                    misses = 0;
                    if let Some(response) = self.assembler.feed(byte)? {
                        return Ok(response);
                    }
                }
                None => {
                    misses += 1;
                    if misses > self.patience {
                        return Err(self.give_up());
                    }
                }
            }
        }
    }

    /// Send a raw command and wait for its response, whatever its status.
    pub fn call(&mut self, code: u8, payload: &[u8]) -> Result<Response, HostError> {
        self.send(code, payload)?;
        self.receive()
    }

    fn give_up(&mut self) -> HostError {
        let error = match self.assembler.expected() {
            None => HostError::Timeout,
            Some(expected) => HostError::Truncated {
                expected,
                got: self.assembler.received(),
            },
        };
        self.assembler.reset();
        error
    }

    fn expect_ok(
        &mut self,
        code: CommandCode,
        payload: &[u8],
    ) -> Result<ResponsePayload, HostError> {
        self.call(code.into(), payload)?.into_result()
    }

    //==================================================================================Common commands

    /// Identification string, trailing NULs removed.
    pub fn version(&mut self) -> Result<heapless::String<MAX_RESPONSE_PAYLOAD>, HostError> {
        let payload = self.expect_ok(CommandCode::Version, &[])?;
        let end = payload
            .iter()
            .rposition(|&byte| byte != 0)
            .map_or(0, |last| last + 1);
        let text = core::str::from_utf8(&payload[..end])
            .map_err(|_| HostError::UnexpectedPayload { len: payload.len() })?;

        let mut version = heapless::String::new();
        // Same capacity as the payload it comes from.
        let _ = version.push_str(text);
        Ok(version)
    }

    pub fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), HostError> {
        self.expect_ok(CommandCode::SetPinMode, &[pin, mode.into()])?;
        Ok(())
    }

    pub fn digital_write(&mut self, pin: u8, action: PinAction) -> Result<(), HostError> {
        self.expect_ok(CommandCode::DigitalWrite, &[pin, action.into()])?;
        Ok(())
    }

    /// Dispatcher counters: dispatched, wrong commands, bad parameters, bus errors.
    pub fn debug1(&mut self) -> Result<[u32; 4], HostError> {
        let payload = self.expect_ok(CommandCode::Debug1, &[])?;
        unpack_counters(&payload)
    }

    /// Transport counters: bytes received, keepalives, responses sent, truncated.
    pub fn debug2(&mut self) -> Result<[u32; 4], HostError> {
        let payload = self.expect_ok(CommandCode::Debug2, &[])?;
        unpack_counters(&payload)
    }

    //==================================================================================Bus master

    /// Switch the device to I2C master at `clock_khz`.
    pub fn init_master(&mut self, clock_khz: u16) -> Result<(), HostError> {
        let params = InitParams {
            secondary_address: 0,
            clock_khz,
        };
        self.expect_ok(CommandCode::Init, &params.encode())?;
        Ok(())
    }

    /// Write `data` to `address`; an empty `data` only checks that the address answers.
    pub fn write(&mut self, address: u8, data: &[u8]) -> Result<(), HostError> {
        let request = request(&[address], data)?;
        let payload = self.expect_ok(CommandCode::Write, &request)?;
        if !payload.is_empty() {
            return Err(HostError::UnexpectedPayload { len: payload.len() });
        }
        Ok(())
    }

    /// Read exactly `length` bytes from `address`.
    pub fn read(&mut self, address: u8, length: u8) -> Result<ResponsePayload, HostError> {
        let payload = self.expect_ok(CommandCode::Read, &[address, length])?;
        check_length(payload, length)
    }

    /// Write `data`, then read `length` bytes after a repeated start.
    pub fn transaction(
        &mut self,
        address: u8,
        data: &[u8],
        length: u8,
    ) -> Result<ResponsePayload, HostError> {
        if data.is_empty() {
            return Err(ParameterError::TooShort { minimum: 1, got: 0 }.into());
        }
        let request = request(&[address, length], data)?;
        let payload = self.expect_ok(CommandCode::Transaction, &request)?;
        check_length(payload, length)
    }
}

//==================================================================================Helpers

fn request(head: &[u8], data: &[u8]) -> Result<Payload, HostError> {
    let mut request = Payload::new();
    let too_long = FrameError::PayloadTooLong {
        len: head.len() + data.len(),
    };
    request.extend_from_slice(head).map_err(|_| too_long)?;
    request.extend_from_slice(data).map_err(|_| too_long)?;
    Ok(request)
}

fn check_length(payload: ResponsePayload, length: u8) -> Result<ResponsePayload, HostError> {
    if payload.len() != usize::from(length) {
        return Err(HostError::ShortRead {
            expected: usize::from(length),
            got: payload.len(),
        });
    }
    Ok(payload)
}

fn unpack_counters(payload: &[u8]) -> Result<[u32; 4], HostError> {
    if payload.len() != SNAPSHOT_LEN {
        return Err(HostError::UnexpectedPayload { len: payload.len() });
    }
    let mut counters = [0u32; 4];
    for (counter, chunk) in counters.iter_mut().zip(payload.chunks_exact(4)) {
        *counter = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(counters)
}
