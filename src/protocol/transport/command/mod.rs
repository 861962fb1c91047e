//! Command reassembly: rebuilds a host command from the raw byte stream,
//! one byte at a time, across as many polls as the bytes take to arrive.
//!
//! ```text
//! [N:1][code:1][payload:N-1]
//! ```
//!
//! A length byte of zero is a keepalive and is skipped. Once a command is
//! complete the assembler stops reading until the command has been claimed,
//! so bytes of the next command stay in the transport buffer.
use crate::core::{CommandCode, Payload, MAX_RESPONSE_PAYLOAD};
use crate::error::FrameError;
use crate::protocol::transport::traits::byte_stream::ByteStream;
use crate::protocol::transport::KEEPALIVE;

//==================================================================================Enums and Structs

/// Outcome of feeding one byte to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedResult {
    /// A zero length byte between commands.
    Keepalive,
    /// Byte stored, more are expected.
    Consumed,
    /// Byte completed the command; it is now ready.
    Complete,
    /// A ready command is still pending; the byte was not used.
    Rejected,
}

/// Bytes taken from the transport by one [`Command::ingest`] burst.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ingested {
    /// Every byte read, keepalives included.
    pub bytes: usize,
    /// Keepalive bytes skipped.
    pub keepalives: usize,
}

/// The command currently being received or awaiting dispatch.
#[derive(Debug, Clone)]
pub struct Command {
    ready: bool,
    code: u8,
    payload: Payload,
    payload_size: Option<usize>,
    bytes_to_read: Option<usize>,
}

impl Default for Command {
    fn default() -> Self {
        Self::new()
    }
}

impl Command {
    /// Create an empty command waiting for its length byte.
    pub const fn new() -> Self {
        Self {
            ready: false,
            code: 0,
            payload: Payload::new(),
            payload_size: None,
            bytes_to_read: None,
        }
    }

    /// Drop the current content and wait for the next length byte.
    pub fn reset(&mut self) {
        self.ready = false;
        self.code = 0;
        self.payload.clear();
        self.payload_size = None;
        self.bytes_to_read = None;
    }

    //==================================================================================Accessors

    /// Whether a complete command awaits dispatch.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Raw command byte (meaningful once ready).
    #[inline]
    pub fn code(&self) -> u8 {
        self.code
    }

    /// Known command for the raw byte, if any.
    #[inline]
    pub fn command_code(&self) -> Option<CommandCode> {
        CommandCode::from_u8(self.code)
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Announced payload length, `None` before the length byte arrived.
    #[inline]
    pub fn payload_size(&self) -> Option<usize> {
        self.payload_size
    }

    /// Bytes still expected, `None` before the length byte arrived.
    #[inline]
    pub fn bytes_to_read(&self) -> Option<usize> {
        self.bytes_to_read
    }

    //==================================================================================Process Functions

    /// Feed one byte from the transport.
    pub fn feed(&mut self, byte: u8) -> FeedResult {
        if self.ready {
            return FeedResult::Rejected;
        }

        let remaining = match (self.bytes_to_read, self.payload_size) {
            (Some(remaining), Some(payload_size)) => {
                if remaining == payload_size + 1 {
                    // First byte after the length is the command code.
                    self.code = byte;
                } else {
                    // Capacity exceeds the largest announceable payload.
                    let _ = self.payload.push(byte);
                }
                remaining - 1
            }
            _ => {
                if byte == KEEPALIVE {
                    return FeedResult::Keepalive;
                }
                let total = usize::from(byte);
                self.payload_size = Some(total - 1);
                total
            }
        };

        self.bytes_to_read = Some(remaining);

        if remaining == 0 {
            self.ready = true;
            FeedResult::Complete
        } else {
            FeedResult::Consumed
        }
    }

    /// Pull whatever the transport has buffered until the command is ready.
    ///
    /// Reads nothing while a ready command is pending.
    pub fn ingest<S: ByteStream>(&mut self, stream: &mut S) -> Ingested {
        let mut ingested = Ingested::default();

        while !self.ready && stream.available() > 0 {
            let Some(byte) = stream.read_byte() else {
                break;
            };
            ingested.bytes += 1;

            match self.feed(byte) {
                FeedResult::Keepalive => ingested.keepalives += 1,
                FeedResult::Complete => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!(
                        "Command {} ready with {} payload bytes",
                        self.code,
                        self.payload.len()
                    );
                }
                FeedResult::Consumed | FeedResult::Rejected => {}
            }
        }

        ingested
    }
}

//==================================================================================Host side

/// Frame a command for the wire; returns the number of bytes written to `dst`.
///
/// # Errors
///
/// - [`FrameError::PayloadTooLong`] when the payload exceeds 254 bytes
/// - [`FrameError::BufferTooSmall`] when `dst` cannot hold the frame
pub fn encode_command(code: u8, payload: &[u8], dst: &mut [u8]) -> Result<usize, FrameError> {
    if payload.len() > MAX_RESPONSE_PAYLOAD {
        return Err(FrameError::PayloadTooLong { len: payload.len() });
    }

    let total = payload.len() + 2;
    if dst.len() < total {
        return Err(FrameError::BufferTooSmall {
            asked: total,
            available: dst.len(),
        });
    }

    dst[0] = (payload.len() + 1) as u8;
    dst[1] = code;
    dst[2..total].copy_from_slice(payload);

    Ok(total)
}
