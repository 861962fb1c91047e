//! Outbound message slot: a response rendered once, in full, then drained
//! onto the transport over as many polls as the link needs.
//!
//! ```text
//! [N:1][status:1][payload:N-1]      N = 1 + payload length, payload <= 254
//! ```
//!
//! Payloads longer than 254 bytes are clipped, not refused.
use crate::core::{StatusCode, MAX_PAYLOAD, MAX_RESPONSE_PAYLOAD};
use crate::error::FrameError;
use crate::protocol::transport::traits::byte_stream::ByteStream;

/// Result of rendering a response into a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rendered {
    /// Payload fit entirely.
    Complete,
    /// Payload was clipped to the wire limit.
    Truncated { dropped: usize },
}

/// One outbound message and its drain progress.
#[derive(Debug, Clone)]
pub struct Message {
    ready: bool,
    data: heapless::Vec<u8, MAX_PAYLOAD>,
    sent: usize,
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl Message {
    pub const fn new() -> Self {
        Self {
            ready: false,
            data: heapless::Vec::new(),
            sent: 0,
        }
    }

    /// Whether a rendered message is waiting to be (fully) drained.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Total wire size of the pending message.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Bytes already handed to the transport.
    #[inline]
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Wire bytes of the pending message.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Render `status` and `payload` into the slot.
    ///
    /// Returns `None` (and leaves the slot untouched) while a previous message
    /// is still pending.
    pub fn set(&mut self, status: StatusCode, payload: &[u8]) -> Option<Rendered> {
        if self.ready {
            return None;
        }

        let kept = payload.len().min(MAX_RESPONSE_PAYLOAD);

        self.data.clear();
        // 2 + 254 bytes always fit the 256-byte buffer.
        let _ = self.data.push((kept + 1) as u8);
        let _ = self.data.push(status.into());
        let _ = self.data.extend_from_slice(&payload[..kept]);
        self.sent = 0;
        self.ready = true;

        if kept < payload.len() {
            Some(Rendered::Truncated {
                dropped: payload.len() - kept,
            })
        } else {
            Some(Rendered::Complete)
        }
    }

    /// Write as much of the pending message as the transport accepts.
    ///
    /// Returns `true` once the message has been fully sent and the slot is idle again.
    pub fn drain<S: ByteStream>(&mut self, stream: &mut S) -> bool {
        if !self.ready {
            return false;
        }

        if self.sent < self.data.len() {
            let accepted = stream.write(&self.data[self.sent..]);
            self.sent += accepted.min(self.data.len() - self.sent);
        }

        if self.sent == self.data.len() {
            self.reset();
            return true;
        }

        false
    }

    /// Return the slot to idle.
    pub fn reset(&mut self) {
        self.ready = false;
        self.data.clear();
        self.sent = 0;
    }
}

//==================================================================================Host side

/// Split a complete wire response into its status and payload.
pub fn decode_response(frame: &[u8]) -> Result<(StatusCode, &[u8]), FrameError> {
    let (&len, rest) = frame.split_first().ok_or(FrameError::Truncated)?;
    let len = usize::from(len);

    if len == 0 || rest.len() < len {
        return Err(FrameError::Truncated);
    }

    let status = StatusCode::from_u8(rest[0]).ok_or(FrameError::UnknownStatus(rest[0]))?;
    Ok((status, &rest[1..len]))
}
