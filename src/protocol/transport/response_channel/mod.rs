//! Response channel: a fixed pool of outbound slots sharing one transport.
//!
//! Each logical producer owns one slot and may queue a single message at a
//! time. The channel drains one message completely before moving to the
//! next ready slot, so the bytes of two messages never interleave on the
//! wire. Slots are visited round-robin to keep every producer moving.
use crate::core::StatusCode;
use crate::error::SlotBusy;
use crate::protocol::transport::message::{Message, Rendered};
use crate::protocol::transport::traits::byte_stream::ByteStream;

/// Slot used by the command dispatcher.
pub const DISPATCH_SLOT: usize = 0;

/// Outcome of one drain burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrainResult {
    /// No slot had anything to send.
    Idle,
    /// A message is partially written.
    InProgress { slot: usize },
    /// The message of `slot` left completely during this burst.
    Sent { slot: usize },
}

pub struct ResponseChannel<const SLOTS: usize> {
    slots: [Message; SLOTS],
    /// Slot whose message is on the wire.
    active: Option<usize>,
    /// Slot to look at first when choosing the next message.
    next: usize,
}

impl<const SLOTS: usize> Default for ResponseChannel<SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SLOTS: usize> ResponseChannel<SLOTS> {
    pub const fn new() -> Self {
        Self {
            slots: [const { Message::new() }; SLOTS],
            active: None,
            next: 0,
        }
    }

    /// Whether `slot` still holds an undrained message.
    ///
    /// Out-of-range slots report busy so nobody writes to them.
    #[inline]
    pub fn is_pending(&self, slot: usize) -> bool {
        self.slots.get(slot).is_none_or(Message::is_ready)
    }

    /// Whether any slot has something to send.
    pub fn has_pending(&self) -> bool {
        self.slots.iter().any(Message::is_ready)
    }

    /// Pending message of `slot`, if any.
    pub fn message(&self, slot: usize) -> Option<&Message> {
        self.slots.get(slot).filter(|message| message.is_ready())
    }

    /// Queue a response in `slot`.
    pub fn set(
        &mut self,
        slot: usize,
        status: StatusCode,
        payload: &[u8],
    ) -> Result<Rendered, SlotBusy> {
        self.slots
            .get_mut(slot)
            .and_then(|message| message.set(status, payload))
            .ok_or(SlotBusy { slot })
    }

    /// Write the active message (or pick the next one) onto the transport.
    pub fn drain<S: ByteStream>(&mut self, stream: &mut S) -> DrainResult {
        let slot = match self.active {
            Some(slot) => slot,
            None => match self.pick() {
                Some(slot) => {
                    self.active = Some(slot);
                    slot
                }
                None => return DrainResult::Idle,
            },
        };

        if self.slots[slot].drain(stream) {
            self.active = None;
            self.next = (slot + 1) % SLOTS;
            DrainResult::Sent { slot }
        } else {
            DrainResult::InProgress { slot }
        }
    }

    fn pick(&self) -> Option<usize> {
        (0..SLOTS)
            .map(|offset| (self.next + offset) % SLOTS)
            .find(|&slot| self.slots[slot].is_ready())
    }
}
