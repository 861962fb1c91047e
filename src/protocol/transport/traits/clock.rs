//! Monotonic time source driving the periodic housekeeping.
use embassy_time::Instant;

/// Clock trait abstraction; `now` must never go backwards.
pub trait Clock {
    fn now(&self) -> Instant;
}
