//! Minimal abstraction for the host link (UART, USB CDC, ...). Both directions
//! are non-blocking: the bridge only reads what is already buffered and
//! writes what the link accepts right now.

/// Contract to exchange raw bytes with the host.
pub trait ByteStream {
    /// Number of received bytes ready to be read without blocking.
    fn available(&self) -> usize;
    /// Pop the next received byte, `None` when nothing is buffered.
    fn read_byte(&mut self) -> Option<u8>;
    /// Queue `bytes` for transmission and return how many were accepted.
    /// Accepting fewer bytes (even zero) is not an error; the caller resumes later.
    fn write(&mut self, bytes: &[u8]) -> usize;
}
