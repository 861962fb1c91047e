//! Infrastructure helpers that sit below the protocol: decoding of the
//! packed parameter records carried by command payloads.
pub mod params;
