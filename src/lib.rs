//! `bus-bridge` library: the `no_std` core of a firmware that exposes an I2C
//! bus to a host over a serial link. The crate exposes the shared wire types,
//! parameter decoding, the framing layer, the command dispatcher with its
//! bus-master engine, and the periodic housekeeping.
#![no_std]
//==================================================================================
/// Top-level device loop tying transport, dispatcher and housekeeping together.
pub mod bridge;
/// Runtime configuration (heartbeat pin, tick rate, identification string).
pub mod config;
/// Wire enumerations and constants shared by every layer.
pub mod core;
/// Error types raised while validating and executing commands.
pub mod error;
/// Field-by-field decoding of command parameter records.
pub mod infra;
/// Bridge protocol: framing, response channel, dispatch, housekeeping and host link.
pub mod protocol;
//==================================================================================
