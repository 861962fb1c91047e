//! Abstraction traits used by the bridge (byte stream, I2C master, digital pins, clock).
pub mod byte_stream;
pub mod clock;
pub mod digital_pins;
pub mod i2c_master;
