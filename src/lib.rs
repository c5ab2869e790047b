//! Platform-agnostic driver for HYT221, HYT271 and HYT939 humidity and
//! temperature sensors, built on `embedded-hal` 1.0.
//!
//! ```no_run
//! # use embedded_hal::{delay::DelayNs, i2c::I2c};
//! # use hytxxx::clock::Clock;
//! # fn demo<I: I2c, D: DelayNs, C: Clock>(i2c: I, delay: D, clock: C) -> Result<(), hytxxx::Error<I::Error>> {
//! use hytxxx::Hyt;
//!
//! let mut hyt = Hyt::new_default(i2c, delay, clock)?;
//! let temperature = hyt.get_temperature()?;
//! // reuses the sample taken for the temperature
//! let humidity = hyt.get_humidity()?;
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod clock;
pub mod hytxxx;
pub mod reading;

#[cfg(test)]
pub(crate) mod testutil;

pub use crate::hytxxx::{Error, Hyt, Measurements, RawSample, DEFAULT_ADDRESS};
pub use crate::reading::{Kind, Reading, Unit};
