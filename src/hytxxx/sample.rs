//! Raw sample layout and the datasheet conversion formulas.
//!
//! ```text
//! byte 0: | CMODE | STALE | H13 .. H8 |
//! byte 1: | H7 .. H0                  |
//! byte 2: | T13 .. T6                 |
//! byte 3: | T5 .. T0      | x | x     |
//! ```

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::Serialize;

pub(crate) const SAMPLE_LEN: usize = 4;

const STALE_BIT: u8 = 0b0100_0000;
const HUMIDITY_MSB_MSK: u8 = 0b0011_1111;

/// Both fields are 14 bit, the all-ones value is reserved by the datasheet.
pub const RAW_MAX: u16 = 0x3FFF;

const FULL_SCALE: f64 = 16384.0; // 2^14

/// Humidity and temperature fields decoded from one 4-byte sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub humidity: u16,
    pub temperature: u16,
}

impl RawSample {
    /// The sensor sets the stale bit until a conversion started after the
    /// last read has completed.
    pub fn is_stale(data: &[u8; SAMPLE_LEN]) -> bool {
        data[0] & STALE_BIT != 0
    }

    /// Decode a sample, `None` if it is stale.
    pub fn parse(data: [u8; SAMPLE_LEN]) -> Option<Self> {
        if Self::is_stale(&data) {
            return None;
        }
        let humidity = u16::from_be_bytes([data[0] & HUMIDITY_MSB_MSK, data[1]]);
        let temperature = u16::from_be_bytes([data[2], data[3]]) >> 2;
        Some(RawSample { humidity, temperature })
    }

    pub fn temperature_celsius(&self) -> Option<f32> {
        temperature_from_raw(self.temperature)
    }

    pub fn humidity_percent(&self) -> Option<f32> {
        humidity_from_raw(self.humidity)
    }
}

/// Temperature in degrees celsius, -40 .. 125, `None` for the reserved raw value.
pub fn temperature_from_raw(raw: u16) -> Option<f32> {
    if raw >= RAW_MAX {
        return None;
    }
    Some(round_2(raw as f64 * 165.0 / FULL_SCALE - 40.0))
}

/// Relative humidity in percent, 0 .. 100, `None` for the reserved raw value.
pub fn humidity_from_raw(raw: u16) -> Option<f32> {
    if raw >= RAW_MAX {
        return None;
    }
    Some(round_2(raw as f64 * 100.0 / FULL_SCALE))
}

// ties to even, `value * 100.0` is exact for every raw value
fn round_2(value: f64) -> f32 {
    let scaled = value * 100.0;
    let mut rounded = Float::round(scaled);
    if Float::abs(scaled - Float::trunc(scaled)) == 0.5 && rounded % 2.0 != 0.0 {
        rounded -= Float::signum(scaled);
    }
    (rounded / 100.0) as f32
}
