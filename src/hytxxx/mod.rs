//! HYT221, HYT271, HYT939 humidity and temperature sensors.
//!
//! - Humidity: 0 to 100 %RH, 14 bit
//! - Temperature: -40 to 125 C, 14 bit
//! - Address(7bit): 0x28 by default
//!
//! A measurement is started by writing a single command byte. The sensor
//! needs about 100 ms to convert, until then reads return the previous
//! sample with the stale bit set. Fresh samples are kept for two seconds so
//! that reading temperature and humidity back to back costs one conversion.
//!
//! The driver blocks the calling thread while polling and is not meant to be
//! shared between threads without external locking.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::clock::Clock;
use crate::reading::{Kind, Reading};

mod sample;
pub mod sim;

pub use sample::{humidity_from_raw, temperature_from_raw, RawSample, RAW_MAX};
use sample::SAMPLE_LEN;

/// Factory default address.
pub const DEFAULT_ADDRESS: u8 = 0x28;

const HYT_START_MEASUREMENT_CMD: u8 = 0x00;

const HYT_POLL_RETRIES: u32 = 30;
const HYT_POLL_INTERVAL_MS: u32 = 10;

/// Samples not older than this are served from cache.
const HYT_CACHE_MS: u64 = 2_000;

/// HYTXXX errors
#[derive(Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I²C bus error
    #[error("I2C bus error: {0:?}")]
    I2c(E),
    /// Every poll found the stale bit set
    #[error("HYT (address 0x{address:02X}): data fetch timeout")]
    MeasurementTimeout { address: u8 },
    /// Fresh sample carries the reserved raw value
    #[error("{} value out of range (raw 0x{raw:04X}, max 0x3FFF)", .kind.tag())]
    OutOfRange { kind: Kind, raw: u16 },
}

/// Both values of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurements {
    /// temperature in degrees celsius
    pub temperature: f32,
    /// percent relative humidity
    pub humidity: f32,
}

#[derive(Debug, Clone, Copy)]
struct CachedSample {
    taken_at_ms: u64,
    sample: RawSample,
}

/// Representation of a HYT sensor
pub struct Hyt<I2C, D, C> {
    /// concrete I²C device implementation
    i2c: I2C,
    delay: D,
    clock: C,
    /// I²C device address
    address: u8,
    /// last fresh sample, `None` until the first successful read
    last: Option<CachedSample>,
}

impl<I2C, D, C> Hyt<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Create a driver on the default address `0x28` and start a measurement.
    pub fn new_default(i2c: I2C, delay: D, clock: C) -> Result<Self, Error<I2C::Error>> {
        Self::new(i2c, delay, clock, DEFAULT_ADDRESS)
    }

    /// Create a driver on a custom address and start a measurement.
    pub fn new(i2c: I2C, delay: D, clock: C, address: u8) -> Result<Self, Error<I2C::Error>> {
        let mut hyt = Hyt {
            i2c,
            delay,
            clock,
            address,
            last: None,
        };
        hyt.start_measurement()?;
        Ok(hyt)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Last fresh sample, if any.
    pub fn raw_sample(&self) -> Option<RawSample> {
        self.last.map(|cached| cached.sample)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Trigger a conversion cycle.
    pub fn start_measurement(&mut self) -> Result<(), Error<I2C::Error>> {
        trace!("hyt {:#x}: start measurement", self.address);
        self.i2c
            .write(self.address, &[HYT_START_MEASUREMENT_CMD])
            .map_err(Error::I2c)
    }

    /// Temperature in degrees celsius.
    pub fn get_temperature(&mut self) -> Result<Reading, Error<I2C::Error>> {
        let sample = self.ensure_fresh_reading()?;
        match sample.temperature_celsius() {
            Some(celsius) => Ok(Reading::temperature(celsius)),
            None => Err(self.out_of_range(Kind::Temperature, sample.temperature)),
        }
    }

    /// Relative humidity in percent.
    pub fn get_humidity(&mut self) -> Result<Reading, Error<I2C::Error>> {
        let sample = self.ensure_fresh_reading()?;
        match sample.humidity_percent() {
            Some(percent) => Ok(Reading::relative_humidity(percent)),
            None => Err(self.out_of_range(Kind::RelativeHumidity, sample.humidity)),
        }
    }

    /// Temperature and humidity from the same sample.
    pub fn measure(&mut self) -> Result<Measurements, Error<I2C::Error>> {
        let sample = self.ensure_fresh_reading()?;
        let temperature = sample
            .temperature_celsius()
            .ok_or_else(|| self.out_of_range(Kind::Temperature, sample.temperature))?;
        let humidity = sample
            .humidity_percent()
            .ok_or_else(|| self.out_of_range(Kind::RelativeHumidity, sample.humidity))?;
        Ok(Measurements { temperature, humidity })
    }

    /// Return the cached sample if it is recent enough, otherwise run a full
    /// conversion cycle and poll until the sensor reports a fresh sample.
    pub fn ensure_fresh_reading(&mut self) -> Result<RawSample, Error<I2C::Error>> {
        if let Some(cached) = self.last {
            let age = self.clock.now_ms().saturating_sub(cached.taken_at_ms);
            if age <= HYT_CACHE_MS {
                trace!("hyt {:#x}: reusing sample from {} ms ago", self.address, age);
                return Ok(cached.sample);
            }
        }

        self.start_measurement()?;
        for attempt in 1..=HYT_POLL_RETRIES {
            self.delay.delay_ms(HYT_POLL_INTERVAL_MS);
            let data = self.read_data()?;
            match RawSample::parse(data) {
                Some(sample) => {
                    debug!(
                        "hyt {:#x}: fresh sample after {} polls, raw humidity {}, raw temperature {}",
                        self.address,
                        attempt,
                        sample.humidity,
                        sample.temperature
                    );
                    self.last = Some(CachedSample {
                        taken_at_ms: self.clock.now_ms(),
                        sample,
                    });
                    return Ok(sample);
                }
                None => trace!("hyt {:#x}: stale, poll {}", self.address, attempt),
            }
        }

        warn!(
            "hyt {:#x}: no fresh sample after {} polls",
            self.address,
            HYT_POLL_RETRIES
        );
        Err(Error::MeasurementTimeout { address: self.address })
    }

    fn read_data(&mut self) -> Result<[u8; SAMPLE_LEN], Error<I2C::Error>> {
        let mut data = [0u8; SAMPLE_LEN];
        self.i2c.read(self.address, &mut data).map_err(Error::I2c)?;
        Ok(data)
    }

    fn out_of_range(&self, kind: Kind, raw: u16) -> Error<I2C::Error> {
        warn!("hyt {:#x}: {} raw value {:#x} out of range", self.address, kind.tag(), raw);
        Error::OutOfRange { kind, raw }
    }
}
