//! Calibrated values tagged with what they measure and in which unit.
//!
//! Every reading has the same `(value, kind, unit)` shape so a generic
//! poller can format any sensor's output the same way.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Kind {
    Temperature,
    RelativeHumidity,
}

impl Kind {
    pub fn tag(&self) -> &'static str {
        match self {
            Kind::Temperature => "temp",
            Kind::RelativeHumidity => "rel_hum",
        }
    }
}

/// Unit of a reading's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Unit {
    /// degrees celsius
    Celsius,
    /// percent
    Percent,
}

impl Unit {
    pub fn tag(&self) -> &'static str {
        match self {
            Unit::Celsius => "c",
            Unit::Percent => "p",
        }
    }
}

/// A calibrated value, rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub value: f32,
    pub kind: Kind,
    pub unit: Unit,
}

impl Reading {
    pub fn temperature(celsius: f32) -> Self {
        Reading {
            value: celsius,
            kind: Kind::Temperature,
            unit: Unit::Celsius,
        }
    }

    pub fn relative_humidity(percent: f32) -> Self {
        Reading {
            value: percent,
            kind: Kind::RelativeHumidity,
            unit: Unit::Percent,
        }
    }

    /// `(value, kind tag, unit tag)`, e.g. `(25.0, "temp", "c")`.
    pub fn as_tuple(&self) -> (f32, &'static str, &'static str) {
        (self.value, self.kind.tag(), self.unit.tag())
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}
