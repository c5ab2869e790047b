//! In-memory HYT device for host-side tests and demos.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};

use super::sample::SAMPLE_LEN;
use super::DEFAULT_ADDRESS;

const STALE_BIT: u8 = 0b0100_0000;

/// 10.00 %RH, 25.00 C
pub const REFERENCE_SAMPLE: [u8; SAMPLE_LEN] = [0x06, 0x66, 0x64, 0xDA];

/// Simulated HYT sensor answering on a single address.
///
/// Every write is taken as a start measurement command. The sample then
/// reads back stale for `conversion_polls` reads, and fresh exactly once
/// after that.
#[derive(Debug, Clone)]
pub struct SimulatedHyt {
    address: u8,
    sample: [u8; SAMPLE_LEN],
    conversion_polls: u32,
    polls_until_ready: u32,
    fresh: bool,
    writes: u32,
    reads: u32,
}

impl Default for SimulatedHyt {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHyt {
    pub fn new() -> Self {
        SimulatedHyt {
            address: DEFAULT_ADDRESS,
            sample: REFERENCE_SAMPLE,
            conversion_polls: 0,
            polls_until_ready: 0,
            fresh: false,
            writes: 0,
            reads: 0,
        }
    }

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Bytes returned once a conversion is done. The stale bit is cleared.
    pub fn with_sample(mut self, sample: [u8; SAMPLE_LEN]) -> Self {
        self.set_sample(sample);
        self
    }

    /// Number of reads that come back stale after each start command.
    pub fn with_conversion_polls(mut self, polls: u32) -> Self {
        self.conversion_polls = polls;
        self
    }

    pub fn set_sample(&mut self, sample: [u8; SAMPLE_LEN]) {
        self.sample = sample;
        self.sample[0] &= !STALE_BIT;
    }

    /// Start measurement commands received.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Sample reads served, stale or not.
    pub fn reads(&self) -> u32 {
        self.reads
    }

    fn start_conversion(&mut self) {
        self.writes += 1;
        self.polls_until_ready = self.conversion_polls;
        self.fresh = true;
    }

    fn read_sample(&mut self, buf: &mut [u8]) {
        self.reads += 1;
        let mut data = self.sample;
        if !self.fresh || self.polls_until_ready > 0 {
            self.polls_until_ready = self.polls_until_ready.saturating_sub(1);
            data[0] |= STALE_BIT;
        } else {
            self.fresh = false;
        }
        for (dst, src) in buf.iter_mut().zip(data.iter()) {
            *dst = *src;
        }
    }
}

impl ErrorType for SimulatedHyt {
    type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for SimulatedHyt {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(_) => self.start_conversion(),
                Operation::Read(buf) => self.read_sample(buf),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_until_converted() {
        let mut sim = SimulatedHyt::new().with_conversion_polls(2);
        let mut buf = [0u8; SAMPLE_LEN];

        // nothing started yet
        sim.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(buf[0] & STALE_BIT, STALE_BIT);

        sim.write(DEFAULT_ADDRESS, &[0x00]).unwrap();
        sim.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(buf[0] & STALE_BIT, STALE_BIT);
        sim.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(buf[0] & STALE_BIT, STALE_BIT);
        sim.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(buf, REFERENCE_SAMPLE);
        // already consumed
        sim.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(buf[0] & STALE_BIT, STALE_BIT);

        assert_eq!(sim.writes(), 1);
        assert_eq!(sim.reads(), 5);
    }

    #[test]
    fn sample_never_reads_stale_by_itself() {
        let mut sim = SimulatedHyt::new().with_sample([0xFF, 0x00, 0x00, 0x00]);
        let mut buf = [0u8; SAMPLE_LEN];
        sim.write(DEFAULT_ADDRESS, &[0x00]).unwrap();
        sim.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(buf, [0xBF, 0x00, 0x00, 0x00]);

        sim.set_sample([0x46, 0x66, 0x64, 0xDA]);
        sim.write(DEFAULT_ADDRESS, &[0x00]).unwrap();
        sim.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(buf, REFERENCE_SAMPLE);
    }

    #[test]
    fn nacks_other_addresses() {
        let mut sim = SimulatedHyt::new();
        assert_eq!(
            sim.write(0x29, &[0x00]),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );
        assert_eq!(sim.writes(), 0);
    }
}
