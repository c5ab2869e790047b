//! Time doubles: a delay that advances a shared fake clock instead of sleeping.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use crate::clock::Clock;

#[derive(Clone, Default)]
pub struct FakeClock {
    now_ns: Rc<Cell<u64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_ns.set(self.now_ns.get() + ms * 1_000_000);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.now_ns.get() / 1_000_000
    }

    /// A delay that moves this clock forward.
    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            clock: self.clone(),
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl Clock for FakeClock {
    fn now_ms(&mut self) -> u64 {
        self.elapsed_ms()
    }
}

#[derive(Clone)]
pub struct FakeDelay {
    clock: FakeClock,
    calls: Rc<Cell<u32>>,
}

impl FakeDelay {
    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.set(self.calls.get() + 1);
        let now = &self.clock.now_ns;
        now.set(now.get() + ns as u64);
    }
}
