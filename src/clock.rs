//! Simulated day counter.

/// Day counter. Starts at 1 and moves forward once per executed trade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationClock {
    day: u32,
}

impl SimulationClock {
    pub const FIRST_DAY: u32 = 1;

    pub fn new() -> Self {
        Self {
            day: Self::FIRST_DAY,
        }
    }

    /// Clock positioned at `day`. Days before the first are clamped up.
    pub fn at(day: u32) -> Self {
        Self {
            day: day.max(Self::FIRST_DAY),
        }
    }

    #[inline]
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn advance(&mut self) {
        self.day = self.day.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.day = Self::FIRST_DAY;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}
