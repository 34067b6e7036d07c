use chrono::Duration;
use sb988_core::Timestamp;
use sb988_ports::Clock;

/// Clock that only moves in fixed steps
///
/// Equivalent to a frozen clock that the owner advances explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepClock {
    start: Timestamp,
    current: Timestamp,
    step: Duration,
    ticks: u64,
}

impl StepClock {
    pub fn new(start: Timestamp, step: Duration) -> Self {
        Self {
            start,
            current: start,
            step,
            ticks: 0,
        }
    }

    /// Move forward by one step and return the new time
    ///
    /// Returns `None` and leaves the clock untouched when the next time is
    /// not representable.
    pub fn advance(&mut self) -> Option<Timestamp> {
        self.current = self.current.checked_add_signed(self.step)?;
        self.ticks += 1;
        Some(self.current)
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Number of times the clock has been advanced
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time elapsed since the start
    pub fn elapsed(&self) -> Duration {
        self.current - self.start
    }
}

impl Clock for StepClock {
    fn now(&self) -> Timestamp {
        self.current
    }

    fn name(&self) -> &str {
        "StepClock"
    }
}
