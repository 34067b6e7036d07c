//! SB 988 Clock
//!
//! Simulated time for the engine. Time only moves when the engine
//! advances it, one fixed step at a time, so a run never depends on
//! wall-clock time.
//!
//! ## Usage
//!
//! ```ignore
//! use sb988_clock::{Clock, StepClock};
//! use chrono::Duration;
//!
//! let mut clock = StepClock::new(start, Duration::days(1));
//! clock.advance();
//! assert_eq!(clock.now(), start + Duration::days(1));
//! ```

mod step;

pub use step::StepClock;

// Re-export the Clock trait for convenience
pub use sb988_ports::Clock;
