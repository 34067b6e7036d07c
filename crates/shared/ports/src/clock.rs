use chrono::NaiveDate;
use sb988_core::Timestamp;

/// Port for simulated time
///
/// The engine reads the current step's time through this trait; how and
/// when time moves is up to the implementation.
pub trait Clock {
    fn now(&self) -> Timestamp;

    /// Calendar date of `now`, used for date-granular rules such as
    /// contract end dates
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn name(&self) -> &str {
        "Clock"
    }
}
