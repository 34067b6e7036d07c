use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EntityError, EntityResult};

/// Monetary amount - exact decimal, never floating point
pub type Money = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Generate a v4 identifier from a caller-owned RNG
///
/// Entities built with `new` draw their id from the OS; anything that
/// creates entities during a run passes one of these to `with_id` so a
/// seeded run reproduces the same ids.
pub fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let bytes: [u8; 16] = rng.r#gen();
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// Sum monetary amounts, returning `None` if the total is not representable
pub fn checked_sum<I>(amounts: I) -> Option<Money>
where
    I: IntoIterator<Item = Money>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
}

/// Check that a behavioral scalar lies in [0, 1]
pub(crate) fn check_unit_interval(field: &'static str, value: f64) -> EntityResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EntityError::OutOfRange {
            field,
            value: value.to_string(),
            expected: "[0, 1]",
        })
    }
}

/// Check that a finite scalar is not negative
pub(crate) fn check_non_negative(field: &'static str, value: f64) -> EntityResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EntityError::OutOfRange {
            field,
            value: value.to_string(),
            expected: ">= 0",
        })
    }
}

/// Check that a monetary amount is not negative
pub(crate) fn check_non_negative_money(field: &'static str, value: Money) -> EntityResult<()> {
    if value < Decimal::ZERO {
        Err(EntityError::OutOfRange {
            field,
            value: value.to_string(),
            expected: ">= 0",
        })
    } else {
        Ok(())
    }
}
