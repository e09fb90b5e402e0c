//! Age arithmetic.

use chrono::NaiveDate;

/// Average Gregorian month length in days (365.25 / 12).
pub const DAYS_PER_MONTH: f64 = 30.4375;

/// Age in (fractional) months at `measured_on`.
///
/// Returns `None` when the measurement predates the birth date.
pub fn age_in_months(birth_date: NaiveDate, measured_on: NaiveDate) -> Option<f64> {
    let days = (measured_on - birth_date).num_days();
    if days < 0 {
        return None;
    }
    Some(days as f64 / DAYS_PER_MONTH)
}
