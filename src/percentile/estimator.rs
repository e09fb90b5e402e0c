//! Percentile estimation against a Gaussian reference.
//!
//! Given a reference `(mean, sd)` the percentile rank of a value is
//! `round(Φ((value - mean) / sd) * 100)`, clamped to `[0, 100]`.
//!
//! This is a normal approximation, not a lookup into LMS growth-chart tables.

use crate::domain::{Assessment, Measurement, Metric, ReferenceCurve, Sex};
use crate::error::DomainError;
use crate::math::{standard_normal_cdf, standard_normal_quantile};
use crate::reference::ReferenceTable;

fn ensure_finite(what: &'static str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DomainError::NonFinite { what, value })
    }
}

fn ensure_sd(sd: f64) -> Result<(), DomainError> {
    // `!(sd > 0.0)` also catches NaN.
    if !(sd > 0.0) || !sd.is_finite() {
        return Err(DomainError::NonPositiveSd(sd));
    }
    Ok(())
}

/// Number of standard deviations `value` lies from `mean`.
pub fn z_score(value: f64, mean: f64, sd: f64) -> Result<f64, DomainError> {
    ensure_finite("measurement value", value)?;
    ensure_finite("reference mean", mean)?;
    ensure_sd(sd)?;
    Ok((value - mean) / sd)
}

/// Integer percentile rank of `value` against `N(mean, sd²)`.
pub fn estimate_percentile(value: f64, mean: f64, sd: f64) -> Result<u8, DomainError> {
    let z = z_score(value, mean, sd)?;
    Ok(percentile_from_z(z))
}

/// Map a z-score to `[0, 100]`.
pub fn percentile_from_z(z: f64) -> u8 {
    let p = (standard_normal_cdf(z) * 100.0).round();
    p.clamp(0.0, 100.0) as u8
}

/// Measurement value sitting at percentile `p` (0–100 exclusive) of `curve`.
///
/// Used to draw percentile bands. Returns `Ok(None)` for `p` outside
/// `(0, 100)`; a curve with a non-positive sd is a `DomainError`, since the
/// bands would otherwise come out inverted.
pub fn value_at_percentile(curve: ReferenceCurve, p: f64) -> Result<Option<f64>, DomainError> {
    ensure_finite("reference mean", curve.mean)?;
    ensure_sd(curve.sd)?;
    if !(p > 0.0 && p < 100.0) {
        return Ok(None);
    }
    let z = standard_normal_quantile(p / 100.0);
    Ok(Some(curve.mean + curve.sd * z))
}

/// Estimator bound to one reference table.
#[derive(Debug, Clone, Default)]
pub struct PercentileEstimator {
    table: ReferenceTable,
}

impl PercentileEstimator {
    pub fn new(table: ReferenceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    pub fn curve(&self, age_months: f64, sex: Sex, metric: Metric) -> Result<ReferenceCurve, DomainError> {
        self.table.curve(age_months, sex, metric)
    }

    pub fn percentile(&self, value: f64, age_months: f64, sex: Sex, metric: Metric) -> Result<u8, DomainError> {
        let curve = self.curve(age_months, sex, metric)?;
        estimate_percentile(value, curve.mean, curve.sd)
    }

    /// Rank one measurement, keeping the intermediate curve and z-score.
    pub fn assess(&self, m: &Measurement) -> Result<Assessment, DomainError> {
        let curve = self.curve(m.age_months, m.sex, m.metric)?;
        let z = z_score(m.value, curve.mean, curve.sd)?;
        Ok(Assessment {
            measurement: m.clone(),
            curve,
            z,
            percentile: percentile_from_z(z),
        })
    }
}
