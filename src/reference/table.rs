//! Reference tables: linear mean/sd models per (metric, sex).
//!
//! The bundled table is a demonstrative approximation. It is **not** derived
//! from a clinical dataset (WHO/CDC growth charts) and must not be presented
//! as one. Replacing it goes through `calibrate` and a JSON table file, never
//! through editing the coefficients below.

use serde::{Deserialize, Serialize};

use crate::domain::{CurveCoefficients, LinearCoef, Metric, ReferenceCurve, Sex};
use crate::error::DomainError;

pub const DEFAULT_TABLE_NAME: &str = "demo-linear";

pub const NON_CLINICAL_NOTE: &str =
    "Linear approximation for demonstration only; not a substitute for clinical growth charts.";

const DEFAULT_COEFFICIENTS: [(Metric, Sex, CurveCoefficients); 6] = [
    (Metric::Weight, Sex::Male, coefs(3.4, 0.48, 0.9, 0.03)),
    (Metric::Weight, Sex::Female, coefs(3.2, 0.46, 0.9, 0.03)),
    (Metric::Height, Sex::Male, coefs(50.0, 2.7, 2.2, 0.05)),
    (Metric::Height, Sex::Female, coefs(49.0, 2.6, 2.2, 0.05)),
    (Metric::Head, Sex::Male, coefs(34.0, 0.7, 1.6, 0.04)),
    (Metric::Head, Sex::Female, coefs(33.5, 0.65, 1.6, 0.04)),
];

const fn coefs(mean_intercept: f64, mean_slope: f64, sd_intercept: f64, sd_slope: f64) -> CurveCoefficients {
    CurveCoefficients {
        mean: LinearCoef::new(mean_intercept, mean_slope),
        sd: LinearCoef::new(sd_intercept, sd_slope),
    }
}

/// One row of a reference table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub metric: Metric,
    pub sex: Sex,
    pub mean: LinearCoef,
    pub sd: LinearCoef,
}

impl ReferenceEntry {
    pub fn coefficients(&self) -> CurveCoefficients {
        CurveCoefficients {
            mean: self.mean,
            sd: self.sd,
        }
    }
}

/// A named set of reference curves (the JSON schema of `--reference` files).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    pub name: String,
    #[serde(default)]
    pub note: String,
    pub entries: Vec<ReferenceEntry>,
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self {
            name: DEFAULT_TABLE_NAME.to_string(),
            note: NON_CLINICAL_NOTE.to_string(),
            entries: DEFAULT_COEFFICIENTS
                .iter()
                .map(|&(metric, sex, c)| ReferenceEntry {
                    metric,
                    sex,
                    mean: c.mean,
                    sd: c.sd,
                })
                .collect(),
        }
    }
}

impl ReferenceTable {
    pub fn coefficients(&self, metric: Metric, sex: Sex) -> Option<CurveCoefficients> {
        self.entries
            .iter()
            .find(|e| e.metric == metric && e.sex == sex)
            .map(ReferenceEntry::coefficients)
    }

    /// Evaluate the reference curve at `age_months`.
    ///
    /// Negative ages are treated as 0. The returned `sd` is not checked here;
    /// `estimate_percentile` rejects non-positive values.
    pub fn curve(&self, age_months: f64, sex: Sex, metric: Metric) -> Result<ReferenceCurve, DomainError> {
        if !age_months.is_finite() {
            return Err(DomainError::NonFinite {
                what: "age in months",
                value: age_months,
            });
        }
        let coefs = self.coefficients(metric, sex).ok_or_else(|| DomainError::MissingCurve {
            metric: metric.as_str().to_string(),
            sex: sex.as_str().to_string(),
        })?;

        let age = age_months.max(0.0);
        Ok(ReferenceCurve {
            mean: coefs.mean.at(age),
            sd: coefs.sd.at(age),
        })
    }

    /// Structural checks applied to every table loaded from disk.
    ///
    /// - no duplicate (metric, sex) pairs
    /// - all coefficients finite
    /// - sd strictly positive at birth
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidTable("table has no entries".to_string()));
        }
        for (i, e) in self.entries.iter().enumerate() {
            let label = format!("{}/{}", e.metric.as_str(), e.sex.as_str());
            if self.entries[..i]
                .iter()
                .any(|prev| prev.metric == e.metric && prev.sex == e.sex)
            {
                return Err(DomainError::InvalidTable(format!("duplicate entry for {label}")));
            }
            let all_finite = [e.mean.intercept, e.mean.slope, e.sd.intercept, e.sd.slope]
                .iter()
                .all(|v| v.is_finite());
            if !all_finite {
                return Err(DomainError::InvalidTable(format!("non-finite coefficient for {label}")));
            }
            if e.sd.intercept <= 0.0 {
                return Err(DomainError::InvalidTable(format!(
                    "sd intercept for {label} must be > 0 (got {})",
                    e.sd.intercept
                )));
            }
        }
        Ok(())
    }
}

/// Reference curve from the bundled demonstration table.
pub fn reference_curve(age_months: f64, sex: Sex, metric: Metric) -> Result<ReferenceCurve, DomainError> {
    ReferenceTable::default().curve(age_months, sex, metric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_table_is_complete_and_valid() {
        let table = ReferenceTable::default();
        table.validate().unwrap();
        for metric in Metric::ALL {
            for sex in Sex::ALL {
                assert!(table.coefficients(metric, sex).is_some(), "missing {metric:?}/{sex:?}");
            }
        }
    }

    #[test]
    fn newborn_male_weight() {
        let c = reference_curve(0.0, Sex::Male, Metric::Weight).unwrap();
        assert!(close(c.mean, 3.4));
        assert!(close(c.sd, 0.9));
    }

    #[test]
    fn six_month_female_height() {
        let c = reference_curve(6.0, Sex::Female, Metric::Height).unwrap();
        assert!(close(c.mean, 64.6));
        assert!(close(c.sd, 2.5));
    }

    #[test]
    fn negative_age_clamps_to_birth() {
        let at_birth = reference_curve(0.0, Sex::Female, Metric::Head).unwrap();
        let negative = reference_curve(-3.0, Sex::Female, Metric::Head).unwrap();
        assert_eq!(at_birth, negative);
    }

    #[test]
    fn non_finite_age_is_rejected() {
        let err = reference_curve(f64::NAN, Sex::Male, Metric::Head).unwrap_err();
        assert!(matches!(err, DomainError::NonFinite { .. }));
    }

    #[test]
    fn missing_pair_is_reported() {
        let mut table = ReferenceTable::default();
        table.entries.retain(|e| e.metric != Metric::Head);
        let err = table.curve(1.0, Sex::Male, Metric::Head).unwrap_err();
        assert!(matches!(err, DomainError::MissingCurve { .. }));
    }

    #[test]
    fn validate_rejects_duplicates_and_bad_sd() {
        let mut dup = ReferenceTable::default();
        dup.entries.push(dup.entries[0]);
        assert!(dup.validate().is_err());

        let mut bad_sd = ReferenceTable::default();
        bad_sd.entries[0].sd.intercept = 0.0;
        assert!(bad_sd.validate().is_err());

        let empty = ReferenceTable {
            name: "empty".to_string(),
            note: String::new(),
            entries: Vec::new(),
        };
        assert!(empty.validate().is_err());
    }
}
