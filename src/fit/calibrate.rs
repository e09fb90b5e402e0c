//! Calibrate a reference table from tabulated reference points.
//!
//! For each (metric, sex) group we fit two independent lines by least squares:
//!
//! ```text
//! mean(age) = a0 + a1 * age
//! sd(age)   = b0 + b1 * age
//! ```
//!
//! This is how published percentile tables are brought into the linear model
//! without touching the bundled demonstration coefficients. A straight line is
//! a poor fit over long age ranges; the per-group RMSE/R² make that visible.

use std::collections::BTreeMap;

use crate::domain::{LinearCoef, Metric, ReferencePoint, Sex};
use crate::error::AppError;
use crate::math::{LineFit, fit_line};
use crate::reference::{ReferenceEntry, ReferenceTable};

/// Fit diagnostics for one (metric, sex) group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFit {
    pub metric: Metric,
    pub sex: Sex,
    pub n: usize,
    pub mean_fit: LineFit,
    pub sd_fit: LineFit,
}

#[derive(Debug, Clone)]
pub struct Calibration {
    pub table: ReferenceTable,
    pub groups: Vec<GroupFit>,
    /// Groups that could not be fitted, with the reason.
    pub skipped: Vec<(Metric, Sex, String)>,
}

/// Fit a reference table named `name` from `points`.
pub fn calibrate(points: &[ReferencePoint], name: &str) -> Result<Calibration, AppError> {
    let mut grouped: BTreeMap<(Metric, Sex), Vec<&ReferencePoint>> = BTreeMap::new();
    for p in points {
        grouped.entry((p.metric, p.sex)).or_default().push(p);
    }

    let mut entries = Vec::new();
    let mut groups = Vec::new();
    let mut skipped = Vec::new();

    for ((metric, sex), pts) in grouped {
        match fit_group(&pts) {
            Ok((mean_fit, sd_fit)) => {
                entries.push(ReferenceEntry {
                    metric,
                    sex,
                    mean: LinearCoef::new(mean_fit.intercept, mean_fit.slope),
                    sd: LinearCoef::new(sd_fit.intercept, sd_fit.slope),
                });
                groups.push(GroupFit {
                    metric,
                    sex,
                    n: pts.len(),
                    mean_fit,
                    sd_fit,
                });
            }
            Err(reason) => skipped.push((metric, sex, reason)),
        }
    }

    let table = ReferenceTable {
        name: name.to_string(),
        note: format!("Calibrated by least squares from {} reference points.", points.len()),
        entries,
    };
    table
        .validate()
        .map_err(|e| AppError::new(4, format!("Calibrated table is unusable: {e}")))?;

    Ok(Calibration { table, groups, skipped })
}

fn fit_group(points: &[&ReferencePoint]) -> Result<(LineFit, LineFit), String> {
    let ages: Vec<f64> = points.iter().map(|p| p.age_months).collect();
    if count_distinct(&ages) < 2 {
        return Err("needs at least two distinct ages".to_string());
    }
    let means: Vec<f64> = points.iter().map(|p| p.mean).collect();
    let sds: Vec<f64> = points.iter().map(|p| p.sd).collect();

    let mean_fit = fit_line(&ages, &means).ok_or_else(|| "mean fit failed".to_string())?;
    let sd_fit = fit_line(&ages, &sds).ok_or_else(|| "sd fit failed".to_string())?;
    Ok((mean_fit, sd_fit))
}

fn count_distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
    sorted.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(metric: Metric, sex: Sex, age: f64, mean: f64, sd: f64) -> ReferencePoint {
        ReferencePoint {
            metric,
            sex,
            age_months: age,
            mean,
            sd,
        }
    }

    #[test]
    fn recovers_default_coefficients_from_generated_points() {
        let base = ReferenceTable::default();
        let mut points = Vec::new();
        for entry in &base.entries {
            for age in [0.0, 2.0, 4.0, 6.0, 9.0, 12.0] {
                points.push(point(entry.metric, entry.sex, age, entry.mean.at(age), entry.sd.at(age)));
            }
        }

        let cal = calibrate(&points, "roundtrip").unwrap();
        assert!(cal.skipped.is_empty());
        assert_eq!(cal.groups.len(), 6);

        for entry in &base.entries {
            let fitted = cal.table.coefficients(entry.metric, entry.sex).unwrap();
            assert!((fitted.mean.intercept - entry.mean.intercept).abs() < 1e-8);
            assert!((fitted.mean.slope - entry.mean.slope).abs() < 1e-8);
            assert!((fitted.sd.intercept - entry.sd.intercept).abs() < 1e-8);
            assert!((fitted.sd.slope - entry.sd.slope).abs() < 1e-8);
        }
    }

    #[test]
    fn single_age_group_is_skipped() {
        let points = vec![
            point(Metric::Weight, Sex::Male, 0.0, 3.3, 0.4),
            point(Metric::Weight, Sex::Male, 3.0, 6.4, 0.7),
            point(Metric::Head, Sex::Female, 1.0, 36.0, 1.2),
            point(Metric::Head, Sex::Female, 1.0, 36.2, 1.2),
        ];
        let cal = calibrate(&points, "partial").unwrap();
        assert_eq!(cal.table.entries.len(), 1);
        assert_eq!(cal.skipped.len(), 1);
        assert_eq!(cal.skipped[0].0, Metric::Head);
    }

    #[test]
    fn nothing_fittable_is_an_error() {
        let points = vec![point(Metric::Weight, Sex::Male, 0.0, 3.3, 0.4)];
        let err = calibrate(&points, "empty").unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
