//! Shared batch pipeline logic.
//!
//! ingest CSV -> assess (parallel) -> summarize
//!
//! Per-row domain failures (e.g. a custom table whose sd reaches zero at some
//! age) are collected next to the ingest row errors instead of aborting.

use std::path::Path;

use rayon::prelude::*;

use crate::domain::{Assessment, Measurement};
use crate::error::AppError;
use crate::io::ingest::{Ingested, RowError, load_measurements};
use crate::percentile::PercentileEstimator;
use crate::report::{BatchSummary, summarize};

/// All computed outputs of a single `growth batch` run.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub measurements: Vec<Measurement>,
    pub assessments: Vec<Assessment>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub summary: BatchSummary,
}

/// Assess every measurement in parallel, preserving input order.
///
/// Returns the successful assessments and `(index, error)` for failures.
pub fn assess_all(
    measurements: &[Measurement],
    estimator: &PercentileEstimator,
) -> (Vec<Assessment>, Vec<(usize, String)>) {
    let results: Vec<_> = measurements.par_iter().map(|m| estimator.assess(m)).collect();

    let mut ok = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for (idx, r) in results.into_iter().enumerate() {
        match r {
            Ok(a) => ok.push(a),
            Err(e) => failed.push((idx, e.to_string())),
        }
    }
    (ok, failed)
}

/// Execute the full batch pipeline for a measurements CSV.
pub fn run_batch(path: &Path, estimator: &PercentileEstimator, top_n: usize) -> Result<BatchOutput, AppError> {
    let ingest = load_measurements(path)?;
    tracing::debug!(
        rows_read = ingest.rows_read,
        rows_used = ingest.rows_used(),
        "measurements ingested"
    );
    run_batch_with(ingest, estimator, top_n)
}

/// Pipeline tail for already-ingested measurements.
pub fn run_batch_with(
    ingest: Ingested<Measurement>,
    estimator: &PercentileEstimator,
    top_n: usize,
) -> Result<BatchOutput, AppError> {
    let Ingested {
        rows: measurements,
        lines,
        mut row_errors,
        rows_read,
    } = ingest;

    let (assessments, failed) = assess_all(&measurements, estimator);
    for (idx, message) in failed {
        let m = &measurements[idx];
        tracing::warn!(id = %m.id, %message, "assessment failed");
        row_errors.push(RowError {
            line: lines[idx],
            id: Some(m.id.clone()),
            message,
        });
    }

    if assessments.is_empty() {
        return Err(AppError::new(3, "No measurement could be assessed against the reference table."));
    }

    let summary = summarize(&assessments, top_n);
    Ok(BatchOutput {
        measurements,
        assessments,
        row_errors,
        rows_read,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinearCoef, Metric, Sex};
    use crate::io::ingest::read_measurements;
    use crate::reference::ReferenceTable;

    fn measurement(id: &str, age: f64, value: f64) -> Measurement {
        Measurement {
            id: id.to_string(),
            metric: Metric::Weight,
            sex: Sex::Female,
            age_months: age,
            value,
        }
    }

    #[test]
    fn assess_all_preserves_order() {
        let ms: Vec<Measurement> = (0..200).map(|i| measurement(&format!("m{i}"), 3.0, 5.0 + i as f64 * 0.01)).collect();
        let (ok, failed) = assess_all(&ms, &PercentileEstimator::default());
        assert!(failed.is_empty());
        assert_eq!(ok.len(), 200);
        for (i, a) in ok.iter().enumerate() {
            assert_eq!(a.measurement.id, format!("m{i}"));
        }
    }

    #[test]
    fn domain_failures_become_row_errors() {
        let mut table = ReferenceTable::default();
        for e in &mut table.entries {
            e.sd = LinearCoef::new(1.0, -0.1);
        }
        let est = PercentileEstimator::new(table);

        let csv = "id,sex,metric,value,age_months\nyoung,female,weight,4,1\nold,female,weight,9,20\n";
        let ingest = read_measurements(csv.as_bytes()).unwrap();
        let out = run_batch_with(ingest, &est, 5).unwrap();

        assert_eq!(out.rows_read, 2);
        assert_eq!(out.assessments.len(), 1);
        assert_eq!(out.row_errors.len(), 1);
        assert_eq!(out.row_errors[0].id.as_deref(), Some("old"));
        assert_eq!(out.row_errors[0].line, 3);
    }

    #[test]
    fn batch_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.csv");
        std::fs::write(&path, "sex,metric,value,age_months\nmale,weight,3.4,0\nmale,height,50,0\n").unwrap();
        let out = run_batch(&path, &PercentileEstimator::default(), 3).unwrap();
        assert_eq!(out.assessments.len(), 2);
        assert!(out.assessments.iter().all(|a| a.percentile == 50));
    }
}
