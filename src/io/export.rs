//! Export per-measurement assessments to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Assessment;
use crate::error::AppError;

pub const RESULTS_HEADER: &str = "id,metric,sex,age_months,value,unit,mean,sd,z,percentile,band";

/// Write assessments to a CSV file.
pub fn write_results_csv(path: &Path, assessments: &[Assessment]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, assessments)
}

/// Write assessments as CSV to any writer.
pub fn write_results<W: Write>(out: W, assessments: &[Assessment]) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(RESULTS_HEADER.split(','))
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for a in assessments {
        let m = &a.measurement;
        wtr.write_record([
            m.id.clone(),
            m.metric.as_str().to_string(),
            m.sex.as_str().to_string(),
            format!("{:.4}", m.age_months),
            format!("{:.4}", m.value),
            m.metric.unit().to_string(),
            format!("{:.4}", a.curve.mean),
            format!("{:.4}", a.curve.sd),
            format!("{:.4}", a.z),
            a.percentile.to_string(),
            a.band().label().to_string(),
        ])
        .map_err(|e| AppError::input(format!("Failed to write export CSV row '{}': {e}", m.id)))?;
    }

    wtr.flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))
}
