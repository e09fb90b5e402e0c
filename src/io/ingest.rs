//! CSV ingest and normalization.
//!
//! Three input files share the same conventions:
//!
//! - measurements (`batch`, `plot --input`)
//! - tabulated reference points (`calibrate`)
//! - sleep log (`sleep-forecast`)
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Case-insensitive headers**, BOM tolerant
//! - no estimation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Measurement, Metric, ReferencePoint, Sex, age_in_months};
use crate::error::AppError;
use crate::forecast::SleepEntry;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: parsed rows plus the rows that were skipped.
#[derive(Debug, Clone)]
pub struct Ingested<T> {
    pub rows: Vec<T>,
    /// Source CSV line of each entry in `rows`.
    pub lines: Vec<usize>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl<T> Ingested<T> {
    pub fn rows_used(&self) -> usize {
        self.rows.len()
    }
}

pub fn load_measurements(path: &Path) -> Result<Ingested<Measurement>, AppError> {
    read_measurements(open_csv(path)?)
}

pub fn load_reference_points(path: &Path) -> Result<Ingested<ReferencePoint>, AppError> {
    read_reference_points(open_csv(path)?)
}

pub fn load_sleep_entries(path: &Path) -> Result<Ingested<SleepEntry>, AppError> {
    read_sleep_entries(open_csv(path)?)
}

/// Measurements CSV.
///
/// Required: `sex`, `metric`, `value`, and either `age_months` or both
/// `birth_date` and `measured_on`. Optional: `id` (defaults to `row-<line>`).
/// When both age forms are present on a row, `age_months` wins.
pub fn read_measurements<R: Read>(input: R) -> Result<Ingested<Measurement>, AppError> {
    let mut reader = csv_reader(input);
    let header_map = read_header_map(&mut reader)?;

    ensure_columns(&header_map, &["sex", "metric", "value"])?;
    let has_age = header_map.contains_key("age_months");
    let has_dates = header_map.contains_key("birth_date") && header_map.contains_key("measured_on");
    if !has_age && !has_dates {
        return Err(AppError::input(
            "Missing age columns: provide `age_months` or both `birth_date` and `measured_on`.",
        ));
    }

    collect_rows(&mut reader, |record, line| {
        let id = get_optional(record, &header_map, "id")
            .map(str::to_string)
            .unwrap_or_else(|| format!("row-{line}"));
        parse_measurement(record, &header_map, id.clone()).map_err(|message| (Some(id), message))
    })
}

/// Reference points CSV: `metric,sex,age_months,mean,sd`.
pub fn read_reference_points<R: Read>(input: R) -> Result<Ingested<ReferencePoint>, AppError> {
    let mut reader = csv_reader(input);
    let header_map = read_header_map(&mut reader)?;
    ensure_columns(&header_map, &["metric", "sex", "age_months", "mean", "sd"])?;

    collect_rows(&mut reader, |record, _line| {
        parse_reference_point(record, &header_map).map_err(|message| (None, message))
    })
}

/// Sleep log CSV: `date,hours`.
pub fn read_sleep_entries<R: Read>(input: R) -> Result<Ingested<SleepEntry>, AppError> {
    let mut reader = csv_reader(input);
    let header_map = read_header_map(&mut reader)?;
    ensure_columns(&header_map, &["date", "hours"])?;

    collect_rows(&mut reader, |record, _line| {
        parse_sleep_entry(record, &header_map).map_err(|message| (None, message))
    })
}

fn open_csv(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn read_header_map<R: Read>(reader: &mut csv::Reader<R>) -> Result<HashMap<String, usize>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?;
    Ok(build_header_map(headers))
}

/// Drive the record loop shared by every file kind.
///
/// `parse` returns the row or `(id, message)` for a row-level error.
fn collect_rows<R, T, F>(reader: &mut csv::Reader<R>, mut parse: F) -> Result<Ingested<T>, AppError>
where
    R: Read,
    F: FnMut(&StringRecord, usize) -> Result<T, (Option<String>, String)>,
{
    let mut rows = Vec::new();
    let mut lines = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse(&record, line) {
            Ok(row) => {
                rows.push(row);
                lines.push(line);
            }
            Err((id, message)) => row_errors.push(RowError { line, id, message }),
        }
    }

    if rows.is_empty() {
        let detail = row_errors
            .first()
            .map(|e| format!(" First error (line {}): {}", e.line, e.message))
            .unwrap_or_default();
        return Err(AppError::input(format!("No valid rows in CSV.{detail}")));
    }

    Ok(Ingested {
        rows,
        lines,
        row_errors,
        rows_read,
    })
}

fn parse_measurement(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    id: String,
) -> Result<Measurement, String> {
    let sex = parse_sex(get_required(record, header_map, "sex")?)?;
    let metric = parse_metric(get_required(record, header_map, "metric")?)?;
    let value = parse_f64(record, header_map, "value")?;
    if value <= 0.0 {
        return Err(format!("Measurement value must be > 0 (got {value})."));
    }

    let age_months = match get_optional(record, header_map, "age_months") {
        Some(s) => parse_number(s, "age_months")?,
        None => {
            let birth = parse_date(get_required(record, header_map, "birth_date")?)?;
            let measured_on = parse_date(get_required(record, header_map, "measured_on")?)?;
            age_in_months(birth, measured_on)
                .ok_or_else(|| format!("`measured_on` {measured_on} is before `birth_date` {birth}."))?
        }
    };
    if age_months < 0.0 {
        return Err(format!("Negative age: {age_months} months."));
    }

    Ok(Measurement {
        id,
        metric,
        sex,
        age_months,
        value,
    })
}

fn parse_reference_point(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<ReferencePoint, String> {
    let metric = parse_metric(get_required(record, header_map, "metric")?)?;
    let sex = parse_sex(get_required(record, header_map, "sex")?)?;
    let age_months = parse_f64(record, header_map, "age_months")?;
    let mean = parse_f64(record, header_map, "mean")?;
    let sd = parse_f64(record, header_map, "sd")?;
    if sd <= 0.0 {
        return Err(format!("Reference sd must be > 0 (got {sd})."));
    }
    Ok(ReferencePoint {
        metric,
        sex,
        age_months,
        mean,
        sd,
    })
}

fn parse_sleep_entry(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SleepEntry, String> {
    let date = parse_date(get_required(record, header_map, "date")?)?;
    let hours = parse_f64(record, header_map, "hours")?;
    if hours < 0.0 {
        return Err(format!("Negative sleep duration: {hours}"));
    }
    Ok(SleepEntry { date, hours })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_columns(header_map: &HashMap<String, usize>, required: &[&str]) -> Result<(), AppError> {
    for name in required {
        if !header_map.contains_key(*name) {
            return Err(AppError::input(format!("Missing required column: `{name}`")));
        }
    }
    Ok(())
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<f64, String> {
    parse_number(get_required(record, header_map, name)?, name)
}

fn parse_number(s: &str, name: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid number for `{name}`: '{s}'"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite value for `{name}`: '{s}'"))
    }
}

fn parse_sex(s: &str) -> Result<Sex, String> {
    Sex::parse(s).ok_or_else(|| format!("Invalid sex '{s}'. Expected female or male."))
}

fn parse_metric(s: &str) -> Result<Metric, String> {
    Metric::parse(s).ok_or_else(|| format!("Invalid metric '{s}'. Expected weight, height or head."))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}
