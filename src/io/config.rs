//! Read/write JSON configuration files.
//!
//! - reference tables (`--reference`, `GROWTH_REFERENCE`, `calibrate --output`)
//! - sentiment lexicons (`sentiment --lexicon`)
//!
//! Reference tables are validated after every read so a bad file fails fast
//! with exit code 2 instead of surfacing later as a domain error.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::reference::ReferenceTable;
use crate::sentiment::Lexicon;

pub fn read_reference_json(path: &Path) -> Result<ReferenceTable, AppError> {
    let table: ReferenceTable = read_json(path, "reference table")?;
    table
        .validate()
        .map_err(|e| AppError::input(format!("{}: {e}", path.display())))?;
    Ok(table)
}

pub fn write_reference_json(path: &Path, table: &ReferenceTable) -> Result<(), AppError> {
    write_json(path, table, "reference table")
}

pub fn read_lexicon_json(path: &Path) -> Result<Lexicon, AppError> {
    read_json(path, "lexicon")
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open {what} JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid {what} JSON '{}': {e}", path.display())))
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create {what} JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::input(format!("Failed to write {what} JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_table_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        let table = ReferenceTable::default();
        write_reference_json(&path, &table).unwrap();
        assert_eq!(read_reference_json(&path).unwrap(), table);
    }

    #[test]
    fn invalid_table_is_rejected_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"name":"bad","entries":[{"metric":"weight","sex":"male",
                "mean":{"intercept":3.0,"slope":0.5},"sd":{"intercept":-1.0,"slope":0.0}}]}"#,
        )
        .unwrap();
        let err = read_reference_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("sd intercept"));
    }

    #[test]
    fn lexicon_reads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lex.json");
        std::fs::write(&path, r#"{"positive":["yay"],"negative":["meh"]}"#).unwrap();
        let lex = read_lexicon_json(&path).unwrap();
        assert_eq!(lex.positive, vec!["yay".to_string()]);
    }

    #[test]
    fn missing_file_is_input_error() {
        let err = read_lexicon_json(Path::new("/nonexistent/lexicon.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
