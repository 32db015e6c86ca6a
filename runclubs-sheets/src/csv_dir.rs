//! Local source: one `<SHEET NAME>.csv` file per sheet.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SheetError;
use crate::sheet::{Row, Sheet, SheetSource};

pub struct CsvDirectory {
    dir: PathBuf,
    label: String,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let label = format!("CSV directory {}", dir.display());
        Self { dir, label }
    }
}

/// Parse one CSV document into rows. Rows may have differing lengths.
pub fn parse_csv(content: &str) -> Result<Vec<Row>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

fn sheet_name(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("csv") {
        return None;
    }
    path.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string())
}

impl SheetSource for CsvDirectory {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch_sheets(&self) -> Result<Vec<Sheet>, SheetError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)?.flatten() {
            let path = entry.path();
            if let Some(name) = sheet_name(&path) {
                files.push((name, path));
            }
        }
        files.sort();

        let mut sheets = Vec::new();
        for (name, path) in files {
            let content = fs::read_to_string(&path)?;
            sheets.push(Sheet::new(name, parse_csv(&content)?));
        }
        Ok(sheets)
    }
}
