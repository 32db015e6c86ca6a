use std::collections::{HashMap, HashSet};

use crate::error::SheetError;

pub type Row = Vec<String>;

/// A named table; the first row is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Data rows paired with their 1-based spreadsheet row number.
    pub fn records(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().enumerate().skip(1).map(|(i, row)| (i + 1, row))
    }
}

/// Anything that can produce the full list of sheets of a spreadsheet.
pub trait SheetSource {
    fn name(&self) -> &str;

    fn fetch_sheets(&self) -> Result<Vec<Sheet>, SheetError>;
}

/// Column name -> position mapping produced by [`validate_columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Trimmed cell value. Rows shorter than the header read as empty cells;
    /// asking for a column outside the validated set is an error.
    pub fn value<'a>(&self, row: &'a [String], name: &str) -> Result<&'a str, SheetError> {
        let col = self
            .position(name)
            .ok_or_else(|| SheetError::schema(format!("unknown column: {name}")))?;
        Ok(row.get(col).map(|v| v.trim()).unwrap_or(""))
    }
}

/// Check that `header` contains exactly the `required` columns, in any order.
pub fn validate_columns(header: &[String], required: &[&str]) -> Result<Columns, SheetError> {
    if header.len() != required.len() {
        return Err(SheetError::schema(format!(
            "expected {} columns, got {}",
            required.len(),
            header.len()
        )));
    }

    let mut index = HashMap::new();
    for (i, col) in header.iter().enumerate() {
        if index.insert(col.clone(), i).is_some() {
            return Err(SheetError::schema(format!("duplicate column: {col}")));
        }
    }
    for col in required {
        if !index.contains_key(*col) {
            return Err(SheetError::schema(format!("missing required column: {col}")));
        }
    }
    let required: HashSet<&str> = required.iter().copied().collect();
    for col in header {
        if !required.contains(col.as_str()) {
            return Err(SheetError::schema(format!("unexpected column: {col}")));
        }
    }

    Ok(Columns { index })
}

#[cfg(test)]
#[path = "tests/sheet_tests.rs"]
mod tests;
