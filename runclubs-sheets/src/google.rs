//! Google Sheets v4 REST source.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::error::SheetError;
use crate::sheet::{Row, Sheet, SheetSource};

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Reads every sheet of a spreadsheet through the public API using an API key.
pub struct GoogleSheets {
    http: reqwest::blocking::Client,
    api_key: String,
    sheet_id: String,
}

impl GoogleSheets {
    pub fn new(api_key: impl Into<String>, sheet_id: impl Into<String>) -> Result<Self, SheetError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("socialrunclubs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            sheet_id: sheet_id.into(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, SheetError> {
        let mut url = Url::parse(BASE_URL).map_err(|e| SheetError::source(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::source("base URL cannot have path segments"))?
            .push(&self.sheet_id)
            .extend(segments);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    fn get_text(&self, url: Url, what: &str) -> Result<String, SheetError> {
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(SheetError::source(format!(
                "getting {what}: http status {status}: {}",
                text.chars().take(200).collect::<String>()
            )));
        }
        Ok(text)
    }

    fn sheet_names(&self) -> Result<Vec<String>, SheetError> {
        let mut url = self.url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets(properties(sheetId,title))");
        let text = self.get_text(url, "sheets")?;
        let response: SpreadsheetResponse = serde_json::from_str(&text)?;
        Ok(response
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }

    fn sheet_values(&self, name: &str) -> Result<Vec<Row>, SheetError> {
        let url = self.url(&["values", name])?;
        let text = self.get_text(url, &format!("values for sheet {name}"))?;
        let range: ValueRange = serde_json::from_str(&text)?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SheetSource for GoogleSheets {
    fn name(&self) -> &str {
        "Google Sheets"
    }

    fn fetch_sheets(&self) -> Result<Vec<Sheet>, SheetError> {
        let mut sheets = Vec::new();
        for name in self.sheet_names()? {
            log::debug!("fetching sheet {name}");
            let rows = self.sheet_values(&name)?;
            sheets.push(Sheet::new(name, rows));
        }
        Ok(sheets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_url_escapes_sheet_name() {
        let source = GoogleSheets::new("secret", "abc123").unwrap();
        let url = source.url(&["values", "IGNORE ME"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/IGNORE%20ME?key=secret"
        );
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(serde_json::json!("x")), "x");
        assert_eq!(cell_to_string(serde_json::json!(42)), "42");
        assert_eq!(cell_to_string(serde_json::json!(true)), "true");
        assert_eq!(cell_to_string(serde_json::Value::Null), "");
    }

    #[test]
    fn test_parse_value_range_without_values() {
        let range: ValueRange = serde_json::from_str(r#"{"range": "TAGS!A1:Z1000"}"#).unwrap();
        assert!(range.values.is_empty());
    }
}
