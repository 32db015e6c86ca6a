/// Errors that can occur while fetching or validating sheets.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Sheet source error: {0}")]
    Source(String),

    #[error("after {attempts} attempts, last error: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl SheetError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }
}
