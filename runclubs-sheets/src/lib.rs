//! Tabular input for the site build: named sheets of string rows, header
//! validation, and the sources they are fetched from.

pub mod csv_dir;
pub mod error;
pub mod google;
pub mod retry;
pub mod sheet;

pub use csv_dir::CsvDirectory;
pub use error::SheetError;
pub use google::GoogleSheets;
pub use retry::retry;
pub use sheet::{Columns, Row, Sheet, SheetSource, validate_columns};
