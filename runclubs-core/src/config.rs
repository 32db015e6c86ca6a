//! Run configuration loaded from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CoreError;

const DEFAULT_BASE_URL: &str = "https://socialrunclubs.de";

/// Google Sheets access and the form links shown on every page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    #[serde(alias = "APIKey")]
    pub api_key: String,
    #[serde(alias = "SheetId")]
    pub sheet_id: String,
    #[serde(alias = "SubmitUrl")]
    pub submit_url: String,
    /// May contain the placeholder `NAME`, replaced by the page URL.
    #[serde(alias = "ReportUrl")]
    pub report_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AhrefsConfig {
    /// IndexNow verification key; empty disables the key file.
    #[serde(alias = "IndexNow")]
    pub index_now: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Links are rendered for a web server rather than for browsing from disk.
    #[serde(alias = "IsRemoteTarget")]
    pub is_remote_target: bool,
    #[serde(alias = "OutputDir")]
    pub output_dir: PathBuf,
    #[serde(alias = "BaseUrl")]
    pub base_url: String,
    #[serde(alias = "StaticDir")]
    pub static_dir: PathBuf,
    /// Geocoder cache file; defaults to the user cache directory.
    #[serde(alias = "GeocoderCache")]
    pub geocoder_cache: Option<PathBuf>,
    /// Read sheets from `<dir>/<SHEET>.csv` instead of Google Sheets.
    #[serde(alias = "SheetsDir")]
    pub sheets_dir: Option<PathBuf>,
    #[serde(alias = "Google")]
    pub google: GoogleConfig,
    #[serde(alias = "AHrefs")]
    pub ahrefs: AhrefsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            is_remote_target: false,
            output_dir: PathBuf::from(".out"),
            base_url: DEFAULT_BASE_URL.to_string(),
            static_dir: PathBuf::from("static"),
            geocoder_cache: None,
            sheets_dir: None,
            google: GoogleConfig::default(),
            ahrefs: AhrefsConfig::default(),
        }
    }
}

impl Config {
    /// Load the configuration and resolve the output directory to an
    /// absolute path.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("reading {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, CoreError> {
        let mut config: Config = serde_json::from_str(contents)?;
        config.output_dir = std::path::absolute(&config.output_dir)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        if config.sheets_dir.is_none()
            && (config.google.api_key.is_empty() || config.google.sheet_id.is_empty())
        {
            return Err(CoreError::config(
                "either sheets_dir or google.api_key and google.sheet_id must be set",
            ));
        }
        Ok(config)
    }

    /// Location of the geocoder cache file.
    pub fn geocoder_cache_path(&self) -> Result<PathBuf, CoreError> {
        if let Some(path) = &self.geocoder_cache {
            return Ok(path.clone());
        }
        let base = dirs::cache_dir()
            .ok_or_else(|| CoreError::config("Could not determine cache directory"))?;
        Ok(base.join("socialrunclubs").join("geocoder.json"))
    }
}
