//! socialrunclubs CLI
//!
//! Builds the Social Run Clubs site from the club spreadsheet.

mod error;
mod spinner;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use runclubs_core::Config;
use runclubs_data::{
    BuildError, annotate_city_coordinates, annotate_nearest_cities, build_data,
};
use runclubs_geocode::{CachingGeocoder, Nominatim};
use runclubs_render::{BuiltinTemplates, SiteContext, copy_static_assets, render_site};
use runclubs_sheets::{CsvDirectory, GoogleSheets, SheetSource, retry};

use crate::error::CliError;
use crate::spinner::Phase;

/// Attempts for the spreadsheet download.
const FETCH_ATTEMPTS: u32 = 3;
/// Delay before the first retry; doubles afterwards.
const FETCH_RETRY_DELAY: Duration = Duration::from_secs(8);

const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(name = "socialrunclubs")]
#[command(about = "Generate the Social Run Clubs site", long_about = None)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

fn sheet_source(config: &Config) -> Result<Box<dyn SheetSource>, CliError> {
    Ok(match &config.sheets_dir {
        Some(dir) => Box::new(CsvDirectory::new(dir)),
        None => Box::new(GoogleSheets::new(
            &config.google.api_key,
            &config.google.sheet_id,
        )?),
    })
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = Config::load(&cli.config)?;
    log::info!("output directory: {}", config.output_dir.display());

    let source = sheet_source(&config)?;
    let phase = Phase::start("Fetching sheets");
    let sheets = phase.finish(
        retry(FETCH_ATTEMPTS, FETCH_RETRY_DELAY, || source.fetch_sheets()).map_err(BuildError::Fetch),
        |s| format!("{} sheets from {}", s.len(), source.name()),
    )?;

    let phase = Phase::start("Building data");
    let mut data = phase.finish(build_data(sheets), |d| {
        format!("{} clubs in {} cities", d.number_clubs, d.city_count())
    })?;
    data.last_update = chrono::Local::now().format(LAST_UPDATE_FORMAT).to_string();

    let mut geocoder = CachingGeocoder::open(Nominatim::new()?, config.geocoder_cache_path()?)?;
    let phase = Phase::start("Geocoding cities");
    phase.finish(annotate_city_coordinates(&mut data, &mut geocoder), |_| {
        format!("{} lookups", geocoder.misses())
    })?;
    annotate_nearest_cities(&mut data);

    let phase = Phase::start("Rendering site");
    let summary = phase.finish(
        copy_static_assets(&config.static_dir, &config.output_dir).and_then(|assets| {
            let site = SiteContext::new(&config, &assets);
            render_site(&data, &site, &BuiltinTemplates::new())
        }),
        |s| format!("{} pages", s.pages),
    )?;

    eprintln!(
        "{} {} pages in {}",
        "Done:".if_supports_color(Stderr, |t| t.bold()),
        summary.pages,
        config
            .output_dir
            .display()
            .if_supports_color(Stderr, |t| t.cyan()),
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
