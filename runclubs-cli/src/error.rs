use runclubs_core::CoreError;
use runclubs_data::BuildError;
use runclubs_geocode::GeocodeError;
use runclubs_render::RenderError;
use runclubs_sheets::SheetError;
use thiserror::Error;

/// Errors that abort a site build.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Configuration could not be loaded
    #[error("loading config: {0}")]
    Config(#[from] CoreError),

    /// Sheet source could not be set up
    #[error("sheet source: {0}")]
    Source(#[from] SheetError),

    /// Sheets could not be turned into site data
    #[error("{0}")]
    Build(#[from] BuildError),

    /// Geocoder could not be set up
    #[error("geocoder: {0}")]
    Geocoder(#[from] GeocodeError),

    /// Output could not be written
    #[error("{0}")]
    Render(#[from] RenderError),
}
