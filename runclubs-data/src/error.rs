use runclubs_geocode::GeocodeError;
use runclubs_sheets::SheetError;

/// Fatal problems while assembling the data model.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("getting sheets: {0}")]
    Fetch(#[from] SheetError),

    #[error("processing {sheet} sheet: {source}")]
    Sheet {
        sheet: &'static str,
        #[source]
        source: SheetError,
    },

    #[error("missing {0} sheet")]
    MissingSheet(&'static str),

    #[error("duplicate sheet name: {0}")]
    DuplicateSheet(String),

    #[error("unknown sheet name: {0}")]
    UnknownSheet(String),

    #[error("getting coordinates for city \"{city}\": {source}")]
    Geocode {
        city: String,
        #[source]
        source: GeocodeError,
    },
}
