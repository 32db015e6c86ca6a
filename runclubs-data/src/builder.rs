//! Sheet classification and the ingestion passes.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runclubs_core::Data;
use runclubs_sheets::Sheet;
use sha2::{Digest, Sha256};

use crate::error::BuildError;
use crate::ingest::{process_cities_sheet, process_clubs_sheet, process_tags_sheet};
use crate::views::finalize_views;

const CLUBS: &str = "CLUBS";
const CITIES: &str = "CITIES";
const TAGS: &str = "TAGS";

/// Sheets that belong to the form workflow and carry no site data.
const IGNORED_SHEETS: &[&str] = &["SUBMIT", "REPORT"];

fn is_ignored(name: &str) -> bool {
    IGNORED_SHEETS.contains(&name) || name.contains("IGNORE")
}

struct Classified {
    clubs: Sheet,
    cities: Sheet,
    tags: Sheet,
}

fn classify(sheets: Vec<Sheet>) -> Result<Classified, BuildError> {
    let mut by_name: HashMap<String, Sheet> = HashMap::new();
    for sheet in sheets {
        if is_ignored(&sheet.name) {
            log::debug!("ignoring sheet {:?}", sheet.name);
            continue;
        }
        if ![CLUBS, CITIES, TAGS].contains(&sheet.name.as_str()) {
            return Err(BuildError::UnknownSheet(sheet.name));
        }
        if by_name.contains_key(&sheet.name) {
            return Err(BuildError::DuplicateSheet(sheet.name));
        }
        by_name.insert(sheet.name.clone(), sheet);
    }

    let mut take = |name: &'static str| by_name.remove(name).ok_or(BuildError::MissingSheet(name));
    Ok(Classified {
        clubs: take(CLUBS)?,
        cities: take(CITIES)?,
        tags: take(TAGS)?,
    })
}

impl Classified {
    /// Seed for the "latest clubs" draw, derived from the data sheets only so
    /// that form responses in ignored sheets do not reshuffle the index page.
    fn content_seed(&self) -> u64 {
        let mut hasher = Sha256::new();
        for sheet in [&self.clubs, &self.cities, &self.tags] {
            hasher.update(sheet.name.as_bytes());
            hasher.update(b"\x1d");
            for row in &sheet.rows {
                for cell in row {
                    hasher.update(cell.as_bytes());
                    hasher.update(b"\x1f");
                }
                hasher.update(b"\x1e");
            }
        }
        let digest = hasher.finalize();
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(seed)
    }
}

/// Build the data model from the fetched sheets.
///
/// The random draws are seeded from the sheet contents, so identical input
/// always yields an identical model. See [`build_data_with_rng`].
pub fn build_data(sheets: Vec<Sheet>) -> Result<Data, BuildError> {
    let sheets = classify(sheets)?;
    let mut rng = StdRng::seed_from_u64(sheets.content_seed());
    build_classified(sheets, &mut rng)
}

/// Build the data model using the given random source.
///
/// Clubs are ingested first so that the cities sheet can tell which of its
/// cities already have clubs; tags come last and only decorate tags the
/// clubs introduced (or add empty ones). Coordinates and neighbour lists are
/// left for [`annotate_city_coordinates`](crate::annotate_city_coordinates)
/// and [`annotate_nearest_cities`](crate::annotate_nearest_cities).
pub fn build_data_with_rng<R: Rng + ?Sized>(
    sheets: Vec<Sheet>,
    rng: &mut R,
) -> Result<Data, BuildError> {
    build_classified(classify(sheets)?, rng)
}

fn build_classified<R: Rng + ?Sized>(sheets: Classified, rng: &mut R) -> Result<Data, BuildError> {
    let mut data = Data::new();

    process_clubs_sheet(&sheets.clubs, &mut data).map_err(|source| BuildError::Sheet {
        sheet: "clubs",
        source,
    })?;
    process_cities_sheet(&sheets.cities, &mut data).map_err(|source| BuildError::Sheet {
        sheet: "cities",
        source,
    })?;
    process_tags_sheet(&sheets.tags, &mut data).map_err(|source| BuildError::Sheet {
        sheet: "tags",
        source,
    })?;

    finalize_views(&mut data, rng);

    log::info!(
        "built data: {} cities, {} clubs, {} tags, {} redirects",
        data.city_count(),
        data.number_clubs,
        data.tag_count(),
        data.redirects.len()
    );
    Ok(data)
}
