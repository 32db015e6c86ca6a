//! City coordinates and neighbour lists.

use runclubs_core::{CityId, Data, distance};
use runclubs_geocode::Geocoder;

use crate::error::BuildError;

/// Number of neighbours kept per list.
pub const NEAREST_CITIES: usize = 3;

/// Resolve coordinates for every city that has none yet.
///
/// Runs over the sorted city list, so [`finalize_views`](crate::finalize_views)
/// must have run. The first failed lookup aborts the whole pass.
pub fn annotate_city_coordinates<G: Geocoder + ?Sized>(
    data: &mut Data,
    geocoder: &mut G,
) -> Result<(), BuildError> {
    for id in data.sorted_cities.clone() {
        if data.city(id).coords.is_some() {
            continue;
        }
        let name = data.city(id).name.clone();
        let coords = geocoder
            .lookup(&name)
            .map_err(|source| BuildError::Geocode { city: name, source })?;
        data.city_mut(id).coords = Some(coords);
    }
    Ok(())
}

/// The `max` cities closest to `city`, nearest first.
///
/// Only located cities with clubs (or, with `with_clubs == false`, without
/// clubs) are candidates. Returns `None` when `city` itself has no
/// coordinates.
pub fn find_nearest_cities(
    data: &Data,
    city: CityId,
    max: usize,
    with_clubs: bool,
) -> Option<Vec<CityId>> {
    let origin = data.city(city).coords?;

    let mut candidates: Vec<(f64, CityId)> = data
        .all_cities()
        .filter(|(id, other)| *id != city && other.has_clubs() == with_clubs)
        .filter_map(|(id, other)| other.coords.map(|c| (distance(origin, c), id)))
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
    candidates.truncate(max);
    Some(candidates.into_iter().map(|(_, id)| id).collect())
}

/// Fill both neighbour lists of every city.
pub fn annotate_nearest_cities(data: &mut Data) {
    let ids: Vec<CityId> = data.all_cities().map(|(id, _)| id).collect();
    for id in ids {
        let with = find_nearest_cities(data, id, NEAREST_CITIES, true);
        let without = find_nearest_cities(data, id, NEAREST_CITIES, false);
        let city = data.city_mut(id);
        city.nearest_cities = with;
        city.nearest_cities_no_club = without;
    }
}

#[cfg(test)]
#[path = "tests/nearest_tests.rs"]
mod tests;
