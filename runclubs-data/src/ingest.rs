//! Row mapping for the three mandatory sheets.
//!
//! A malformed header aborts the sheet; a bad row is logged and skipped.

use std::collections::{HashMap, HashSet};

use runclubs_core::{City, Club, ClubStatus, Data, parse_lat_lon, sanitize_name};
use runclubs_sheets::{Columns, Sheet, SheetError, validate_columns};

pub const CLUB_COLUMNS: &[&str] = &[
    "ID",
    "ADDED",
    "UPDATED",
    "STATUS",
    "REDIRECT NAME",
    "REDIRECT CITY",
    "NAME",
    "OLD NAME",
    "CITY",
    "COORDS",
    "DESCRIPTION",
    "TAGS",
    "INSTAGRAM_URL",
    "STRAVA_URL",
    "WEBSITE_URL",
];

pub const CITY_COLUMNS: &[&str] = &["NAME"];

pub const TAG_COLUMNS: &[&str] = &["NAME", "FANCY", "DESCRIPTION"];

/// Top-level output directories that no city page may take over.
const RESERVED_CITY_SLUGS: &[&str] = &["tag", "static"];

fn header_columns(sheet: &Sheet, required: &[&str]) -> Result<Columns, SheetError> {
    let header = sheet
        .header()
        .ok_or_else(|| SheetError::schema("sheet is empty"))?;
    validate_columns(header, required)
}

/// Path of a club page built from raw sheet values.
fn club_path(city: &str, name: &str) -> String {
    format!("/{}/{}", sanitize_name(city), sanitize_name(name))
}

/// Name of another city whose page would land on the same path.
fn city_slug_owner<'a>(data: &'a Data, name: &str, slug: &str) -> Option<&'a str> {
    data.all_cities()
        .map(|(_, city)| city)
        .find(|city| city.name != name && city.sanitized_name() == slug)
        .map(|city| city.name.as_str())
}

/// Raw name of another tag whose page would land on the same path.
fn tag_slug_owner<'a>(data: &'a Data, raw_name: &str, slug: &str) -> Option<&'a str> {
    data.all_tags()
        .map(|(_, tag)| tag)
        .find(|tag| tag.raw_name != raw_name && sanitize_name(&tag.raw_name) == slug)
        .map(|tag| tag.raw_name.as_str())
}

/// Split a comma separated list, dropping empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn process_clubs_sheet(sheet: &Sheet, data: &mut Data) -> Result<(), SheetError> {
    let cols = header_columns(sheet, CLUB_COLUMNS)?;
    let mut club_paths: HashSet<String> = data.all_clubs().map(|(_, c)| c.slug()).collect();

    for (row_no, row) in sheet.records() {
        let name = cols.value(row, "NAME")?;
        let city_name = cols.value(row, "CITY")?;
        if name.is_empty() {
            log::warn!("CLUBS row {row_no}: empty club name");
            continue;
        }
        if city_name.is_empty() {
            log::warn!("CLUBS row {row_no}: empty city name for club {name:?}");
            continue;
        }
        let city_slug = sanitize_name(city_name);
        if city_slug.is_empty() || RESERVED_CITY_SLUGS.contains(&city_slug.as_str()) {
            log::warn!("CLUBS row {row_no}: city name {city_name:?} gives no usable path");
            continue;
        }
        if sanitize_name(name).is_empty() {
            log::warn!("CLUBS row {row_no}: club name {name:?} has no usable characters");
            continue;
        }
        if let Some(other) = city_slug_owner(data, city_name, &city_slug) {
            log::warn!("CLUBS row {row_no}: city {city_name:?} clashes with city {other:?}");
            continue;
        }

        let status = ClubStatus::from_raw(cols.value(row, "STATUS")?);
        if status.is_retired() {
            let redirect_name = cols.value(row, "REDIRECT NAME")?;
            let redirect_city = cols.value(row, "REDIRECT CITY")?;
            if !redirect_name.is_empty() && !redirect_city.is_empty() {
                data.redirect(
                    club_path(city_name, name),
                    club_path(redirect_city, redirect_name),
                );
            } else {
                log::debug!("CLUBS row {row_no}: retired club {name:?} without redirect target");
            }
            continue;
        }

        let path = club_path(city_name, name);
        if !club_paths.insert(path.clone()) {
            log::warn!("CLUBS row {row_no}: duplicate club {path}");
            continue;
        }

        let old_name = cols.value(row, "OLD NAME")?;
        if !old_name.is_empty() {
            data.redirect(club_path(city_name, old_name), path.clone());
        }

        let coords_raw = cols.value(row, "COORDS")?;
        let coords = if coords_raw.is_empty() {
            None
        } else {
            match parse_lat_lon(coords_raw) {
                Ok(ll) => Some(ll),
                Err(e) => {
                    log::warn!("CLUBS row {row_no}: invalid coords {coords_raw:?}: {e}");
                    None
                }
            }
        };

        let added = cols.value(row, "ADDED")?.to_string();
        let mut updated = cols.value(row, "UPDATED")?.to_string();
        if updated == added {
            updated.clear();
        }

        let club = Club {
            name: name.to_string(),
            description: cols.value(row, "DESCRIPTION")?.to_string(),
            coords,
            instagram: cols.value(row, "INSTAGRAM_URL")?.to_string(),
            strava: cols.value(row, "STRAVA_URL")?.to_string(),
            website: cols.value(row, "WEBSITE_URL")?.to_string(),
            added,
            updated,
            status,
            ..Default::default()
        };

        let city = data.add_city(City::new(city_name, 0));
        let club_id = data.add_club(club, city);

        for tag_name in split_list(cols.value(row, "TAGS")?) {
            let tag_slug = sanitize_name(&tag_name);
            if tag_slug.is_empty() {
                log::warn!("CLUBS row {row_no}: tag {tag_name:?} has no usable characters");
                continue;
            }
            if let Some(other) = tag_slug_owner(data, &tag_name, &tag_slug) {
                log::warn!("CLUBS row {row_no}: tag {tag_name:?} clashes with tag {other:?}");
                continue;
            }
            let tag = data.get_or_add_tag(&tag_name);
            data.tag_club(club_id, tag);
        }
    }

    Ok(())
}

pub fn process_cities_sheet(sheet: &Sheet, data: &mut Data) -> Result<(), SheetError> {
    let cols = header_columns(sheet, CITY_COLUMNS)?;

    let mut seen = HashSet::new();
    let mut slugs: HashMap<String, String> = data
        .all_cities()
        .map(|(_, c)| (c.sanitized_name(), c.name.clone()))
        .collect();
    let mut names = Vec::new();
    for (row_no, row) in sheet.records() {
        let name = cols.value(row, "NAME")?;
        if name.is_empty() {
            log::warn!("CITIES row {row_no}: empty city name");
            continue;
        }
        let slug = sanitize_name(name);
        if slug.is_empty() || RESERVED_CITY_SLUGS.contains(&slug.as_str()) {
            log::warn!("CITIES row {row_no}: city name {name:?} gives no usable path");
            continue;
        }
        if !seen.insert(name.to_string()) {
            log::warn!("CITIES row {row_no}: duplicate city name: {name:?}");
            continue;
        }
        match slugs.get(&slug) {
            Some(other) if other != name => {
                log::warn!("CITIES row {row_no}: city {name:?} clashes with city {other:?}");
            }
            Some(_) => names.push(name.to_string()),
            None => {
                slugs.insert(slug, name.to_string());
                names.push(name.to_string());
            }
        }
    }

    for (_, city) in data.all_cities() {
        if !seen.contains(&city.name) {
            log::warn!("CITIES: missing city from sheet: {:?}", city.name);
        }
    }

    let mut index_without_club = 1;
    for name in names {
        if data.find_city(&name).is_none() {
            data.add_city(City::new(name, index_without_club));
            index_without_club += 1;
        }
    }

    Ok(())
}

pub fn process_tags_sheet(sheet: &Sheet, data: &mut Data) -> Result<(), SheetError> {
    let cols = header_columns(sheet, TAG_COLUMNS)?;

    for (row_no, row) in sheet.records() {
        let name = cols.value(row, "NAME")?;
        if name.is_empty() {
            log::warn!("TAGS row {row_no}: empty tag name");
            continue;
        }
        let slug = sanitize_name(name);
        if slug.is_empty() {
            log::warn!("TAGS row {row_no}: tag name {name:?} has no usable characters");
            continue;
        }
        if let Some(other) = tag_slug_owner(data, name, &slug) {
            log::warn!("TAGS row {row_no}: tag {name:?} clashes with tag {other:?}");
            continue;
        }
        let fancy = cols.value(row, "FANCY")?;
        let description = cols.value(row, "DESCRIPTION")?;

        let id = data.get_or_add_tag(name);
        let tag = data.tag_mut(id);
        tag.name = if fancy.is_empty() { name } else { fancy }.to_string();
        if !description.is_empty() {
            tag.description = Some(description.to_string());
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/ingest_tests.rs"]
mod tests;
