//! The city/club/tag graph.
//!
//! Cities, clubs and tags live in three owned arenas inside [`Data`] and refer
//! to each other through typed indices. A club's `city` and the city's `clubs`
//! list always agree; [`Data::add_club`] is the only way to create a club.

use std::collections::{BTreeMap, HashMap};

use crate::geo::LatLon;
use crate::slug::sanitize_name;

/// Maximum length (in characters) of generated meta descriptions.
const META_DESCRIPTION_MAX: usize = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClubId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub usize);

/// Lifecycle state of a club row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClubStatus {
    #[default]
    Active,
    /// The club no longer exists.
    Obsolete,
    /// The row duplicates another club.
    Duplicate,
}

impl ClubStatus {
    /// Interpret the raw STATUS cell. Anything unrecognized counts as active.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "obsolete" => Self::Obsolete,
            "duplicate" => Self::Duplicate,
            _ => Self::Active,
        }
    }

    /// Retired clubs get no page of their own.
    pub fn is_retired(self) -> bool {
        matches!(self, Self::Obsolete | Self::Duplicate)
    }
}

#[derive(Debug, Clone)]
pub struct City {
    pub name: String,
    pub clubs: Vec<ClubId>,
    pub coords: Option<LatLon>,
    /// Rank among the clubless cities of the cities sheet, starting at 1.
    /// Zero for cities that were created because a club referenced them.
    pub size_index_without_club: usize,
    pub nearest_cities: Option<Vec<CityId>>,
    pub nearest_cities_no_club: Option<Vec<CityId>>,
}

impl City {
    pub fn new(name: impl Into<String>, size_index_without_club: usize) -> Self {
        Self {
            name: name.into(),
            clubs: Vec::new(),
            coords: None,
            size_index_without_club,
            nearest_cities: None,
            nearest_cities_no_club: None,
        }
    }

    pub fn has_clubs(&self) -> bool {
        !self.clubs.is_empty()
    }

    /// Cities with clubs always get a page; of the clubless ones only the
    /// ten biggest do.
    pub fn show(&self) -> bool {
        self.size_index_without_club <= 10 || self.has_clubs()
    }

    pub fn sanitized_name(&self) -> String {
        sanitize_name(&self.name)
    }

    /// Site path of the city page, e.g. `/berlin`.
    pub fn slug(&self) -> String {
        format!("/{}", self.sanitized_name())
    }

    pub fn search(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn meta_description(&self, data: &Data) -> String {
        let mut desc = format!("Eine Übersicht über alle Social Run Clubs in {}. ", self.name);
        match self.clubs.as_slice() {
            [] => desc.push_str(
                "Aktuell gibt es leider keine Einträge für diese Stadt. Du kannst aber gerne einen neuen Club hinzufügen!",
            ),
            [only] => {
                desc.push_str("Aktuell gibt es einen Eintrag: ");
                desc.push_str(&data.club(*only).name);
            }
            clubs => {
                desc.push_str(&format!("Aktuell gibt es {} Einträge:", clubs.len()));
                for (i, id) in clubs.iter().enumerate() {
                    let name = &data.club(*id).name;
                    if desc.chars().count() + name.chars().count() + 2 >= META_DESCRIPTION_MAX {
                        desc.push('…');
                        break;
                    }
                    desc.push_str(if i == 0 { " " } else { ", " });
                    desc.push_str(name);
                }
            }
        }
        desc
    }
}

#[derive(Debug, Clone)]
pub struct Tag {
    /// Key as written in the club rows.
    pub raw_name: String,
    /// Display name; the tags sheet may override it.
    pub name: String,
    /// Trusted HTML from the tags sheet.
    pub description: Option<String>,
    pub clubs: Vec<ClubId>,
}

impl Tag {
    pub fn new(raw_name: impl Into<String>) -> Self {
        let raw_name = raw_name.into();
        Self {
            name: raw_name.clone(),
            raw_name,
            description: None,
            clubs: Vec::new(),
        }
    }

    pub fn slug(&self) -> String {
        format!("/tag/{}", sanitize_name(&self.raw_name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Club {
    pub name: String,
    /// Trusted HTML from the clubs sheet.
    pub description: String,
    pub tags: Vec<TagId>,
    pub city: Option<CityId>,
    /// City name exactly as written in the club row; always equals the name
    /// of the city behind `city`.
    pub city_name: String,
    pub coords: Option<LatLon>,
    pub instagram: String,
    pub strava: String,
    pub website: String,
    /// Opaque date strings, compared lexicographically.
    pub added: String,
    pub updated: String,
    pub status: ClubStatus,
}

impl Club {
    pub fn sanitized_name(&self) -> String {
        sanitize_name(&self.name)
    }

    /// Site path of the club page, e.g. `/berlin/midnight-runners`.
    pub fn slug(&self) -> String {
        format!("/{}/{}", sanitize_name(&self.city_name), self.sanitized_name())
    }

    pub fn search(&self) -> String {
        format!("{} {}", self.name, self.city_name).to_lowercase()
    }

    pub fn meta_description(&self) -> String {
        let mut desc = format!(
            "Informationen und Links zum Social Run Club '{}' in {}",
            self.name, self.city_name
        );
        if !self.description.is_empty() {
            desc.push_str(" - ");
            desc.push_str(&self.description.replace("<br>", "; "));
            if desc.chars().count() > META_DESCRIPTION_MAX {
                desc = desc.chars().take(META_DESCRIPTION_MAX - 2).collect();
                desc.push('…');
            }
        }
        desc
    }
}

/// The aggregate root of a site build.
#[derive(Debug, Clone, Default)]
pub struct Data {
    /// Human readable build timestamp shown in the page footer.
    pub last_update: String,
    cities: Vec<City>,
    clubs: Vec<Club>,
    tags: Vec<Tag>,
    city_index: HashMap<String, CityId>,
    tag_index: HashMap<String, TagId>,
    /// All cities ordered by slug.
    pub sorted_cities: Vec<CityId>,
    /// All tags ordered by slug.
    pub sorted_tags: Vec<TagId>,
    /// All clubs ordered by sanitized name, then city.
    pub sorted_clubs: Vec<ClubId>,
    pub latest_clubs: Vec<ClubId>,
    pub top_cities: Vec<CityId>,
    /// Retired path -> replacement path.
    pub redirects: BTreeMap<String, String>,
    pub number_clubs: usize,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(&self, id: CityId) -> &City {
        &self.cities[id.0]
    }

    pub fn city_mut(&mut self, id: CityId) -> &mut City {
        &mut self.cities[id.0]
    }

    pub fn club(&self, id: ClubId) -> &Club {
        &self.clubs[id.0]
    }

    pub fn tag(&self, id: TagId) -> &Tag {
        &self.tags[id.0]
    }

    pub fn tag_mut(&mut self, id: TagId) -> &mut Tag {
        &mut self.tags[id.0]
    }

    pub fn find_city(&self, name: &str) -> Option<CityId> {
        self.city_index.get(name).copied()
    }

    pub fn find_tag(&self, raw_name: &str) -> Option<TagId> {
        self.tag_index.get(raw_name).copied()
    }

    /// All cities in insertion order.
    pub fn all_cities(&self) -> impl Iterator<Item = (CityId, &City)> {
        self.cities.iter().enumerate().map(|(i, c)| (CityId(i), c))
    }

    pub fn all_clubs(&self) -> impl Iterator<Item = (ClubId, &Club)> {
        self.clubs.iter().enumerate().map(|(i, c)| (ClubId(i), c))
    }

    pub fn all_tags(&self) -> impl Iterator<Item = (TagId, &Tag)> {
        self.tags.iter().enumerate().map(|(i, t)| (TagId(i), t))
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn club_count(&self) -> usize {
        self.clubs.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Cities in slug order.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.sorted_cities.iter().map(|id| self.city(*id))
    }

    /// Clubs in name/city order.
    pub fn clubs(&self) -> impl Iterator<Item = &Club> {
        self.sorted_clubs.iter().map(|id| self.club(*id))
    }

    /// Tags in slug order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.sorted_tags.iter().map(|id| self.tag(*id))
    }

    /// Register a city. A city with the same name is returned unchanged.
    pub fn add_city(&mut self, city: City) -> CityId {
        if let Some(id) = self.city_index.get(&city.name) {
            return *id;
        }
        let id = CityId(self.cities.len());
        self.city_index.insert(city.name.clone(), id);
        self.cities.push(city);
        id
    }

    /// Register a club under an existing city, linking both directions.
    pub fn add_club(&mut self, mut club: Club, city: CityId) -> ClubId {
        let id = ClubId(self.clubs.len());
        club.city = Some(city);
        club.city_name = self.cities[city.0].name.clone();
        self.cities[city.0].clubs.push(id);
        self.clubs.push(club);
        id
    }

    pub fn get_or_add_tag(&mut self, raw_name: &str) -> TagId {
        if let Some(id) = self.tag_index.get(raw_name) {
            return *id;
        }
        let id = TagId(self.tags.len());
        self.tag_index.insert(raw_name.to_string(), id);
        self.tags.push(Tag::new(raw_name));
        id
    }

    /// Attach a tag to a club, linking both directions.
    pub fn tag_club(&mut self, club: ClubId, tag: TagId) {
        self.clubs[club.0].tags.push(tag);
        self.tags[tag.0].clubs.push(club);
    }

    pub fn redirect(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.redirects.insert(from.into(), to.into());
    }

    /// City owning the given club.
    pub fn club_city(&self, club: &Club) -> Option<&City> {
        club.city.map(|id| self.city(id))
    }

    /// Sort keys used for the flat club list and tag pages.
    pub fn club_sort_key(&self, id: ClubId) -> (String, String) {
        let club = self.club(id);
        (club.sanitized_name(), sanitize_name(&club.city_name))
    }

    /// Reorder a city's club list, keeping the back references intact.
    pub fn sort_city_clubs_by<K: Ord>(&mut self, city: CityId, mut key: impl FnMut(&Club) -> K) {
        let mut ids = std::mem::take(&mut self.cities[city.0].clubs);
        ids.sort_by_key(|id| key(&self.clubs[id.0]));
        self.cities[city.0].clubs = ids;
    }

    /// Reorder a tag's club list.
    pub fn sort_tag_clubs_by<K: Ord>(&mut self, tag: TagId, mut key: impl FnMut(&Club) -> K) {
        let mut ids = std::mem::take(&mut self.tags[tag.0].clubs);
        ids.sort_by_key(|id| key(&self.clubs[id.0]));
        self.tags[tag.0].clubs = ids;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn club(name: &str) -> Club {
        Club {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_club_links_city() {
        let mut data = Data::new();
        let berlin = data.add_city(City::new("Berlin", 0));
        let id = data.add_club(club("Midnight Runners"), berlin);

        assert_eq!(data.club(id).city, Some(berlin));
        assert_eq!(data.club(id).city_name, "Berlin");
        assert_eq!(data.city(berlin).clubs, vec![id]);
        assert_eq!(data.club(id).slug(), "/berlin/midnight-runners");
    }

    #[test]
    fn test_add_city_is_idempotent_by_name() {
        let mut data = Data::new();
        let a = data.add_city(City::new("Köln", 0));
        let b = data.add_city(City::new("Köln", 5));
        assert_eq!(a, b);
        assert_eq!(data.city_count(), 1);
        assert_eq!(data.city(a).size_index_without_club, 0);
        assert_eq!(data.city(a).slug(), "/koeln");
    }

    #[test]
    fn test_tags_deduplicated() {
        let mut data = Data::new();
        let a = data.get_or_add_tag("trail");
        let b = data.get_or_add_tag("trail");
        assert_eq!(a, b);
        assert_eq!(data.tag(a).name, "trail");
        assert_eq!(data.tag(a).slug(), "/tag/trail");
    }

    #[test]
    fn test_city_show() {
        let mut data = Data::new();
        let big = data.add_city(City::new("A", 3));
        let small = data.add_city(City::new("B", 11));
        let with_club = data.add_city(City::new("C", 0));
        data.add_club(club("X"), with_club);
        assert!(data.city(big).show());
        assert!(!data.city(small).show());
        assert!(data.city(with_club).show());
    }

    #[test]
    fn test_city_meta_description_truncates() {
        let mut data = Data::new();
        let city = data.add_city(City::new("Hamburg", 0));
        for i in 0..20 {
            data.add_club(club(&format!("Run Club Number {i}")), city);
        }
        let desc = data.city(city).meta_description(&data);
        assert!(desc.starts_with("Eine Übersicht über alle Social Run Clubs in Hamburg."));
        assert!(desc.contains("Aktuell gibt es 20 Einträge: Run Club Number 0"));
        assert!(desc.ends_with('…'));
        assert!(desc.chars().count() <= META_DESCRIPTION_MAX + 1);
    }

    #[test]
    fn test_city_meta_description_single_and_empty() {
        let mut data = Data::new();
        let empty = data.add_city(City::new("Ulm", 1));
        let single = data.add_city(City::new("Jena", 0));
        data.add_club(club("Jena Runners"), single);
        assert!(data.city(empty).meta_description(&data).contains("keine Einträge"));
        assert!(
            data.city(single)
                .meta_description(&data)
                .ends_with("Aktuell gibt es einen Eintrag: Jena Runners")
        );
    }

    #[test]
    fn test_club_meta_description_replaces_breaks_and_truncates() {
        let mut c = club("Lauftreff");
        c.city_name = "Bonn".to_string();
        c.description = "Jeden Montag.<br>Treffpunkt am Rhein.".to_string();
        assert_eq!(
            c.meta_description(),
            "Informationen und Links zum Social Run Club 'Lauftreff' in Bonn - Jeden Montag.; Treffpunkt am Rhein."
        );

        c.description = "x".repeat(300);
        let desc = c.meta_description();
        assert_eq!(desc.chars().count(), META_DESCRIPTION_MAX - 1);
        assert!(desc.ends_with('…'));
    }

    #[test]
    fn test_status_from_raw() {
        assert_eq!(ClubStatus::from_raw("obsolete"), ClubStatus::Obsolete);
        assert_eq!(ClubStatus::from_raw("duplicate"), ClubStatus::Duplicate);
        assert_eq!(ClubStatus::from_raw(""), ClubStatus::Active);
        assert_eq!(ClubStatus::from_raw("active"), ClubStatus::Active);
        assert!(ClubStatus::Duplicate.is_retired());
        assert!(!ClubStatus::Active.is_retired());
    }
}
