//! Sorted lists and the small derived selections shown on the index page.

use rand::Rng;
use rand::seq::SliceRandom;
use runclubs_core::{CityId, ClubId, Data, sanitize_name};

/// Size of the "latest clubs" sample.
pub const LATEST_CLUBS: usize = 5;

/// Length of the "top cities" ranking.
pub const TOP_CITIES: usize = 5;

/// Sort every list in `data` and compute the derived selections.
pub fn finalize_views<R: Rng + ?Sized>(data: &mut Data, rng: &mut R) {
    let mut cities: Vec<(String, CityId)> = data.all_cities().map(|(id, c)| (c.slug(), id)).collect();
    cities.sort();
    data.sorted_cities = cities.into_iter().map(|(_, id)| id).collect();
    for id in data.sorted_cities.clone() {
        data.sort_city_clubs_by(id, |club| club.slug());
    }

    let mut tags: Vec<_> = data.all_tags().map(|(id, t)| (t.slug(), id)).collect();
    tags.sort();
    data.sorted_tags = tags.into_iter().map(|(_, id)| id).collect();
    for id in data.sorted_tags.clone() {
        data.sort_tag_clubs_by(id, |club| (club.sanitized_name(), sanitize_name(&club.city_name)));
    }

    let mut clubs: Vec<ClubId> = data
        .sorted_cities
        .iter()
        .flat_map(|id| data.city(*id).clubs.iter().copied())
        .collect();
    clubs.sort_by_cached_key(|id| data.club_sort_key(*id));
    data.sorted_clubs = clubs;
    data.number_clubs = data.sorted_clubs.len();

    data.latest_clubs = select_latest_clubs(data, rng);
    data.top_cities = select_top_cities(data);
}

/// A random sample of the most recently added clubs.
///
/// Candidates are the clubs sharing the newest `added` date. When there are
/// fewer than [`LATEST_CLUBS`] of those, the newest clubs overall are used
/// instead. With fewer dated clubs than that, all of them are returned.
/// Clubs added on the same day rank in sheet order.
pub fn select_latest_clubs<R: Rng + ?Sized>(data: &Data, rng: &mut R) -> Vec<ClubId> {
    let mut added: Vec<ClubId> = data
        .all_clubs()
        .filter(|(_, club)| !club.added.is_empty())
        .map(|(id, _)| id)
        .collect();
    // stable
    added.sort_by(|a, b| data.club(*b).added.cmp(&data.club(*a).added));

    let Some(first) = added.first() else {
        return Vec::new();
    };
    let latest = data.club(*first).added.as_str();
    let mut candidates: Vec<ClubId> = added
        .iter()
        .copied()
        .filter(|id| data.club(*id).added == latest)
        .collect();
    if candidates.len() < LATEST_CLUBS {
        candidates = added.into_iter().take(LATEST_CLUBS).collect();
    }

    candidates.shuffle(rng);
    candidates.truncate(LATEST_CLUBS);
    candidates
}

/// Cities with at least one club, most clubs first, ties by name.
pub fn select_top_cities(data: &Data) -> Vec<CityId> {
    let mut top: Vec<CityId> = data
        .all_cities()
        .filter(|(_, c)| c.has_clubs())
        .map(|(id, _)| id)
        .collect();
    top.sort_by(|a, b| {
        let (a, b) = (data.city(*a), data.city(*b));
        b.clubs.len().cmp(&a.clubs.len()).then_with(|| a.name.cmp(&b.name))
    });
    top.truncate(TOP_CITIES);
    top
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use runclubs_core::{City, Club};

    fn add(data: &mut Data, city: &str, name: &str, added: &str) -> ClubId {
        let city = data.add_city(City::new(city, 0));
        let club = Club {
            name: name.to_string(),
            added: added.to_string(),
            ..Default::default()
        };
        data.add_club(club, city)
    }

    #[test]
    fn test_sorting() {
        let mut data = Data::new();
        add(&mut data, "Köln", "Zebra Runners", "");
        add(&mut data, "Aachen", "Zebra Runners", "");
        add(&mut data, "Köln", "Alpha", "");
        data.add_city(City::new("Bonn", 1));
        let tag = data.get_or_add_tag("night");
        let ids: Vec<ClubId> = data.all_clubs().map(|(id, _)| id).collect();
        for id in ids {
            data.tag_club(id, tag);
        }

        finalize_views(&mut data, &mut StdRng::seed_from_u64(7));

        let cities: Vec<_> = data.cities().map(|c| c.name.as_str()).collect();
        assert_eq!(cities, ["Aachen", "Bonn", "Köln"]);
        let koeln = data.city(data.find_city("Köln").unwrap());
        let names: Vec<_> = koeln.clubs.iter().map(|id| data.club(*id).name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Zebra Runners"]);

        let flat: Vec<_> = data.clubs().map(|c| c.slug()).collect();
        assert_eq!(flat, ["/koeln/alpha", "/aachen/zebra-runners", "/koeln/zebra-runners"]);
        let tagged: Vec<_> = data.tag(tag).clubs.iter().map(|id| data.club(*id).slug()).collect();
        assert_eq!(tagged, flat);
        assert_eq!(data.number_clubs, 3);
    }

    #[test]
    fn test_latest_clubs_from_newest_date() {
        let mut data = Data::new();
        let mut newest = HashSet::new();
        for i in 0..6 {
            newest.insert(add(&mut data, "Berlin", &format!("New {i}"), "2024-06-01"));
        }
        add(&mut data, "Berlin", "Old", "2023-01-01");
        add(&mut data, "Berlin", "Undated", "");

        let mut rng = StdRng::seed_from_u64(42);
        finalize_views(&mut data, &mut rng);
        assert_eq!(data.latest_clubs.len(), 5);
        assert!(data.latest_clubs.iter().all(|id| newest.contains(id)));
        let unique: HashSet<_> = data.latest_clubs.iter().collect();
        assert_eq!(unique.len(), 5);

        let other = select_latest_clubs(&data, &mut rng);
        assert_eq!(other.len(), 5);
        assert!(other.iter().all(|id| newest.contains(id)));
    }

    #[test]
    fn test_latest_clubs_fallback_to_newest_overall() {
        let mut data = Data::new();
        let a = add(&mut data, "Berlin", "A", "2024-06-01");
        let b = add(&mut data, "Berlin", "B", "2024-05-01");
        let c = add(&mut data, "Berlin", "C", "2024-04-01");
        let d = add(&mut data, "Berlin", "D", "2024-03-01");
        let e = add(&mut data, "Berlin", "E", "2024-02-01");
        add(&mut data, "Berlin", "F", "2024-01-01");

        finalize_views(&mut data, &mut StdRng::seed_from_u64(3));
        let got: HashSet<_> = data.latest_clubs.iter().copied().collect();
        assert_eq!(got, HashSet::from([a, b, c, d, e]));
    }

    #[test]
    fn test_latest_clubs_same_day_ties_keep_sheet_order() {
        let mut data = Data::new();
        let newest = add(&mut data, "Zwickau", "Newest", "2024-06-01");
        let mut early = vec![newest];
        for i in 0..4 {
            early.push(add(&mut data, "Zwickau", &format!("Z{i}"), "2024-05-01"));
        }
        add(&mut data, "Aachen", "A0", "2024-05-01");
        add(&mut data, "Aachen", "A1", "2024-05-01");

        finalize_views(&mut data, &mut StdRng::seed_from_u64(11));
        let got: HashSet<_> = data.latest_clubs.iter().copied().collect();
        assert_eq!(got, early.into_iter().collect::<HashSet<_>>());
    }

    #[test]
    fn test_latest_clubs_fewer_than_five() {
        let mut data = Data::new();
        add(&mut data, "Berlin", "A", "2024-06-01");
        add(&mut data, "Berlin", "B", "2024-05-01");
        add(&mut data, "Berlin", "C", "");

        finalize_views(&mut data, &mut StdRng::seed_from_u64(3));
        assert_eq!(data.latest_clubs.len(), 2);

        let empty = Data::new();
        assert!(select_latest_clubs(&empty, &mut StdRng::seed_from_u64(3)).is_empty());
    }

    #[test]
    fn test_top_cities() {
        let mut data = Data::new();
        for (city, n) in [("A", 1), ("B", 3), ("C", 2), ("D", 3), ("E", 1), ("F", 1)] {
            for i in 0..n {
                add(&mut data, city, &format!("club {i}"), "");
            }
        }
        data.add_city(City::new("G", 1));
        finalize_views(&mut data, &mut StdRng::seed_from_u64(0));
        let names: Vec<_> = data.top_cities.iter().map(|id| data.city(*id).name.as_str()).collect();
        assert_eq!(names, ["B", "D", "C", "A", "E"]);
    }
}
