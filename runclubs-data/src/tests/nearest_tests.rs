use std::collections::HashMap;

use super::*;
use runclubs_core::{City, Club, LatLon};
use runclubs_geocode::GeocodeError;

struct MapGeocoder {
    known: HashMap<&'static str, LatLon>,
    calls: Vec<String>,
}

impl Geocoder for MapGeocoder {
    fn lookup(&mut self, city: &str) -> Result<LatLon, GeocodeError> {
        self.calls.push(city.to_string());
        self.known
            .get(city)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(city.to_string()))
    }
}

fn city(data: &mut Data, name: &str, lat: f64, lon: f64, clubs: usize) -> CityId {
    let id = data.add_city(City::new(name, 1));
    data.city_mut(id).coords = Some(LatLon::new(lat, lon));
    for i in 0..clubs {
        let club = Club {
            name: format!("{name} {i}"),
            ..Default::default()
        };
        data.add_club(club, id);
    }
    id
}

fn sample() -> (Data, [CityId; 6]) {
    let mut data = Data::new();
    let berlin = city(&mut data, "Berlin", 52.52, 13.405, 2);
    let potsdam = city(&mut data, "Potsdam", 52.39, 13.06, 1);
    let leipzig = city(&mut data, "Leipzig", 51.34, 12.37, 1);
    let hamburg = city(&mut data, "Hamburg", 53.55, 9.99, 1);
    let munich = city(&mut data, "München", 48.14, 11.58, 1);
    let cottbus = city(&mut data, "Cottbus", 51.76, 14.33, 0);
    (data, [berlin, potsdam, leipzig, hamburg, munich, cottbus])
}

#[test]
fn test_nearest_with_clubs_sorted_by_distance() {
    let (data, [berlin, potsdam, leipzig, hamburg, _, cottbus]) = sample();
    let near = find_nearest_cities(&data, berlin, 3, true).unwrap();
    assert_eq!(near, vec![potsdam, leipzig, hamburg]);
    assert!(!near.contains(&berlin));
    assert!(!near.contains(&cottbus));
}

#[test]
fn test_nearest_without_clubs_returns_fewer() {
    let (data, [berlin, .., cottbus]) = sample();
    assert_eq!(find_nearest_cities(&data, berlin, 3, false).unwrap(), vec![cottbus]);
    assert!(find_nearest_cities(&data, cottbus, 3, false).unwrap().is_empty());
}

#[test]
fn test_unlocated_city_has_no_lists() {
    let (mut data, [berlin, ..]) = sample();
    let nowhere = data.add_city(City::new("Nirgendwo", 1));
    annotate_nearest_cities(&mut data);

    assert!(data.city(nowhere).nearest_cities.is_none());
    assert!(data.city(nowhere).nearest_cities_no_club.is_none());
    let lists = data.city(berlin).nearest_cities.as_ref().unwrap();
    assert_eq!(lists.len(), NEAREST_CITIES);
    assert!(!lists.contains(&nowhere));
}

#[test]
fn test_annotate_coordinates_skips_located_cities() {
    let mut data = Data::new();
    let berlin = city(&mut data, "Berlin", 52.52, 13.405, 1);
    let jena = data.add_city(City::new("Jena", 1));
    data.sorted_cities = vec![berlin, jena];

    let mut geocoder = MapGeocoder {
        known: HashMap::from([("Jena", LatLon::new(50.93, 11.59))]),
        calls: Vec::new(),
    };
    annotate_city_coordinates(&mut data, &mut geocoder).unwrap();

    assert_eq!(geocoder.calls, vec!["Jena"]);
    assert_eq!(data.city(jena).coords, Some(LatLon::new(50.93, 11.59)));
}

#[test]
fn test_annotate_coordinates_failure_is_fatal() {
    let mut data = Data::new();
    let a = data.add_city(City::new("Atlantis", 1));
    let b = data.add_city(City::new("Jena", 1));
    data.sorted_cities = vec![a, b];

    let mut geocoder = MapGeocoder {
        known: HashMap::from([("Jena", LatLon::new(50.93, 11.59))]),
        calls: Vec::new(),
    };
    let err = annotate_city_coordinates(&mut data, &mut geocoder).unwrap_err();
    assert!(matches!(err, BuildError::Geocode { ref city, .. } if city == "Atlantis"));
    assert_eq!(geocoder.calls.len(), 1);
    assert!(data.city(b).coords.is_none());
}
