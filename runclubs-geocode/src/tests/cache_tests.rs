use std::cell::RefCell;

use super::*;

/// Backend answering from a fixed table and recording every query.
struct FakeBackend {
    known: Vec<(&'static str, LatLon)>,
    queries: RefCell<Vec<String>>,
}

impl FakeBackend {
    fn new(known: Vec<(&'static str, LatLon)>) -> Self {
        Self {
            known,
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl GeocodeBackend for &FakeBackend {
    fn geocode(&self, address: &str) -> Result<Option<LatLon>, GeocodeError> {
        self.queries.borrow_mut().push(address.to_string());
        Ok(self
            .known
            .iter()
            .find(|(name, _)| *name == address)
            .map(|(_, ll)| *ll))
    }
}

#[test]
fn test_miss_queries_backend_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("geocoder.json");
    let backend = FakeBackend::new(vec![("Berlin, Germany", LatLon::new(52.52, 13.405))]);

    let mut geocoder = CachingGeocoder::open(&backend, &path)
        .unwrap()
        .with_interval(Duration::ZERO);
    let coords = geocoder.lookup("Berlin").unwrap();

    assert_eq!(coords, LatLon::new(52.52, 13.405));
    assert_eq!(*backend.queries.borrow(), vec!["Berlin, Germany"]);
    assert_eq!(geocoder.misses(), 1);

    let saved: BTreeMap<String, LatLon> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.get("Berlin"), Some(&LatLon::new(52.52, 13.405)));
}

#[test]
fn test_hit_skips_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geocoder.json");
    fs::write(&path, r#"{"Hamburg": {"lat": 53.55, "lon": 9.99}}"#).unwrap();
    let backend = FakeBackend::new(vec![]);

    let mut geocoder = CachingGeocoder::open(&backend, &path).unwrap();
    assert_eq!(geocoder.lookup("Hamburg").unwrap(), LatLon::new(53.55, 9.99));
    assert!(backend.queries.borrow().is_empty());
    assert_eq!(geocoder.misses(), 0);
}

#[test]
fn test_legacy_cache_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geocoder.json");
    fs::write(&path, r#"{"Köln": {"Lat": 50.94, "Lon": 6.96}}"#).unwrap();
    let backend = FakeBackend::new(vec![]);

    let geocoder = CachingGeocoder::open(&backend, &path).unwrap();
    assert_eq!(geocoder.cached("Köln"), Some(LatLon::new(50.94, 6.96)));
}

#[test]
fn test_unknown_city_is_error_and_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geocoder.json");
    let backend = FakeBackend::new(vec![]);

    let mut geocoder = CachingGeocoder::open(&backend, &path)
        .unwrap()
        .with_interval(Duration::ZERO);
    let err = geocoder.lookup("Atlantis").unwrap_err();
    assert!(matches!(err, GeocodeError::NotFound(ref name) if name == "Atlantis"));
    assert!(geocoder.cached("Atlantis").is_none());
    assert!(!path.exists());
}

#[test]
fn test_corrupt_cache_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geocoder.json");
    fs::write(&path, "not json").unwrap();
    let backend = FakeBackend::new(vec![]);
    assert!(matches!(
        CachingGeocoder::open(&backend, &path),
        Err(GeocodeError::Json(_))
    ));
}

#[test]
fn test_existing_entries_survive_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geocoder.json");
    fs::write(&path, r#"{"Hamburg": {"lat": 53.55, "lon": 9.99}}"#).unwrap();
    let backend = FakeBackend::new(vec![("Bremen, Germany", LatLon::new(53.08, 8.8))]);

    let mut geocoder = CachingGeocoder::open(&backend, &path)
        .unwrap()
        .with_interval(Duration::ZERO);
    geocoder.lookup("Bremen").unwrap();

    let saved: BTreeMap<String, LatLon> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.len(), 2);
    assert!(saved.contains_key("Hamburg"));
}
