use std::time::Duration;

use runclubs_core::LatLon;
use serde::Deserialize;

use crate::error::GeocodeError;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// An external address -> coordinates service. `Ok(None)` means the service
/// answered but knows no such place.
pub trait GeocodeBackend {
    fn geocode(&self, address: &str) -> Result<Option<LatLon>, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// OpenStreetMap Nominatim search API.
pub struct Nominatim {
    http: reqwest::blocking::Client,
}

impl Nominatim {
    pub fn new() -> Result<Self, GeocodeError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(
                "socialrunclubs/",
                env!("CARGO_PKG_VERSION"),
                " (+https://socialrunclubs.de)"
            ))
            .build()?;
        Ok(Self { http })
    }
}

fn parse_places(text: &str) -> Result<Option<LatLon>, GeocodeError> {
    let places: Vec<Place> = serde_json::from_str(text)?;
    let Some(place) = places.first() else {
        return Ok(None);
    };
    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|e| GeocodeError::api(format!("bad latitude '{}': {e}", place.lat)))?;
    let lon = place
        .lon
        .parse::<f64>()
        .map_err(|e| GeocodeError::api(format!("bad longitude '{}': {e}", place.lon)))?;
    Ok(Some(LatLon::new(lat, lon)))
}

impl GeocodeBackend for Nominatim {
    fn geocode(&self, address: &str) -> Result<Option<LatLon>, GeocodeError> {
        let resp = self
            .http
            .get(NOMINATIM_URL)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::api("rate limited by Nominatim"));
        }
        let text = resp.text()?;
        if !status.is_success() {
            return Err(GeocodeError::api(format!("HTTP {status} for '{address}'")));
        }
        parse_places(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_places_first_hit() {
        let text = r#"[{"place_id": 1, "lat": "52.5170365", "lon": "13.3888599", "display_name": "Berlin"},
                       {"lat": "0", "lon": "0"}]"#;
        let ll = parse_places(text).unwrap().unwrap();
        assert_eq!(ll, LatLon::new(52.5170365, 13.3888599));
    }

    #[test]
    fn test_parse_places_empty() {
        assert!(parse_places("[]").unwrap().is_none());
    }

    #[test]
    fn test_parse_places_bad_number() {
        assert!(matches!(
            parse_places(r#"[{"lat": "north", "lon": "1"}]"#),
            Err(GeocodeError::Api(_))
        ));
    }
}
