//! Coordinates: parsing free-form coordinate strings and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mean Earth radius used by [`distance`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    #[serde(alias = "Lat")]
    pub lat: f64,
    #[serde(alias = "Lon")]
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine distance between two points, in kilometers.
pub fn distance(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lon1 = a.lon.to_radians();
    let lat2 = b.lat.to_radians();
    let lon2 = b.lon.to_radians();

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt()) * EARTH_RADIUS_KM
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Hemisphere(char),
    Separator,
}

/// One half of a coordinate pair: up to three numbers (degrees, minutes,
/// seconds) and an optional hemisphere letter.
#[derive(Debug, Default)]
struct Component {
    numbers: Vec<f64>,
    hemisphere: Option<char>,
}

impl Component {
    fn value(&self, input: &str) -> Result<f64, CoreError> {
        let (deg, min, sec) = match self.numbers.as_slice() {
            [d] => (*d, 0.0, 0.0),
            [d, m] => (*d, *m, 0.0),
            [d, m, s] => (*d, *m, *s),
            _ => {
                return Err(CoreError::invalid_coordinates(format!(
                    "'{input}': expected degrees, minutes and seconds"
                )));
            }
        };
        if !(0.0..60.0).contains(&min) || !(0.0..60.0).contains(&sec) {
            return Err(CoreError::invalid_coordinates(format!(
                "'{input}': minutes/seconds out of range"
            )));
        }
        let magnitude = deg.abs() + min / 60.0 + sec / 3600.0;
        let negative = deg.is_sign_negative() ^ matches!(self.hemisphere, Some('S' | 'W'));
        Ok(if negative { -magnitude } else { magnitude })
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CoreError> {
    let upper = input.to_uppercase();
    let chars: Vec<char> = upper.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() || ((c == '-' || c == '+' || c == '.') && i + 1 < chars.len()) {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let value = text.parse::<f64>().map_err(|_| {
                CoreError::invalid_coordinates(format!("'{input}': bad number '{text}'"))
            })?;
            tokens.push(Token::Number(value));
            continue;
        }
        match c {
            'N' | 'S' | 'E' | 'W' => tokens.push(Token::Hemisphere(c)),
            ',' | ';' | '/' => tokens.push(Token::Separator),
            '°' | 'º' | '\'' | '"' | '′' | '″' | '’' | '”' => {}
            c if c.is_whitespace() => {}
            _ => {
                return Err(CoreError::invalid_coordinates(format!(
                    "'{input}': unexpected character '{c}'"
                )));
            }
        }
        i += 1;
    }
    Ok(tokens)
}

fn group(tokens: &[Token]) -> Vec<Component> {
    let mut groups = Vec::new();
    let mut current = Component::default();
    for token in tokens {
        match *token {
            Token::Number(n) => current.numbers.push(n),
            Token::Hemisphere(h) => {
                if current.hemisphere.is_some() {
                    // prefix form: "N 52.5 E 13.4"
                    groups.push(std::mem::take(&mut current));
                    current.hemisphere = Some(h);
                } else if current.numbers.is_empty() {
                    current.hemisphere = Some(h);
                } else {
                    current.hemisphere = Some(h);
                    groups.push(std::mem::take(&mut current));
                }
            }
            Token::Separator => {
                if !current.numbers.is_empty() || current.hemisphere.is_some() {
                    groups.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.numbers.is_empty() || current.hemisphere.is_some() {
        groups.push(current);
    }

    // "52.52 13.405": two bare numbers without any separator
    if groups.len() == 1 && groups[0].hemisphere.is_none() && groups[0].numbers.len() == 2 {
        let only = groups.remove(0);
        for n in only.numbers {
            groups.push(Component {
                numbers: vec![n],
                hemisphere: None,
            });
        }
    }
    groups
}

/// Parse a coordinate string into a [`LatLon`].
///
/// Accepted forms include decimal pairs (`"52.52, 13.405"`, `"52.52 13.405"`),
/// hemisphere letters before or after each value (`"52.52N 13.405E"`,
/// `"N 52.52 E 13.405"`), and degree/minute/second notation
/// (`52°31'12"N 13°24'18"E`). With hemisphere letters the pair may come in
/// either order; without them the latitude comes first.
pub fn parse_lat_lon(input: &str) -> Result<LatLon, CoreError> {
    let tokens = tokenize(input)?;
    let groups = group(&tokens);
    let [first, second] = groups.as_slice() else {
        return Err(CoreError::invalid_coordinates(format!(
            "'{input}': expected two components, found {}",
            groups.len()
        )));
    };

    let is_lon = |c: &Component| matches!(c.hemisphere, Some('E' | 'W'));
    let is_lat = |c: &Component| matches!(c.hemisphere, Some('N' | 'S'));
    let (lat_part, lon_part) = if is_lon(first) || is_lat(second) {
        (second, first)
    } else {
        (first, second)
    };
    if is_lon(lat_part) || is_lat(lon_part) {
        return Err(CoreError::invalid_coordinates(format!(
            "'{input}': conflicting hemispheres"
        )));
    }

    let lat = lat_part.value(input)?;
    let lon = lon_part.value(input)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(CoreError::invalid_coordinates(format!(
            "'{input}': out of range"
        )));
    }
    Ok(LatLon { lat, lon })
}

#[cfg(test)]
#[path = "tests/geo_tests.rs"]
mod tests;
