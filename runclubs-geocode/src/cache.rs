use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use runclubs_core::LatLon;

use crate::backend::GeocodeBackend;
use crate::error::GeocodeError;
use crate::rate_limit::RateLimiter;

/// Minimum spacing between two external lookups.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Resolve a city name to coordinates.
pub trait Geocoder {
    fn lookup(&mut self, city: &str) -> Result<LatLon, GeocodeError>;
}

/// Geocoder that answers from a JSON file (`{"Berlin": {"lat": .., "lon": ..}}`)
/// and falls back to a rate-limited backend, persisting every new result.
pub struct CachingGeocoder<B> {
    backend: B,
    cache_file: PathBuf,
    entries: BTreeMap<String, LatLon>,
    limiter: RateLimiter,
    misses: usize,
}

impl<B: GeocodeBackend> CachingGeocoder<B> {
    /// Open the cache file (a missing file is an empty cache).
    pub fn open(backend: B, cache_file: impl Into<PathBuf>) -> Result<Self, GeocodeError> {
        let cache_file = cache_file.into();
        let entries = load_cache(&cache_file)?;
        log::debug!(
            "geocoder: {} cached entries in {}",
            entries.len(),
            cache_file.display()
        );
        Ok(Self {
            backend,
            cache_file,
            entries,
            limiter: RateLimiter::new(MIN_REQUEST_INTERVAL),
            misses: 0,
        })
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.limiter = RateLimiter::new(interval);
        self
    }

    pub fn cached(&self, city: &str) -> Option<LatLon> {
        self.entries.get(city).copied()
    }

    /// Number of lookups that went to the backend.
    pub fn misses(&self) -> usize {
        self.misses
    }

    fn save(&self) -> Result<(), GeocodeError> {
        save_cache(&self.cache_file, &self.entries)
    }
}

impl<B: GeocodeBackend> Geocoder for CachingGeocoder<B> {
    fn lookup(&mut self, city: &str) -> Result<LatLon, GeocodeError> {
        if let Some(coords) = self.cached(city) {
            return Ok(coords);
        }

        log::info!("geocoder: looking up '{city}'");
        self.limiter.wait();
        self.misses += 1;
        let coords = self
            .backend
            .geocode(&format!("{city}, Germany"))?
            .ok_or_else(|| GeocodeError::NotFound(city.to_string()))?;

        self.entries.insert(city.to_string(), coords);
        self.save()?;
        Ok(coords)
    }
}

fn load_cache(path: &Path) -> Result<BTreeMap<String, LatLon>, GeocodeError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(serde_json::from_str(&contents)?)
}

/// Rewrite the whole cache through a temp file and rename so a crash never
/// leaves a truncated cache behind.
fn save_cache(path: &Path, entries: &BTreeMap<String, LatLon>) -> Result<(), GeocodeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(entries)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
