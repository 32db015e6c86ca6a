//! City name -> coordinates resolution backed by a local JSON cache.

pub mod backend;
pub mod cache;
pub mod error;
pub mod rate_limit;

pub use backend::{GeocodeBackend, Nominatim};
pub use cache::{CachingGeocoder, Geocoder};
pub use error::GeocodeError;
pub use rate_limit::RateLimiter;
