//! Domain types shared by every stage of the site build: names and slugs,
//! coordinates, the city/club/tag model and the run configuration.

pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod slug;

pub use config::{AhrefsConfig, Config, GoogleConfig};
pub use error::CoreError;
pub use geo::{LatLon, distance, parse_lat_lon};
pub use model::{City, CityId, Club, ClubId, ClubStatus, Data, Tag, TagId};
pub use slug::sanitize_name;
