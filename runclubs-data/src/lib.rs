//! Turns fetched sheets into the finished [`Data`](runclubs_core::Data) graph.
//!
//! Pipeline: [`build_data`] ingests the CLUBS, CITIES and TAGS sheets and
//! computes the sorted and derived views, [`annotate_city_coordinates`]
//! resolves city locations, and [`annotate_nearest_cities`] links every
//! located city to its neighbours.

pub mod builder;
pub mod error;
pub mod ingest;
pub mod nearest;
pub mod views;

pub use builder::{build_data, build_data_with_rng};
pub use error::BuildError;
pub use ingest::{process_cities_sheet, process_clubs_sheet, process_tags_sheet};
pub use nearest::{annotate_city_coordinates, annotate_nearest_cities, find_nearest_cities};
pub use views::{finalize_views, select_latest_clubs, select_top_cities};
