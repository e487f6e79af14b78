pub mod client;
pub mod models;

pub use client::{radius_meters, PlacesClient};
pub use models::{NearbyPlace, PlaceDetails};
