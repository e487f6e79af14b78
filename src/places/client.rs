// client.rs
use tracing::warn;
use url::Url;

use super::models::{
    DetailsResponse, FindPlaceResponse, NearbyPlace, NearbyResponse, NearbyResult, PlaceDetails,
    PlaceIdOnly,
};
use crate::config::PlacesConfig;
use crate::fetch::Fetch;
use crate::inspections::FeedError;

const DETAIL_FIELDS: &str = "name,formatted_address,rating,opening_hours,photos,address_components";
pub const PHOTO_MAX_WIDTH: u32 = 400;
pub const METERS_PER_MILE: f64 = 1609.34;
pub const MIN_RADIUS_MILES: f64 = 0.25;
pub const MAX_RADIUS_MILES: f64 = 5.0;

/// Map radius slider value in miles -> search radius in whole meters.
pub fn radius_meters(miles: f64) -> u32 {
    let miles = if miles.is_finite() { miles } else { MIN_RADIUS_MILES };
    (miles.clamp(MIN_RADIUS_MILES, MAX_RADIUS_MILES) * METERS_PER_MILE) as u32
}

pub struct PlacesClient<'a, F: Fetch> {
    fetcher: &'a F,
    cfg: &'a PlacesConfig,
}

impl<'a, F: Fetch> PlacesClient<'a, F> {
    pub fn new(fetcher: &'a F, cfg: &'a PlacesConfig) -> Self {
        Self { fetcher, cfg }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, FeedError> {
        let mut url = Url::parse(&format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), path))
            .map_err(|e| FeedError::Encoding(format!("bad places endpoint: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.cfg.api_key);
        }
        Ok(url)
    }

    pub fn find_place(&self, text: &str) -> Result<Option<String>, FeedError> {
        let url = self.endpoint(
            "findplacefromtext/json",
            &[("input", text), ("inputtype", "textquery"), ("fields", "place_id")],
        )?;
        let body = self.fetcher.fetch(&url)?;
        let decoded: FindPlaceResponse =
            serde_json::from_slice(&body).map_err(|e| FeedError::Decode(e.to_string()))?;

        Ok(decoded
            .candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| serde_json::from_value::<PlaceIdOnly>(c).ok())
            .find_map(|c| c.place_id))
    }

    pub fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, FeedError> {
        let url = self.endpoint(
            "details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        )?;
        let body = self.fetcher.fetch(&url)?;
        let decoded: DetailsResponse =
            serde_json::from_slice(&body).map_err(|e| FeedError::Decode(e.to_string()))?;

        Ok(decoded.result.map(|r| r.into_details()))
    }

    /// Restaurants around a point, in the order the directory returns them.
    pub fn nearby_restaurants(&self, lat: f64, lng: f64, radius_m: u32) -> Result<Vec<NearbyPlace>, FeedError> {
        let location = format!("{lat},{lng}");
        let radius = radius_m.to_string();
        let url = self.endpoint(
            "nearbysearch/json",
            &[("location", location.as_str()), ("radius", radius.as_str()), ("type", "restaurant")],
        )?;
        let body = self.fetcher.fetch(&url)?;
        let decoded: NearbyResponse =
            serde_json::from_slice(&body).map_err(|e| FeedError::Decode(e.to_string()))?;

        let results = decoded.results.unwrap_or_default();
        let total = results.len();
        let places: Vec<NearbyPlace> = results
            .into_iter()
            .filter_map(|r| serde_json::from_value::<NearbyResult>(r).ok())
            .map(NearbyResult::into_place)
            .collect();

        if places.len() < total {
            warn!(skipped = total - places.len(), "nearby results missing name, id or location");
        }
        Ok(places)
    }

    pub fn photo_url(&self, reference: &str) -> Result<Url, FeedError> {
        let width = PHOTO_MAX_WIDTH.to_string();
        self.endpoint("photo", &[("maxwidth", width.as_str()), ("photoreference", reference)])
    }
}
