use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// details response
//  └── result
//       ├── name
//       ├── formatted_address
//       ├── rating
//       ├── opening_hours
//       │    ├── open_now
//       │    └── weekday_text[]
//       ├── photos[]
//       │    ├── width / height
//       │    └── photo_reference
//       └── address_components[]
//            ├── long_name
//            └── types[]

/// A field that is missing, null or of the wrong type decodes as `None`
/// instead of failing the whole response.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailsResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailsResult {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) opening_hours: Option<OpeningHours>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) photos: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) address_components: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpeningHours {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) open_now: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) weekday_text: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Photo {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) width: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) height: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) photo_reference: Option<String>,
}

impl Photo {
    fn is_landscape(&self) -> bool {
        matches!((self.width, self.height), (Some(w), Some(h)) if w > h)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AddressComponent {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) long_name: Option<String>,
    #[serde(default)]
    pub(super) types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FindPlaceResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) candidates: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PlaceIdOnly {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub(super) results: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyResult {
    pub(super) name: String,
    pub(super) place_id: String,
    pub(super) geometry: Geometry,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub(super) vicinity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Geometry {
    pub(super) location: LatLng,
}

#[derive(Debug, Deserialize)]
pub(super) struct LatLng {
    pub(super) lat: f64,
    pub(super) lng: f64,
}

/// What the lookup pipeline needs from a place-details response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub open_now: Option<bool>,
    pub weekday_hours: Vec<String>,
    pub formatted_address: Option<String>,
    pub photo_reference: Option<String>,
    pub street_number: Option<String>,
    pub postal_code: Option<String>,
}

impl PlaceDetails {
    pub fn open_status(&self) -> &'static str {
        match self.open_now {
            Some(true) => "Open Now",
            Some(false) => "Closed",
            None => "Status Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPlace {
    pub name: String,
    pub place_id: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub address: Option<String>,
}

impl DetailsResult {
    pub(super) fn into_details(self) -> PlaceDetails {
        let photos: Vec<Photo> = self
            .photos
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| serde_json::from_value(p).ok())
            .collect();

        // First landscape photo, else the first one with a reference.
        let photo_reference = photos
            .iter()
            .find(|p| p.is_landscape() && p.photo_reference.is_some())
            .or_else(|| photos.iter().find(|p| p.photo_reference.is_some()))
            .and_then(|p| p.photo_reference.clone());

        let components: Vec<AddressComponent> = self
            .address_components
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| serde_json::from_value(c).ok())
            .collect();

        let component = |kind: &str| {
            components
                .iter()
                .find(|c| c.types.iter().any(|t| t == kind))
                .and_then(|c| c.long_name.clone())
        };

        let (open_now, weekday_hours) = match self.opening_hours {
            Some(h) => (h.open_now, h.weekday_text.unwrap_or_default()),
            None => (None, Vec::new()),
        };

        PlaceDetails {
            name: self.name,
            rating: self.rating,
            open_now,
            weekday_hours,
            formatted_address: self.formatted_address,
            photo_reference,
            street_number: component("street_number"),
            postal_code: component("postal_code"),
        }
    }
}

impl NearbyResult {
    pub(super) fn into_place(self) -> NearbyPlace {
        NearbyPlace {
            name: self.name,
            place_id: self.place_id,
            lat: self.geometry.location.lat,
            lng: self.geometry.location.lng,
            rating: self.rating,
            address: self.vicinity,
        }
    }
}
