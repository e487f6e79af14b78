// src/domain/restaurant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-curated restaurant. `camis` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRestaurant {
    pub name: String,
    pub grade: Option<String>,
    pub rating: Option<f64>,
    pub camis: String,
    pub address: String,
    pub place_id: Option<String>,
}

/// A recently searched restaurant and when it was last viewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentRestaurant {
    #[serde(flatten)]
    pub restaurant: FavoriteRestaurant,
    pub viewed_at: DateTime<Utc>,
}
