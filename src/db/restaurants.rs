// db/restaurants.rs
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Mutex;
use tracing::{debug, warn};

use super::kv::KeyValueStore;
use super::StoreError;
use crate::domain::restaurant::{FavoriteRestaurant, RecentRestaurant};

pub const FAVORITES_KEY: &str = "RAT_APP_Favorites";
pub const RECENTS_KEY: &str = "RAT_APP_Recents";
pub const RECENTS_CAPACITY: usize = 5;

/// Favorites (a set keyed by camis) and recents (most-recent-first, capped)
/// over any keyed store. Every read-modify-write holds `write_lock`, so two
/// lookups finishing at once cannot drop each other's update.
pub struct RestaurantStore<K: KeyValueStore> {
    kv: K,
    write_lock: Mutex<()>,
}

impl<K: KeyValueStore> RestaurantStore<K> {
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    pub fn list_favorites(&self) -> Result<Vec<FavoriteRestaurant>, StoreError> {
        self.load(FAVORITES_KEY)
    }

    pub fn is_favorite(&self, camis: &str) -> Result<bool, StoreError> {
        Ok(self.list_favorites()?.iter().any(|f| f.camis == camis))
    }

    /// Add when absent, remove when present. Returns whether the restaurant
    /// is a favorite afterwards.
    pub fn toggle_favorite(&self, restaurant: FavoriteRestaurant) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut favorites: Vec<FavoriteRestaurant> = self.load(FAVORITES_KEY)?;
        let now_favorite = match favorites.iter().position(|f| f.camis == restaurant.camis) {
            Some(index) => {
                favorites.remove(index);
                false
            }
            None => {
                favorites.push(restaurant);
                true
            }
        };

        self.save(FAVORITES_KEY, &favorites)?;
        Ok(now_favorite)
    }

    /// Returns whether anything was removed.
    pub fn remove_favorite(&self, camis: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut favorites: Vec<FavoriteRestaurant> = self.load(FAVORITES_KEY)?;
        let before = favorites.len();
        favorites.retain(|f| f.camis != camis);
        if favorites.len() == before {
            return Ok(false);
        }

        self.save(FAVORITES_KEY, &favorites)?;
        Ok(true)
    }

    /// Most recent first.
    pub fn list_recents(&self) -> Result<Vec<RecentRestaurant>, StoreError> {
        let mut recents: Vec<RecentRestaurant> = self.load(RECENTS_KEY)?;
        recents.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
        Ok(recents)
    }

    /// Move-to-front insert; the list never grows past `RECENTS_CAPACITY`.
    pub fn record_view(&self, restaurant: FavoriteRestaurant, viewed_at: DateTime<Utc>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut recents: Vec<RecentRestaurant> = self.load(RECENTS_KEY)?;
        recents.retain(|r| r.restaurant.camis != restaurant.camis);
        recents.insert(
            0,
            RecentRestaurant {
                restaurant,
                viewed_at,
            },
        );
        recents.truncate(RECENTS_CAPACITY);

        debug!(count = recents.len(), "recent view recorded");
        self.save(RECENTS_KEY, &recents)
    }

    /// A value that no longer decodes reads as an empty list.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let Some(bytes) = self.kv.get(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice(&bytes) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(key, error = %e, "stored list is unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(items)?;
        self.kv.put(key, &bytes)
    }
}
