pub mod connection;
pub mod kv;
pub mod restaurants;
pub mod store_error;

pub use connection::{init_db, Database};
pub use kv::{KeyValueStore, SqliteKv};
pub use restaurants::RestaurantStore;
pub use store_error::StoreError;
