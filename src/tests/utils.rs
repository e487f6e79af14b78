use crate::config::{AppConfig, FeedConfig, PlacesConfig};
use crate::db::kv::memory::MemoryKv;
use crate::db::{init_db, Database, KeyValueStore, RestaurantStore};
use crate::fetch::fake::FakeFetch;
use crate::router::App;
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;
use tempfile::TempDir;

/// Initialize a fresh test DB using the production schema. The file lives
/// as long as the returned `TempDir`.
pub fn init_test_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rat_test.sqlite");
    let db = Database::new(path.to_string_lossy().to_string());

    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    (dir, db)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        feed: FeedConfig {
            endpoint: "https://feed.test/resource/rows.json".to_string(),
            app_token: "tok".to_string(),
        },
        places: PlacesConfig {
            base_url: "https://places.test/api".to_string(),
            api_key: "k".to_string(),
        },
        ..AppConfig::default()
    }
}

pub fn test_app(fake: FakeFetch) -> App<FakeFetch, MemoryKv> {
    app_with_store(fake, MemoryKv::default())
}

pub fn app_with_store<K: KeyValueStore>(fake: FakeFetch, kv: K) -> App<FakeFetch, K> {
    App::new(test_config(), fake, RestaurantStore::new(kv))
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("Location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

pub const PLACE: &str = r#"{"result": {
    "formatted_address": "7 Carmine St, New York, NY 10014, USA",
    "rating": 4.4,
    "opening_hours": {"open_now": false, "weekday_text": ["Monday: 10AM-2AM"]},
    "photos": [{"width": 1200, "height": 800, "photo_reference": "wide"}],
    "address_components": [
        {"long_name": "7", "types": ["street_number"]},
        {"long_name": "10014", "types": ["postal_code"]}
    ]
}}"#;

pub const CARMINE_ROWS: &str = r#"[
    {"camis": "1", "dba": "PIZZA HUT", "building": "7", "street": "CARMINE ST", "zipcode": "10014",
     "grade": "B", "grade_date": "2024-05-01T00:00:00.000", "inspection_date": "2024-05-01T00:00:00.000",
     "score": "20", "critical_flag": "Not Critical", "violation_description": "Dirty floors."},
    {"camis": "2", "dba": "JOE PIZZA NYC", "building": "7", "street": "CARMINE ST", "zipcode": "10014",
     "grade": "A", "grade_date": "2024-03-01T00:00:00.000", "inspection_date": "2024-03-01T00:00:00.000",
     "score": "9", "critical_flag": "Critical", "violation_description": "Cold holding; Pests."}
]"#;
