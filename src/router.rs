use crate::config::AppConfig;
use crate::db::{KeyValueStore, RestaurantStore};
use crate::domain::restaurant::FavoriteRestaurant;
use crate::errors::ServerError;
use crate::fetch::Fetch;
use crate::inspections::projector::DisplayGrade;
use crate::lookup::LookupService;
use crate::places::client::{MAX_RADIUS_MILES, MIN_RADIUS_MILES};
use crate::responses::{html_response, redirect, ResultResp};
use crate::templates::components::detail_href;
use crate::templates::pages::{self, RestaurantVm, SearchVm};
use astra::Request;
use std::collections::HashMap;
use tracing::debug;

/// Everything a request handler needs, shared across astra's worker threads.
pub struct App<F: Fetch, K: KeyValueStore> {
    pub config: AppConfig,
    pub fetcher: F,
    pub store: RestaurantStore<K>,
}

impl<F: Fetch, K: KeyValueStore> App<F, K> {
    pub fn new(config: AppConfig, fetcher: F, store: RestaurantStore<K>) -> Self {
        Self {
            config,
            fetcher,
            store,
        }
    }

    pub fn lookup(&self) -> LookupService<'_, F, K> {
        LookupService::new(&self.fetcher, &self.config.feed, &self.config.places, &self.store)
    }
}

pub fn handle<F: Fetch, K: KeyValueStore>(req: Request, app: &App<F, K>) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();
    let params = parse_query(&req);
    debug!(method, path, "request");

    match (method, path) {
        ("GET", "/") => html_response(pages::home_page(&app.store.list_recents()?)),
        ("GET", "/search") => search(&params, app),
        ("GET", "/map") => map_tap(&params, app),
        ("GET", "/nearby") => nearby(&params, app),
        ("GET", "/restaurant") => restaurant(&params, app),
        ("GET", "/inspections") => inspections(&params, app),
        ("GET", "/favorites") => html_response(pages::favorites_page(&app.store.list_favorites()?)),
        ("GET", "/favorites/toggle") => toggle_favorite(&params, app),
        ("GET", "/favorites/remove") => {
            let camis = required(&params, "camis")?;
            app.store.remove_favorite(camis)?;
            redirect("/favorites")
        }
        ("GET", "/recents") => html_response(pages::recents_page(&app.store.list_recents()?)),
        _ => Err(ServerError::NotFound),
    }
}

/// `?name=&place_id=` when the caller already picked a place, `?q=` for free text.
fn search<F: Fetch, K: KeyValueStore>(params: &HashMap<String, String>, app: &App<F, K>) -> ResultResp {
    let (query, outcome) = match (optional(params, "name"), optional(params, "q")) {
        (Some(name), _) => (name, app.lookup().search(name, optional(params, "place_id"))),
        (None, Some(q)) => (q, app.lookup().search_text(q)),
        (None, None) => return Err(ServerError::BadRequest("missing q or name".to_string())),
    };

    let is_favorite = match outcome.resolution.as_ref().and_then(|r| r.camis.as_deref()) {
        Some(camis) => app.store.is_favorite(camis)?,
        None => false,
    };

    html_response(pages::search_page(&SearchVm {
        query,
        outcome: &outcome,
        is_favorite,
    }))
}

/// `?name=&place_id=`; the place id rides along so the detail page can show
/// directory data.
fn map_tap<F: Fetch, K: KeyValueStore>(params: &HashMap<String, String>, app: &App<F, K>) -> ResultResp {
    let name = required(params, "name")?;
    let place_id = optional(params, "place_id");

    match app.lookup().map_lookup(name).and_then(|found| found.camis) {
        Some(camis) => redirect(&detail_href(&camis, place_id)),
        None => html_response(pages::no_match_page(name)),
    }
}

/// `?lat=&lng=&miles=`; miles is clamped to the slider range.
fn nearby<F: Fetch, K: KeyValueStore>(params: &HashMap<String, String>, app: &App<F, K>) -> ResultResp {
    let lat = number(params, "lat")?;
    let lng = number(params, "lng")?;
    let miles = optional(params, "miles")
        .and_then(|m| m.parse::<f64>().ok())
        .unwrap_or(MIN_RADIUS_MILES)
        .clamp(MIN_RADIUS_MILES, MAX_RADIUS_MILES);

    let places = app.lookup().nearby(lat, lng, miles);
    html_response(pages::nearby_page(&places, miles))
}

fn restaurant<F: Fetch, K: KeyValueStore>(params: &HashMap<String, String>, app: &App<F, K>) -> ResultResp {
    let camis = required(params, "camis")?;
    let place_id = optional(params, "place_id");

    let detail = app.lookup().detail(camis, place_id);
    let is_favorite = app.store.is_favorite(camis)?;

    html_response(pages::restaurant_page(&RestaurantVm {
        detail: &detail,
        place_id,
        is_favorite,
    }))
}

fn inspections<F: Fetch, K: KeyValueStore>(params: &HashMap<String, String>, app: &App<F, K>) -> ResultResp {
    let camis = required(params, "camis")?;

    match app.lookup().detail(camis, None).view {
        Some(view) => html_response(pages::inspections_page(&view)),
        None => html_response(pages::no_match_page(camis)),
    }
}

fn toggle_favorite<F: Fetch, K: KeyValueStore>(params: &HashMap<String, String>, app: &App<F, K>) -> ResultResp {
    let camis = required(params, "camis")?;
    let place_id = optional(params, "place_id");

    let restaurant = FavoriteRestaurant {
        name: optional(params, "name").unwrap_or(camis).to_string(),
        grade: Some(DisplayGrade::from_raw(optional(params, "grade")).as_str().to_string()),
        rating: optional(params, "rating").and_then(|r| r.parse::<f64>().ok()),
        camis: camis.to_string(),
        address: optional(params, "address").unwrap_or_default().to_string(),
        place_id: place_id.map(str::to_string),
    };

    let now_favorite = app.store.toggle_favorite(restaurant)?;
    debug!(camis, now_favorite, "favorite toggled");

    redirect(&detail_href(camis, place_id))
}

/// Decoded query parameters; the last occurrence of a key wins.
fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn optional<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn number(params: &HashMap<String, String>, key: &str) -> Result<f64, ServerError> {
    required(params, key)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ServerError::BadRequest(format!("{key} is not a number")))
}

fn required<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<&'a str, ServerError> {
    optional(params, key).ok_or_else(|| ServerError::BadRequest(format!("missing {key}")))
}
