// src/tests/router_tests/search_tests.rs

use crate::fetch::fake::FakeFetch;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::tests::utils::{body_string, get, location, test_app, CARMINE_ROWS, PLACE};

const CAMIS_2_ROWS: &str = r#"[
    {"camis": "2", "dba": "JOE PIZZA NYC", "building": "7", "street": "CARMINE ST", "zipcode": "10014",
     "grade": "A", "grade_date": "2024-06-01T00:00:00.000", "inspection_date": "2024-06-01T00:00:00.000",
     "score": "13", "critical_flag": "Critical", "violation_description": "Cold holding"},
    {"camis": "2", "dba": "JOE PIZZA NYC", "building": "7", "street": "CARMINE ST", "zipcode": "10014",
     "inspection_date": "2024-06-01T00:00:00.000", "score": "7", "violation_description": "Pests; Lighting."}
]"#;

fn carmine_fetch() -> FakeFetch {
    FakeFetch::new()
        .route("details/json", PLACE)
        .route("dba=JOE'S PIZZA", "[]")
        .route("building=7&$$app_token", CARMINE_ROWS)
}

#[test]
fn unknown_route_is_404() {
    let app = test_app(FakeFetch::new());
    let err = handle(get("/nope"), &app).unwrap_err();
    assert_eq!(error_to_response(err).status(), 404);
}

#[test]
fn search_without_query_is_bad_request() {
    let app = test_app(FakeFetch::new());
    let err = handle(get("/search"), &app).unwrap_err();
    let resp = error_to_response(err);
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("missing q or name"));
}

#[test]
fn search_renders_fallback_match_and_records_recent() {
    let app = test_app(carmine_fetch());

    let resp = handle(get("/search?name=Joe%27s%20Pizza&place_id=p1"), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Joe Pizza Nyc"));
    assert!(body.contains("grade-green"));
    assert!(body.contains("7 CARMINE ST, 10014"));
    assert!(body.contains("Closed"));
    assert!(body.contains("photoreference=wide"));
    assert!(body.contains("camis=2"));

    let recents = body_string(handle(get("/recents"), &app).unwrap());
    assert!(recents.contains("Joe Pizza Nyc"));
}

#[test]
fn search_with_unencodable_name_falls_back_to_building() {
    let app = test_app(carmine_fetch());

    let body = body_string(handle(get("/search?name=Joe%27s%01Pizza&place_id=p1"), &app).unwrap());

    assert!(body.contains("Joe Pizza Nyc"));
    assert!(app.fetcher.requested().iter().all(|r| !r.contains("dba=")));
}

#[test]
fn pages_reference_no_unserved_assets() {
    let app = test_app(FakeFetch::new());

    let body = body_string(handle(get("/"), &app).unwrap());

    assert!(body.contains("Rat Inspect"));
    assert!(!body.contains("/static/"));
}

#[test]
fn search_with_no_rows_shows_no_match() {
    let app = test_app(FakeFetch::new().route("details/json", PLACE));

    let body = body_string(handle(get("/search?name=Joe%27s%20Pizza&place_id=p1"), &app).unwrap());

    assert!(body.contains("No Match"));
    assert!(body.contains("Searched by: name_building, building_only"));
    assert!(app.store.list_recents().unwrap().is_empty());
}

#[test]
fn map_tap_redirects_to_detail_on_match() {
    let app = test_app(FakeFetch::new().route("dba=PIZZA HUT", CARMINE_ROWS));

    let resp = handle(get("/map?name=Pizza%20Hut"), &app).unwrap();

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/restaurant?camis=1");
    assert!(app.store.list_recents().unwrap().is_empty());
}

#[test]
fn map_tap_carries_place_id_to_detail() {
    let app = test_app(FakeFetch::new().route("dba=PIZZA HUT", CARMINE_ROWS));

    let resp = handle(get("/map?name=Pizza%20Hut&place_id=pX"), &app).unwrap();

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/restaurant?camis=1&place_id=pX");
}

#[test]
fn map_tap_without_shared_token_is_no_match() {
    let app = test_app(FakeFetch::new().route("dba=BURGER BARN", CARMINE_ROWS));

    let resp = handle(get("/map?name=Burger%20Barn"), &app).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("No Match"));
}

#[test]
fn restaurant_page_shows_hours_and_favorite_toggle() {
    let app = test_app(
        FakeFetch::new()
            .route("details/json", PLACE)
            .route("camis=2", CAMIS_2_ROWS),
    );

    let body = body_string(handle(get("/restaurant?camis=2&place_id=p1"), &app).unwrap());

    assert!(body.contains("Joe Pizza Nyc"));
    assert!(body.contains("Monday: 10AM-2AM"));
    assert!(body.contains("7 Carmine St, New York, NY 10014, USA"));
    assert!(body.contains("Add to favorites"));
    assert!(app.store.list_recents().unwrap().is_empty());
}

#[test]
fn inspections_page_groups_visits() {
    let app = test_app(FakeFetch::new().route("camis=2", CAMIS_2_ROWS));

    let body = body_string(handle(get("/inspections?camis=2"), &app).unwrap());

    assert!(body.contains("Jun 1, 2024"));
    // worst demerit of the visit is 13 -> 87
    assert!(body.contains("87"));
    assert!(body.contains("Cold holding"));
    assert!(body.contains("Pests"));
    assert!(body.contains("Lighting"));
}

#[test]
fn nearby_rejects_non_numeric_coordinates() {
    let app = test_app(FakeFetch::new());
    let err = handle(get("/nearby?lat=abc&lng=-74.0"), &app).unwrap_err();
    assert_eq!(error_to_response(err).status(), 400);
}

#[test]
fn nearby_lists_pins_linking_to_map_lookup() {
    let app = test_app(FakeFetch::new().route(
        "nearbysearch",
        r#"{"results": [{"name": "Joe's Pizza", "place_id": "pX", "geometry": {"location": {"lat": 40.73, "lng": -74.0}},
                         "rating": 4.5, "vicinity": "7 Carmine St, New York"}]}"#,
    ));

    let resp = handle(get("/nearby?lat=40.73&lng=-74.0&miles=1"), &app).unwrap();
    let body = body_string(resp);

    assert!(body.contains("/map?name=Joe"));
    assert!(body.contains("place_id=pX"));
    assert!(body.contains("7 Carmine St, New York"));
    assert!(body.contains("4.5"));
    assert!(!body.contains("40.73000"));
    assert!(app.fetcher.requested()[0].contains("radius=1609"));
}
