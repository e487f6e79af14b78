// src/tests/router_tests/favorites_tests.rs

use crate::db::SqliteKv;
use crate::fetch::fake::FakeFetch;
use crate::router::handle;
use crate::tests::utils::{app_with_store, body_string, get, init_test_db, location, test_app};

const TOGGLE: &str = "/favorites/toggle?camis=5&name=Taco%20Palace&grade=z&rating=4.5&address=1%20Main%20St&place_id=p5";

#[test]
fn toggle_adds_then_removes() {
    let app = test_app(FakeFetch::new());

    let resp = handle(get(TOGGLE), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/restaurant?camis=5&place_id=p5");

    let favorites = app.store.list_favorites().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name, "Taco Palace");
    assert_eq!(favorites[0].grade.as_deref(), Some("N/A"));
    assert_eq!(favorites[0].rating, Some(4.5));

    let page = body_string(handle(get("/favorites"), &app).unwrap());
    assert!(page.contains("Taco Palace"));
    assert!(page.contains("grade-gray"));

    handle(get(TOGGLE), &app).unwrap();
    assert!(app.store.list_favorites().unwrap().is_empty());
}

#[test]
fn toggle_requires_camis() {
    let app = test_app(FakeFetch::new());
    assert!(handle(get("/favorites/toggle?name=Taco"), &app).is_err());
}

#[test]
fn remove_redirects_to_list() {
    let app = test_app(FakeFetch::new());
    handle(get(TOGGLE), &app).unwrap();

    let resp = handle(get("/favorites/remove?camis=5"), &app).unwrap();

    assert_eq!(location(&resp), "/favorites");
    let page = body_string(handle(get("/favorites"), &app).unwrap());
    assert!(page.contains("No favorites yet."));
}

#[test]
fn favorites_persist_in_sqlite() {
    let (_dir, db) = init_test_db();
    let app = app_with_store(FakeFetch::new(), SqliteKv::new(db.clone()));
    handle(get(TOGGLE), &app).unwrap();

    let reopened = app_with_store(FakeFetch::new(), SqliteKv::new(db.clone()));
    let favorites = reopened.store.list_favorites().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].camis, "5");
    assert!(reopened.store.is_favorite("5").unwrap());
}
