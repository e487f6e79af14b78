use maud::{html, Markup};
use url::form_urlencoded::Serializer;

use crate::domain::restaurant::FavoriteRestaurant;
use crate::inspections::projector::{rating_label, star_count, DisplayGrade};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn grade_badge(grade: DisplayGrade) -> Markup {
    html! {
        span class=(format!("grade-badge {}", grade.color().css_class())) { (grade.as_str()) }
    }
}

/// Filled and empty stars plus the one-decimal label.
pub fn stars(rating: Option<f64>) -> Markup {
    let filled = star_count(rating) as usize;
    html! {
        span class="stars" title=(rating_label(rating)) {
            ("★".repeat(filled))
            ("☆".repeat(5 - filled))
            " " (rating_label(rating))
        }
    }
}

/// `path?k=v&...` with every value form-encoded.
pub fn href(path: &str, params: &[(&str, &str)]) -> String {
    let mut query = Serializer::new(String::new());
    for (k, v) in params {
        query.append_pair(k, v);
    }
    format!("{path}?{}", query.finish())
}

pub fn detail_href(camis: &str, place_id: Option<&str>) -> String {
    match place_id {
        Some(id) => href("/restaurant", &[("camis", camis), ("place_id", id)]),
        None => href("/restaurant", &[("camis", camis)]),
    }
}

pub fn toggle_favorite_href(r: &FavoriteRestaurant) -> String {
    let rating = r.rating.map(|v| v.to_string()).unwrap_or_default();
    href(
        "/favorites/toggle",
        &[
            ("camis", r.camis.as_str()),
            ("name", r.name.as_str()),
            ("grade", r.grade.as_deref().unwrap_or("")),
            ("rating", rating.as_str()),
            ("address", r.address.as_str()),
            ("place_id", r.place_id.as_deref().unwrap_or("")),
        ],
    )
}

pub fn favorite_toggle(r: &FavoriteRestaurant, is_favorite: bool) -> Markup {
    html! {
        a class="favorite-toggle" href=(toggle_favorite_href(r)) {
            @if is_favorite { "★ Remove from favorites" } @else { "☆ Add to favorites" }
        }
    }
}

/// Name, grade and address as one list row linking to the detail page.
pub fn restaurant_row(r: &FavoriteRestaurant) -> Markup {
    html! {
        a href=(detail_href(&r.camis, r.place_id.as_deref())) { strong { (r.name) } }
        " "
        (grade_badge(DisplayGrade::from_raw(r.grade.as_deref())))
        " "
        (stars(r.rating))
        br;
        small { (r.address) }
    }
}
