use crate::places::NearbyPlace;
use crate::templates::components::{href, stars};
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Map pins as a list; each links to the map-tap lookup.
pub fn nearby_page(places: &[NearbyPlace], miles: f64) -> Markup {
    desktop_layout(
        "Nearby",
        html! {
            main class="container" {
                h1 { "Restaurants within " (format!("{miles:.2}")) " mi" }
                @if places.is_empty() {
                    p class="muted" { "Nothing found nearby." }
                } @else {
                    ul class="restaurant-list" {
                        @for p in places {
                            li {
                                a href=(href("/map", &[("name", p.name.as_str()), ("place_id", p.place_id.as_str())])) { (p.name) }
                                @if p.rating.is_some() {
                                    " " (stars(p.rating))
                                }
                                @if let Some(address) = &p.address {
                                    br;
                                    small class="muted" { (address) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
