// templates/pages/home.rs

use crate::domain::restaurant::RecentRestaurant;
use crate::templates::{card, components::restaurant_row, desktop_layout};
use maud::{html, Markup};

pub fn home_page(recents: &[RecentRestaurant]) -> Markup {
    desktop_layout(
        "Search",
        html! {
            main class="container" {
                h1 { "Find a restaurant" }

                form action="/search" method="get" class="search-form" {
                    label class="sr-only" for="q" { "Restaurant name" }
                    input type="search" id="q" name="q" placeholder="Joe's Pizza" required;
                    button type="submit" class="primary" { "Search" }
                }

                @if !recents.is_empty() {
                    (card("Recently searched", html! {
                        ul {
                            @for r in recents {
                                li { (restaurant_row(&r.restaurant)) }
                            }
                        }
                    }))
                }

                form action="/nearby" method="get" class="nearby-form" {
                    input type="hidden" name="lat" value="40.7306";
                    input type="hidden" name="lng" value="-73.9866";
                    label for="miles" { "Radius (miles)" }
                    input type="range" id="miles" name="miles" min="0.25" max="5" step="0.25" value="1";
                    button type="submit" { "Show nearby" }
                }
            }
        },
    )
}
