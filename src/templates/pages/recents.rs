use crate::domain::restaurant::RecentRestaurant;
use crate::templates::components::restaurant_row;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn recents_page(recents: &[RecentRestaurant]) -> Markup {
    desktop_layout(
        "Recents",
        html! {
            main class="container" {
                h1 { "Recently searched" }
                @if recents.is_empty() {
                    p class="muted" { "Nothing searched yet." }
                } @else {
                    ul class="restaurant-list" {
                        @for r in recents {
                            li {
                                (restaurant_row(&r.restaurant))
                                br;
                                small class="muted" { "Viewed " (r.viewed_at.format("%b %-d, %Y %H:%M").to_string()) }
                            }
                        }
                    }
                }
            }
        },
    )
}
