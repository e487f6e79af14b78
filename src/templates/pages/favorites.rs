use crate::domain::restaurant::FavoriteRestaurant;
use crate::templates::components::{href, restaurant_row};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn favorites_page(favorites: &[FavoriteRestaurant]) -> Markup {
    desktop_layout(
        "Favorites",
        html! {
            main class="container" {
                h1 { "Favorites" }
                @if favorites.is_empty() {
                    p class="muted" { "No favorites yet." }
                } @else {
                    ul class="restaurant-list" {
                        @for f in favorites {
                            li {
                                (restaurant_row(f))
                                " "
                                a class="remove" href=(href("/favorites/remove", &[("camis", f.camis.as_str())])) { "Remove" }
                            }
                        }
                    }
                }
            }
        },
    )
}
