use crate::templates::desktop_layout;
use maud::{html, Markup};

/// No feed rows resolved. Not an error: the restaurant may simply be new or
/// not yet inspected.
pub fn no_match_page(name: &str) -> Markup {
    desktop_layout(
        "No Match",
        html! {
            main class="container narrow" {
                h1 { "No Match" }
                p { "No inspection data was found for " strong { (name) } "." }
                p { a href="/" { "← Back to search" } }
            }
        },
    )
}
