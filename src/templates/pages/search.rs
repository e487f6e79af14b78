use crate::lookup::SearchOutcome;
use crate::templates::components::{detail_href, favorite_toggle, grade_badge, href, stars};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct SearchVm<'a> {
    pub query: &'a str,
    pub outcome: &'a SearchOutcome,
    pub is_favorite: bool,
}

pub fn search_page(vm: &SearchVm) -> Markup {
    let place = vm.outcome.place.as_ref();
    let rating = place.and_then(|p| p.rating);

    desktop_layout(
        vm.query,
        html! {
            main class="container" {
                @match &vm.outcome.resolution {
                    Some(found) => {
                        section class="card result" {
                            h1 { (found.display_name()) " " (grade_badge(found.grade)) }
                            p { (stars(rating)) }
                            @if let Some(p) = place {
                                p class="open-status" { (p.open_status()) }
                            }
                            @if let Some(url) = &vm.outcome.photo_url {
                                img class="photo" src=(url.as_str()) alt=(found.display_name());
                            }
                            p class="address" { (found.address) }

                            @if let Some(camis) = found.camis.as_deref() {
                                ul class="actions" {
                                    li { a href=(detail_href(camis, vm.outcome.place_id.as_deref())) { "Details" } }
                                    li { a href=(href("/inspections", &[("camis", camis)])) { "Inspection history" } }
                                    @if let Some(fav) = found.to_favorite(rating, vm.outcome.place_id.as_deref()) {
                                        li { (favorite_toggle(&fav, vm.is_favorite)) }
                                    }
                                }
                            }
                        }
                    }
                    None => {
                        section class="card no-match" {
                            h1 { "No Match" }
                            p { "No inspection data was found for " strong { (vm.query) } "." }
                            @let tried = vm.outcome.trace.stages_run();
                            @if !tried.is_empty() {
                                p class="muted" {
                                    "Searched by: "
                                    (tried.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "))
                                }
                            }
                            @if let Some(p) = place {
                                p { (stars(rating)) " · " (p.open_status()) }
                            }
                        }
                    }
                }
            }
        },
    )
}
