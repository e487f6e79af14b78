use crate::lookup::RestaurantDetail;
use crate::templates::components::{favorite_toggle, grade_badge, href, stars};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct RestaurantVm<'a> {
    pub detail: &'a RestaurantDetail,
    pub place_id: Option<&'a str>,
    pub is_favorite: bool,
}

pub fn restaurant_page(vm: &RestaurantVm) -> Markup {
    let place = vm.detail.place.as_ref();
    let rating = place.and_then(|p| p.rating);

    let Some(found) = &vm.detail.resolution else {
        return super::no_match_page("this restaurant");
    };

    desktop_layout(
        &found.display_name(),
        html! {
            main class="container" {
                h1 { (found.display_name()) }
                div class="grade-row" {
                    (grade_badge(found.grade))
                    @if let Some(date) = &found.grade_date {
                        small class="muted" { " graded " (crate::inspections::projector::date_label(date)) }
                    }
                }
                p { (stars(rating)) }
                @if let Some(url) = &vm.detail.photo_url {
                    img class="photo" src=(url.as_str()) alt=(found.display_name());
                }
                p class="address" {
                    (found.address)
                    @if let Some(boro) = found.rows.iter().find_map(|r| r.boro.as_deref()) {
                        " · " (boro)
                    }
                }

                @if let Some(p) = place {
                    section class="card" {
                        h3 { "Hours" }
                        p class="open-status" { (p.open_status()) }
                        @if !p.weekday_hours.is_empty() {
                            ul class="hours" {
                                @for line in &p.weekday_hours {
                                    li { (line) }
                                }
                            }
                        }
                    }
                }

                @if let Some(camis) = found.camis.as_deref() {
                    ul class="actions" {
                        li {
                            a href=(href("/inspections", &[("camis", camis)])) { "Inspection history" }
                            " (" (found.inspections.len()) " visits)"
                        }
                        @if let Some(fav) = found.to_favorite(rating, vm.place_id) {
                            li { (favorite_toggle(&fav, vm.is_favorite)) }
                        }
                    }
                }
            }
        },
    )
}
