use crate::inspections::grouper::CriticalFlag;
use crate::inspections::projector::{GradeView, InspectionEntry};
use crate::templates::{desktop_layout, grade_badge};
use maud::{html, Markup};

/// Hue in 0..=1 as a CSS color.
fn hue_css(entry: &InspectionEntry) -> String {
    if entry.display_score.is_none() {
        return "hsl(0, 0%, 60%)".to_string();
    }
    format!("hsl({:.0}, 70%, 42%)", entry.hue * 360.0)
}

pub fn inspections_page(view: &GradeView) -> Markup {
    desktop_layout(
        &format!("{} inspections", view.display_name),
        html! {
            main class="container" {
                h1 class=(view.color.css_class()) { (view.display_name) " " (grade_badge(view.display_grade)) }

                @if view.violations.is_empty() {
                    p class="muted" { "No inspections on record." }
                }

                @for entry in &view.violations {
                    section class="card inspection" {
                        header {
                            h3 { (entry.date_label) }
                            span class="score" style=(format!("background: {}", hue_css(entry))) {
                                (entry.score_label())
                            }
                            @if entry.critical == CriticalFlag::Critical {
                                span class="critical" { (entry.critical.as_str()) }
                            } @else {
                                span class="muted" { (entry.critical.as_str()) }
                            }
                        }
                        ul {
                            @for bullet in &entry.bullets {
                                li { (bullet) }
                            }
                        }
                    }
                }
            }
        },
    )
}
