// projector.rs
use super::grouper::{AggregatedInspection, CriticalFlag};
use super::resolver::MatchCandidate;

pub const NOT_AVAILABLE: &str = "N/A";

/// The only grades ever shown. Anything else the feed sends ("Z", "P",
/// blanks, "Not Yet Graded") displays as N/A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayGrade {
    A,
    B,
    C,
    NotAvailable,
}

impl DisplayGrade {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|g| g.trim().to_uppercase()).as_deref() {
            Some("A") => DisplayGrade::A,
            Some("B") => DisplayGrade::B,
            Some("C") => DisplayGrade::C,
            _ => DisplayGrade::NotAvailable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayGrade::A => "A",
            DisplayGrade::B => "B",
            DisplayGrade::C => "C",
            DisplayGrade::NotAvailable => NOT_AVAILABLE,
        }
    }

    pub fn color(&self) -> GradeColor {
        match self {
            DisplayGrade::A => GradeColor::Green,
            DisplayGrade::B => GradeColor::Yellow,
            DisplayGrade::C => GradeColor::Red,
            DisplayGrade::NotAvailable => GradeColor::Gray,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeColor {
    Green,
    Yellow,
    Red,
    Gray,
}

impl GradeColor {
    pub fn css_class(&self) -> &'static str {
        match self {
            GradeColor::Green => "grade-green",
            GradeColor::Yellow => "grade-yellow",
            GradeColor::Red => "grade-red",
            GradeColor::Gray => "grade-gray",
        }
    }
}

/// `100 - demerits` for demerits in 0..=100, otherwise undefined.
pub fn display_score(demerits: Option<i32>) -> Option<u8> {
    demerits
        .filter(|d| (0..=100).contains(d))
        .and_then(|d| u8::try_from(100 - d).ok())
}

/// Red through yellow to green as the display score improves:
/// - 0..=27   hue 0.0
/// - 28..=86  0.0 to 0.15
/// - 87..=100 0.15 to 0.33
pub fn severity_hue(score: i32) -> f64 {
    let s = score.clamp(0, 100);
    match s {
        0..=27 => 0.0,
        28..=86 => 0.15 * f64::from(s - 28) / 58.0,
        _ => 0.15 + 0.18 * f64::from(s - 87) / 13.0,
    }
}

/// `MMM d, yyyy` for feed-formatted dates; anything else passes through.
pub fn date_label(raw: &str) -> String {
    super::grouper::parse_feed_date(raw)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// "JOE'S PIZZA" -> "Joe's Pizza".
pub fn capitalize_words(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn rating_label(rating: Option<f64>) -> String {
    match rating {
        Some(r) => format!("{r:.1}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Filled stars out of five.
pub fn star_count(rating: Option<f64>) -> u8 {
    let r = rating.unwrap_or(0.0).round().clamp(0.0, 5.0);
    r as u8
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectionEntry {
    pub date_label: String,
    pub display_score: Option<u8>,
    pub hue: f64,
    pub critical: CriticalFlag,
    pub bullets: Vec<String>,
}

impl InspectionEntry {
    pub fn from_aggregate(agg: &AggregatedInspection) -> Self {
        let display_score = display_score(agg.score);
        Self {
            date_label: date_label(&agg.date),
            display_score,
            hue: severity_hue(display_score.map(i32::from).unwrap_or(-1)),
            critical: agg.critical,
            bullets: bullets(agg),
        }
    }

    pub fn score_label(&self) -> String {
        self.display_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

fn bullets(agg: &AggregatedInspection) -> Vec<String> {
    agg.descriptions()
        .flat_map(|d| d.split(['.', ';']))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeView {
    pub display_grade: DisplayGrade,
    pub color: GradeColor,
    pub display_name: String,
    pub violations: Vec<InspectionEntry>,
}

pub fn project(candidate: &MatchCandidate) -> GradeView {
    let display_grade = DisplayGrade::from_raw(candidate.grade());
    GradeView {
        display_grade,
        color: display_grade.color(),
        display_name: capitalize_words(candidate.name.as_deref().unwrap_or("")),
        violations: candidate
            .inspections
            .iter()
            .map(InspectionEntry::from_aggregate)
            .collect(),
    }
}
