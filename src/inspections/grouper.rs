// grouper.rs
use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use super::models::InspectionRow;

pub const DESCRIPTION_DELIMITER: &str = " ||| ";
pub const UNKNOWN_DATE: &str = "Unknown Date";
pub const FEED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalFlag {
    Critical,
    NotCritical,
}

impl CriticalFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriticalFlag::Critical => "Critical",
            CriticalFlag::NotCritical => "Not Critical",
        }
    }
}

/// One inspection visit: every violation row sharing an inspection date.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedInspection {
    pub date: String,
    /// Descriptions joined with `DESCRIPTION_DELIMITER`.
    pub description: String,
    pub critical: CriticalFlag,
    /// Worst (highest) demerit score of the visit.
    pub score: Option<i32>,
}

impl AggregatedInspection {
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.description
            .split(DESCRIPTION_DELIMITER)
            .filter(|d| !d.is_empty())
    }

    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_feed_date(&self.date)
    }
}

pub fn parse_feed_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, FEED_DATE_FORMAT).ok()
}

/// Collapse violation rows into one record per inspection date, newest first.
/// Dates that do not parse (including the "Unknown Date" bucket) sort last.
pub fn group(rows: &[InspectionRow]) -> Vec<AggregatedInspection> {
    let mut buckets: BTreeMap<&str, Vec<&InspectionRow>> = BTreeMap::new();
    for row in rows {
        let date = row.inspection_date.as_deref().unwrap_or(UNKNOWN_DATE);
        buckets.entry(date).or_default().push(row);
    }

    let mut out: Vec<AggregatedInspection> = buckets
        .into_iter()
        .map(|(date, group)| AggregatedInspection {
            date: date.to_string(),
            description: group
                .iter()
                .filter_map(|r| r.violation_description.as_deref())
                .collect::<Vec<_>>()
                .join(DESCRIPTION_DELIMITER),
            critical: if group.iter().any(|r| r.is_critical()) {
                CriticalFlag::Critical
            } else {
                CriticalFlag::NotCritical
            },
            score: group.iter().filter_map(|r| r.parsed_score()).max(),
        })
        .collect();

    // Well-formed feed dates compare correctly as strings.
    out.sort_by(|a, b| {
        let a_key = (a.parsed_date().is_some(), a.date.as_str());
        let b_key = (b.parsed_date().is_some(), b.date.as_str());
        b_key.cmp(&a_key)
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: Option<&str>, desc: &str, critical: &str, score: Option<&str>) -> InspectionRow {
        InspectionRow {
            camis: Some("1".into()),
            inspection_date: date.map(str::to_string),
            violation_description: Some(desc.to_string()),
            critical_flag: Some(critical.to_string()),
            score: score.map(str::to_string),
            ..Default::default()
        }
    }

    const D1: &str = "2024-03-01T00:00:00.000";
    const D2: &str = "2023-11-15T00:00:00.000";

    #[test]
    fn groups_rows_by_inspection_date() {
        let rows = vec![
            row(Some(D1), "Mice.", "Not Critical", Some("12")),
            row(Some(D1), "Cold holding.", "Critical", Some("27")),
            row(Some(D2), "Plumbing.", "Not Critical", Some("5")),
        ];

        let grouped = group(&rows);
        assert_eq!(grouped.len(), 2);

        let d1 = &grouped[0];
        assert_eq!(d1.date, D1);
        assert_eq!(d1.critical, CriticalFlag::Critical);
        assert_eq!(d1.score, Some(27));
        assert_eq!(d1.description, "Mice. ||| Cold holding.");
        assert_eq!(d1.descriptions().collect::<Vec<_>>(), vec!["Mice.", "Cold holding."]);

        let d2 = &grouped[1];
        assert_eq!(d2.critical, CriticalFlag::NotCritical);
        assert_eq!(d2.score, Some(5));
    }

    #[test]
    fn unparsable_scores_are_ignored() {
        let rows = vec![
            row(Some(D1), "a", "Not Critical", Some("n/a")),
            row(Some(D1), "b", "Not Critical", None),
        ];
        assert_eq!(group(&rows)[0].score, None);

        let rows = vec![
            row(Some(D1), "a", "Not Critical", Some("oops")),
            row(Some(D1), "b", "Not Critical", Some("9")),
        ];
        assert_eq!(group(&rows)[0].score, Some(9));
    }

    #[test]
    fn undated_and_malformed_dates_sort_oldest() {
        let rows = vec![
            row(None, "no date", "Not Critical", None),
            row(Some("1900-01-01T00:00:00.000"), "sentinel", "Not Critical", None),
            row(Some("03/01/2024"), "odd format", "Not Critical", None),
            row(Some(D1), "newest", "Not Critical", None),
        ];

        let dates: Vec<_> = group(&rows).into_iter().map(|g| g.date).collect();
        assert_eq!(dates[0], D1);
        assert_eq!(dates[1], "1900-01-01T00:00:00.000");
        assert!(dates[2..].contains(&UNKNOWN_DATE.to_string()));
        assert!(dates[2..].contains(&"03/01/2024".to_string()));
    }

    #[test]
    fn empty_input_groups_to_nothing() {
        assert!(group(&[]).is_empty());
    }
}
