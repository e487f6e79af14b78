use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::FeedError;

// One element of the feed's JSON array (one violation line):
//  ├── camis
//  ├── dba
//  ├── building / street / boro / zipcode
//  ├── grade / grade_date
//  ├── inspection_date
//  ├── violation_description / critical_flag
//  └── score

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InspectionRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub camis: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dba: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub building: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub boro: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zipcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grade: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub inspection_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub violation_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grade_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub critical_flag: Option<String>,
    /// Demerit points, string-encoded. Lower is better.
    #[serde(default, deserialize_with = "lenient_string")]
    pub score: Option<String>,
}

impl InspectionRow {
    pub fn is_critical(&self) -> bool {
        self.critical_flag.as_deref() == Some("Critical")
    }

    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }

    pub fn parsed_score(&self) -> Option<i32> {
        self.score.as_deref().and_then(|s| s.trim().parse::<i32>().ok())
    }

    /// "<building> <street>, <zip>" as the feed spells it.
    pub fn feed_address(&self) -> String {
        format!(
            "{} {}, {}",
            self.building.as_deref().unwrap_or(""),
            self.street.as_deref().unwrap_or(""),
            self.zipcode.as_deref().unwrap_or("")
        )
    }
}

/// Strings pass through, numbers are stringified, anything else is `None`.
/// The feed is inconsistent about quoting numeric columns.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Decode a feed response. A body that is not a JSON array is a decode
/// failure; array elements that are not objects are skipped.
pub fn decode_rows(body: &[u8]) -> Result<Vec<InspectionRow>, FeedError> {
    let values: Vec<Value> =
        serde_json::from_slice(body).map_err(|e| FeedError::Decode(e.to_string()))?;

    Ok(values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rows_and_tolerates_wrong_types() {
        let body = br#"[
            {"camis": "50001234", "dba": "JOE'S PIZZA", "score": 12, "grade": "A"},
            {"camis": 41000001, "dba": null, "critical_flag": ["odd"]},
            "not an object"
        ]"#;

        let rows = decode_rows(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].score.as_deref(), Some("12"));
        assert_eq!(rows[0].parsed_score(), Some(12));
        assert_eq!(rows[1].camis.as_deref(), Some("41000001"));
        assert_eq!(rows[1].dba, None);
        assert_eq!(rows[1].critical_flag, None);
    }

    #[test]
    fn non_array_body_is_decode_failure() {
        let err = decode_rows(br#"{"error": true}"#).unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }

    #[test]
    fn feed_address_joins_parts() {
        let row = InspectionRow {
            building: Some("123".into()),
            street: Some("MAIN ST".into()),
            zipcode: Some("10001".into()),
            ..Default::default()
        };
        assert_eq!(row.feed_address(), "123 MAIN ST, 10001");
    }
}
