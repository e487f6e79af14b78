// query.rs
use std::fmt;

use url::Url;

use super::tokenizer::normalize_name;
use super::FeedError;
use crate::config::FeedConfig;

/// Which rung of the lookup cascade a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStage {
    /// Detail refresh of an already identified restaurant.
    ExactCamis,
    NameBuilding,
    BuildingOnly,
    /// Map-tap path: no address known.
    NameOnly,
}

impl CascadeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeStage::ExactCamis => "exact_camis",
            CascadeStage::NameBuilding => "name_building",
            CascadeStage::BuildingOnly => "building_only",
            CascadeStage::NameOnly => "name_only",
        }
    }

    /// Stages whose rows are resolved by token overlap rather than by
    /// postal code and grade date.
    pub fn is_token_scored(&self) -> bool {
        matches!(self, CascadeStage::BuildingOnly | CascadeStage::NameOnly)
    }
}

impl fmt::Display for CascadeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub stage: CascadeStage,
    pub url: Url,
}

/// What the caller knows about the restaurant it is looking for.
#[derive(Debug, Clone, Default)]
pub struct LookupSignals {
    pub name: Option<String>,
    pub building: Option<String>,
    pub postal_code: Option<String>,
}

impl LookupSignals {
    pub fn from_search(name: &str, building: Option<&str>, postal_code: Option<&str>) -> Self {
        Self {
            name: non_blank(Some(name)),
            building: non_blank(building),
            postal_code: non_blank(postal_code),
        }
    }

    pub fn from_map(name: &str) -> Self {
        Self {
            name: non_blank(Some(name)),
            ..Default::default()
        }
    }
}

/// One planned stage. Construction may already have failed, in which case
/// the stage is skipped when the cascade runs.
#[derive(Debug)]
pub struct PlannedQuery {
    pub stage: CascadeStage,
    pub query: Result<FeedQuery, FeedError>,
}

pub struct QueryBuilder<'a> {
    cfg: &'a FeedConfig,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(cfg: &'a FeedConfig) -> Self {
        Self { cfg }
    }

    /// Stage order for the signals at hand:
    /// - building known: name+building (when a name exists), then building-only
    /// - no building: name-only
    pub fn plan(&self, signals: &LookupSignals) -> Vec<PlannedQuery> {
        let mut plan = Vec::new();

        match (signals.building.as_deref(), signals.name.as_deref()) {
            (Some(building), name) => {
                if name.is_some() {
                    plan.push(PlannedQuery {
                        stage: CascadeStage::NameBuilding,
                        query: self.name_and_building(name, building, None),
                    });
                }
                plan.push(PlannedQuery {
                    stage: CascadeStage::BuildingOnly,
                    query: self.building_only(building),
                });
            }
            (None, Some(name)) => plan.push(PlannedQuery {
                stage: CascadeStage::NameOnly,
                query: self.name_only(name),
            }),
            (None, None) => {}
        }

        plan
    }

    /// Exact `building` match plus, when present, `dba` equality and `zipcode`.
    pub fn name_and_building(
        &self,
        name: Option<&str>,
        building: &str,
        zip: Option<&str>,
    ) -> Result<FeedQuery, FeedError> {
        let building = required("building", building)?;
        let name = optional("dba", name.map(normalize_name).as_deref())?;
        let zip = optional("zipcode", zip)?;

        let mut params = vec![("building", building)];
        if let Some(name) = name {
            params.push(("dba", name));
        }
        if let Some(zip) = zip {
            params.push(("zipcode", zip));
        }
        self.build(CascadeStage::NameBuilding, &params)
    }

    pub fn building_only(&self, building: &str) -> Result<FeedQuery, FeedError> {
        let building = required("building", building)?;
        self.build(CascadeStage::BuildingOnly, &[("building", building)])
    }

    pub fn name_only(&self, name: &str) -> Result<FeedQuery, FeedError> {
        let name = required("dba", &normalize_name(name))?;
        self.build(CascadeStage::NameOnly, &[("dba", name)])
    }

    pub fn by_camis(&self, camis: &str) -> Result<FeedQuery, FeedError> {
        let camis = required("camis", camis)?;
        self.build(CascadeStage::ExactCamis, &[("camis", camis)])
    }

    // `append_pair` escapes `&`, `+` and everything else outside the
    // unreserved set, so every call site encodes the same way.
    fn build(&self, stage: CascadeStage, params: &[(&str, String)]) -> Result<FeedQuery, FeedError> {
        let mut url = Url::parse(&self.cfg.endpoint)
            .map_err(|e| FeedError::Encoding(format!("bad feed endpoint: {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("$$app_token", &self.cfg.app_token);
        }

        Ok(FeedQuery { stage, url })
    }
}

/// Control characters have no valid encoding in a feed filter value.
fn encodable(field: &str, value: &str) -> Result<String, FeedError> {
    if value.chars().any(char::is_control) {
        return Err(FeedError::Encoding(format!("{field} contains control characters")));
    }
    Ok(value.to_string())
}

fn required(field: &str, value: &str) -> Result<String, FeedError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FeedError::Encoding(format!("{field} is empty")));
    }
    encodable(field, value)
}

fn optional(field: &str, value: Option<&str>) -> Result<Option<String>, FeedError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => encodable(field, v).map(Some),
        None => Ok(None),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> FeedConfig {
        FeedConfig {
            endpoint: "https://feed.test/resource/rows.json".to_string(),
            app_token: "tok".to_string(),
        }
    }

    fn pairs(q: &FeedQuery) -> Vec<(String, String)> {
        q.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn name_building_query_normalizes_and_escapes_name() {
        let cfg = cfg();
        let q = QueryBuilder::new(&cfg)
            .name_and_building(Some("Joe\u{2019}s Pizza & Grill+"), "7", Some("10014"))
            .unwrap();

        assert_eq!(
            pairs(&q),
            vec![
                ("building".to_string(), "7".to_string()),
                ("dba".to_string(), "JOE'S PIZZA & GRILL+".to_string()),
                ("zipcode".to_string(), "10014".to_string()),
                ("$$app_token".to_string(), "tok".to_string()),
            ]
        );
        let raw = q.url.query().unwrap();
        assert!(raw.contains("%26"));
        assert!(raw.contains("%2B"));
    }

    #[test]
    fn plan_with_building_is_name_then_building() {
        let cfg = cfg();
        let signals = LookupSignals::from_search("Joe's Pizza", Some("7"), Some("10014"));
        let stages: Vec<_> = QueryBuilder::new(&cfg)
            .plan(&signals)
            .into_iter()
            .map(|p| p.stage)
            .collect();
        assert_eq!(stages, vec![CascadeStage::NameBuilding, CascadeStage::BuildingOnly]);
    }

    #[test]
    fn plan_without_building_is_name_only() {
        let cfg = cfg();
        let plan = QueryBuilder::new(&cfg).plan(&LookupSignals::from_map("Joe's Pizza"));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].stage, CascadeStage::NameOnly);
        assert!(plan[0].query.is_ok());
    }

    #[test]
    fn plan_with_nothing_is_empty() {
        let cfg = cfg();
        let signals = LookupSignals::from_search("   ", Some(""), None);
        assert!(QueryBuilder::new(&cfg).plan(&signals).is_empty());
    }

    #[test]
    fn control_characters_fail_encoding() {
        let cfg = cfg();
        let err = QueryBuilder::new(&cfg)
            .name_and_building(Some("Bad\u{0}Name"), "7", None)
            .unwrap_err();
        assert!(matches!(err, FeedError::Encoding(_)));

        let err = QueryBuilder::new(&cfg).building_only("  ").unwrap_err();
        assert!(matches!(err, FeedError::Encoding(_)));
    }

    #[test]
    fn camis_query_has_token() {
        let cfg = cfg();
        let q = QueryBuilder::new(&cfg).by_camis("50001234").unwrap();
        assert_eq!(q.stage, CascadeStage::ExactCamis);
        assert_eq!(
            pairs(&q),
            vec![
                ("camis".to_string(), "50001234".to_string()),
                ("$$app_token".to_string(), "tok".to_string()),
            ]
        );
    }
}
