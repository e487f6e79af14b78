// resolver.rs
//
// Decides which feed rows belong to "this" restaurant. Pure: callers run the
// queries and hand the rows in, one cascade stage at a time.

use std::collections::HashSet;

use tracing::debug;

use super::grouper::{group, AggregatedInspection};
use super::models::InspectionRow;
use super::query::{CascadeStage, LookupSignals};
use super::tokenizer::{overlap, tokenize};

/// A restaurant's feed identity, picked out of one stage's result set.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub stage: CascadeStage,
    pub camis: Option<String>,
    pub name: Option<String>,
    /// The most recently graded row; source of the current grade.
    pub selected: InspectionRow,
    /// Every row in the result set carrying the selected camis.
    pub rows: Vec<InspectionRow>,
    pub inspections: Vec<AggregatedInspection>,
}

impl MatchCandidate {
    fn from_selected(stage: CascadeStage, selected: &InspectionRow, all: &[InspectionRow]) -> Self {
        let rows: Vec<InspectionRow> = match selected.camis.as_deref() {
            Some(camis) => all
                .iter()
                .filter(|r| r.camis.as_deref() == Some(camis))
                .cloned()
                .collect(),
            None => vec![selected.clone()],
        };
        let inspections = group(&rows);

        Self {
            stage,
            camis: selected.camis.clone(),
            name: selected.dba.clone(),
            selected: selected.clone(),
            rows,
            inspections,
        }
    }

    pub fn grade(&self) -> Option<&str> {
        self.selected.grade.as_deref()
    }
}

/// Rows one cascade stage produced. Transport, decode and encoding failures
/// arrive here as an empty `rows`.
#[derive(Debug, Clone)]
pub struct StageRows {
    pub stage: CascadeStage,
    pub rows: Vec<InspectionRow>,
}

/// Walk stages in order and stop at the first that resolves. The iterator is
/// pulled lazily, so a stage's query is only issued if every earlier stage
/// came back empty or ungraded.
pub fn resolve_cascade<I>(signals: &LookupSignals, stages: I) -> Option<MatchCandidate>
where
    I: IntoIterator<Item = StageRows>,
{
    for StageRows { stage, rows } in stages {
        if let Some(found) = resolve_stage(stage, &rows, signals) {
            return Some(found);
        }
        debug!(%stage, rows = rows.len(), "stage did not resolve");
    }
    None
}

pub fn resolve_stage(
    stage: CascadeStage,
    rows: &[InspectionRow],
    signals: &LookupSignals,
) -> Option<MatchCandidate> {
    if rows.is_empty() {
        return None;
    }
    let query_name = signals.name.as_deref().unwrap_or("");

    match stage {
        CascadeStage::ExactCamis => resolve_exact(rows),
        CascadeStage::NameBuilding => resolve_address_scoped(rows, signals.postal_code.as_deref()),
        CascadeStage::BuildingOnly => resolve_by_tokens(stage, rows, query_name, false),
        CascadeStage::NameOnly => resolve_by_tokens(stage, rows, query_name, true),
    }
}

/// Every row is the same restaurant by construction. Prefer the latest
/// graded row; an entity with no graded rows still resolves (grade shows N/A).
pub fn resolve_exact(rows: &[InspectionRow]) -> Option<MatchCandidate> {
    let selected = latest_graded(rows.iter()).or_else(|| latest(rows.iter()))?;
    Some(MatchCandidate::from_selected(CascadeStage::ExactCamis, selected, rows))
}

/// Graded rows in the right postal code win; when there are none the whole
/// result set is considered. Most recent grade date wins.
pub fn resolve_address_scoped(rows: &[InspectionRow], postal_code: Option<&str>) -> Option<MatchCandidate> {
    let in_zip: Vec<&InspectionRow> = rows
        .iter()
        .filter(|r| r.is_graded() && postal_code.is_some() && r.zipcode.as_deref() == postal_code)
        .collect();

    let selected = if in_zip.is_empty() {
        latest_graded(rows.iter())
    } else {
        latest_graded(in_zip.into_iter())
    }?;

    Some(MatchCandidate::from_selected(CascadeStage::NameBuilding, selected, rows))
}

/// Score graded rows by `|tokens(row) ∩ tokens(query)|`.
///
/// Ties keep the row the feed returned first. That makes the outcome depend
/// on feed order, which is deterministic but not obviously the best rule.
pub fn resolve_by_tokens(
    stage: CascadeStage,
    rows: &[InspectionRow],
    query_name: &str,
    require_overlap: bool,
) -> Option<MatchCandidate> {
    let query_tokens = tokenize(query_name);

    let scored = rows
        .iter()
        .filter(|r| r.is_graded())
        .map(|r| (score_row(r, &query_tokens), r));

    let (score, selected) = first_max_by_key(scored, |(score, _)| *score)?;
    if require_overlap && score == 0 {
        return None;
    }

    debug!(%stage, score, dba = selected.dba.as_deref().unwrap_or(""), "token match");
    Some(MatchCandidate::from_selected(stage, selected, rows))
}

fn score_row(row: &InspectionRow, query_tokens: &HashSet<String>) -> usize {
    overlap(&tokenize(row.dba.as_deref().unwrap_or("")), query_tokens)
}

fn latest_graded<'a, I>(rows: I) -> Option<&'a InspectionRow>
where
    I: Iterator<Item = &'a InspectionRow>,
{
    latest(rows.filter(|r| r.is_graded()))
}

/// Lexicographically greatest grade date; a missing date sorts as "".
fn latest<'a, I>(rows: I) -> Option<&'a InspectionRow>
where
    I: Iterator<Item = &'a InspectionRow>,
{
    first_max_by_key(rows, |r| r.grade_date.clone().unwrap_or_default())
}

/// Like `Iterator::max_by_key` but the *first* maximal element wins.
fn first_max_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Option<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut best: Option<(K, T)> = None;
    for item in items {
        let k = key(&item);
        let replace = match &best {
            Some((best_key, _)) => k > *best_key,
            None => true,
        };
        if replace {
            best = Some((k, item));
        }
    }
    best.map(|(_, item)| item)
}
