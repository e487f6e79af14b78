// lookup.rs
//
// Places directory + inspection cascade + recents, composed into one call per
// user flow. Nothing here fails hard: stage failures become empty stages and
// a cascade that runs dry is `None`.

use chrono::Utc;
use tracing::{debug, info, info_span, warn};
use url::Url;

use crate::config::{FeedConfig, PlacesConfig};
use crate::db::{KeyValueStore, RestaurantStore};
use crate::domain::restaurant::FavoriteRestaurant;
use crate::fetch::Fetch;
use crate::inspections::grouper::AggregatedInspection;
use crate::inspections::projector::{capitalize_words, project, DisplayGrade, GradeView};
use crate::inspections::{
    decode_rows, resolve_cascade, CascadeStage, FeedError, FeedQuery, InspectionRow,
    LookupSignals, MatchCandidate, PlannedQuery, QueryBuilder, StageRows,
};
use crate::places::{radius_meters, NearbyPlace, PlaceDetails, PlacesClient};

#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Rows(usize),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageTrace {
    pub stage: CascadeStage,
    pub outcome: StageOutcome,
}

/// Per-lookup record of which stages ran and what they returned.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTrace {
    pub flow: &'static str,
    pub stages: Vec<StageTrace>,
}

impl LookupTrace {
    pub fn new(flow: &'static str) -> Self {
        Self {
            flow,
            stages: Vec::new(),
        }
    }

    fn record(&mut self, stage: CascadeStage, outcome: StageOutcome) {
        self.stages.push(StageTrace { stage, outcome });
    }

    pub fn stages_run(&self) -> Vec<CascadeStage> {
        self.stages.iter().map(|s| s.stage).collect()
    }

    pub fn rows_seen(&self) -> usize {
        self.stages
            .iter()
            .map(|s| match s.outcome {
                StageOutcome::Rows(n) => n,
                StageOutcome::Failed(_) => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> Vec<String> {
        self.stages
            .iter()
            .filter_map(|s| match &s.outcome {
                StageOutcome::Failed(msg) => Some(format!("{}: {msg}", s.stage)),
                StageOutcome::Rows(_) => None,
            })
            .collect()
    }
}

/// A resolved restaurant with its grade already clamped for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRestaurant {
    pub camis: Option<String>,
    pub name: String,
    pub grade: DisplayGrade,
    pub grade_date: Option<String>,
    pub address: String,
    pub stage: CascadeStage,
    pub rows: Vec<InspectionRow>,
    pub inspections: Vec<AggregatedInspection>,
}

impl ResolvedRestaurant {
    /// Token-scored stages picked the row without the directory's help, so
    /// the address shown is the feed's own.
    fn from_candidate(candidate: MatchCandidate, directory_address: Option<&str>) -> Self {
        let address = match directory_address {
            Some(addr) if !candidate.stage.is_token_scored() => addr.to_string(),
            _ => candidate.selected.feed_address(),
        };

        Self {
            camis: candidate.camis.clone(),
            name: candidate.name.clone().unwrap_or_default(),
            grade: DisplayGrade::from_raw(candidate.grade()),
            grade_date: candidate.selected.grade_date.clone(),
            address,
            stage: candidate.stage,
            rows: candidate.rows,
            inspections: candidate.inspections,
        }
    }

    pub fn display_name(&self) -> String {
        capitalize_words(&self.name)
    }

    /// The persisted shape. Rows without a camis cannot be stored.
    pub fn to_favorite(&self, rating: Option<f64>, place_id: Option<&str>) -> Option<FavoriteRestaurant> {
        Some(FavoriteRestaurant {
            name: self.display_name(),
            grade: Some(self.grade.as_str().to_string()),
            rating,
            camis: self.camis.clone()?,
            address: self.address.clone(),
            place_id: place_id.map(str::to_string),
        })
    }
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub place_id: Option<String>,
    pub place: Option<PlaceDetails>,
    pub resolution: Option<ResolvedRestaurant>,
    pub photo_url: Option<Url>,
    pub trace: LookupTrace,
}

#[derive(Debug)]
pub struct RestaurantDetail {
    pub resolution: Option<ResolvedRestaurant>,
    pub view: Option<GradeView>,
    pub place: Option<PlaceDetails>,
    pub photo_url: Option<Url>,
    pub trace: LookupTrace,
}

pub struct LookupService<'a, F: Fetch, K: KeyValueStore> {
    fetcher: &'a F,
    feed: &'a FeedConfig,
    places: &'a PlacesConfig,
    store: &'a RestaurantStore<K>,
}

impl<'a, F: Fetch, K: KeyValueStore> LookupService<'a, F, K> {
    pub fn new(
        fetcher: &'a F,
        feed: &'a FeedConfig,
        places: &'a PlacesConfig,
        store: &'a RestaurantStore<K>,
    ) -> Self {
        Self {
            fetcher,
            feed,
            places,
            store,
        }
    }

    fn places_client(&self) -> PlacesClient<'a, F> {
        PlacesClient::new(self.fetcher, self.places)
    }

    /// Search flow: directory details supply the canonical name, building
    /// number and postal code, then the name+building / building-only cascade
    /// runs. The caller's name is only used when the directory has none. A
    /// match is recorded as a recent view.
    pub fn search(&self, name: &str, place_id: Option<&str>) -> SearchOutcome {
        let span = info_span!("search", name);
        let _enter = span.enter();

        let mut trace = LookupTrace::new("search");
        let place = place_id.and_then(|id| self.load_place(id));
        let photo_url = place.as_ref().and_then(|p| self.photo_for(p));

        let directory_name = place
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .filter(|n| !n.trim().is_empty());
        let signals = LookupSignals::from_search(
            directory_name.unwrap_or(name),
            place.as_ref().and_then(|p| p.street_number.as_deref()),
            place.as_ref().and_then(|p| p.postal_code.as_deref()),
        );
        let plan = QueryBuilder::new(self.feed).plan(&signals);

        let resolution = self
            .run_cascade(&signals, plan, &mut trace)
            .map(|c| {
                ResolvedRestaurant::from_candidate(
                    c,
                    place.as_ref().and_then(|p| p.formatted_address.as_deref()),
                )
            });

        if let Some(found) = &resolution {
            let rating = place.as_ref().and_then(|p| p.rating);
            self.remember(found, rating, place_id);
        }

        info!(
            flow = trace.flow,
            stages = ?trace.stages_run(),
            rows = trace.rows_seen(),
            failures = ?trace.failures(),
            matched = ?resolution.as_ref().map(|r| r.stage),
            "search finished"
        );

        SearchOutcome {
            place_id: place_id.map(str::to_string),
            place,
            resolution,
            photo_url,
            trace,
        }
    }

    /// Free text: find the place id first, then run `search`.
    pub fn search_text(&self, text: &str) -> SearchOutcome {
        let place_id = match self.places_client().find_place(text) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "find place failed");
                None
            }
        };
        self.search(text, place_id.as_deref())
    }

    /// Map-tap flow: name only, and at least one shared token is required.
    /// Does not touch recents.
    pub fn map_lookup(&self, name: &str) -> Option<ResolvedRestaurant> {
        let span = info_span!("map", name);
        let _enter = span.enter();

        let mut trace = LookupTrace::new("map");
        let signals = LookupSignals::from_map(name);
        let plan = QueryBuilder::new(self.feed).plan(&signals);

        let resolution = self
            .run_cascade(&signals, plan, &mut trace)
            .map(|c| ResolvedRestaurant::from_candidate(c, None));

        debug!(
            flow = trace.flow,
            stages = ?trace.stages_run(),
            rows = trace.rows_seen(),
            failures = ?trace.failures(),
            "map lookup finished"
        );
        resolution
    }

    /// Pins for the map view. Tapping one runs `map_lookup`.
    pub fn nearby(&self, lat: f64, lng: f64, miles: f64) -> Vec<NearbyPlace> {
        match self.places_client().nearby_restaurants(lat, lng, radius_meters(miles)) {
            Ok(places) => places,
            Err(e) => {
                warn!(error = %e, "nearby search failed");
                Vec::new()
            }
        }
    }

    /// Detail flow for an already identified restaurant. Does not touch recents.
    pub fn detail(&self, camis: &str, place_id: Option<&str>) -> RestaurantDetail {
        let span = info_span!("detail", camis);
        let _enter = span.enter();

        let mut trace = LookupTrace::new("detail");
        let place = place_id.and_then(|id| self.load_place(id));
        let photo_url = place.as_ref().and_then(|p| self.photo_for(p));

        let plan = vec![PlannedQuery {
            stage: CascadeStage::ExactCamis,
            query: QueryBuilder::new(self.feed).by_camis(camis),
        }];
        let candidate = self.run_cascade(&LookupSignals::default(), plan, &mut trace);

        debug!(
            flow = trace.flow,
            rows = trace.rows_seen(),
            failures = ?trace.failures(),
            "detail lookup finished"
        );

        let view = candidate.as_ref().map(project);
        let resolution = candidate.map(|c| {
            ResolvedRestaurant::from_candidate(
                c,
                place.as_ref().and_then(|p| p.formatted_address.as_deref()),
            )
        });

        RestaurantDetail {
            resolution,
            view,
            place,
            photo_url,
            trace,
        }
    }

    fn run_cascade(
        &self,
        signals: &LookupSignals,
        plan: Vec<PlannedQuery>,
        trace: &mut LookupTrace,
    ) -> Option<MatchCandidate> {
        let stages = plan
            .into_iter()
            .map(|planned| self.run_stage(planned, &mut *trace));
        resolve_cascade(signals, stages)
    }

    /// Every failure is logged and recorded, then the stage counts as empty.
    fn run_stage(&self, planned: PlannedQuery, trace: &mut LookupTrace) -> StageRows {
        let stage = planned.stage;

        let rows = match planned.query.and_then(|q| self.fetch_rows(&q)) {
            Ok(rows) => {
                trace.record(stage, StageOutcome::Rows(rows.len()));
                rows
            }
            Err(e) => {
                warn!(%stage, error = %e, "stage failed, treating as zero rows");
                trace.record(stage, StageOutcome::Failed(e.to_string()));
                Vec::new()
            }
        };

        StageRows { stage, rows }
    }

    fn fetch_rows(&self, query: &FeedQuery) -> Result<Vec<InspectionRow>, FeedError> {
        debug!(stage = %query.stage, url = %query.url, "feed query");
        let body = self.fetcher.fetch(&query.url)?;
        decode_rows(&body)
    }

    fn load_place(&self, place_id: &str) -> Option<PlaceDetails> {
        match self.places_client().place_details(place_id) {
            Ok(details) => details,
            Err(e) => {
                warn!(place_id, error = %e, "place details failed");
                None
            }
        }
    }

    fn photo_for(&self, place: &PlaceDetails) -> Option<Url> {
        let reference = place.photo_reference.as_deref()?;
        self.places_client().photo_url(reference).ok()
    }

    /// A failed write loses one recents entry, never the lookup itself.
    fn remember(&self, found: &ResolvedRestaurant, rating: Option<f64>, place_id: Option<&str>) {
        let Some(entry) = found.to_favorite(rating, place_id) else {
            return;
        };
        if let Err(e) = self.store.record_view(entry, Utc::now()) {
            warn!(error = %e, "could not record recent view");
        }
    }
}
