pub mod feed_error;
pub mod grouper;
pub mod models;
pub mod projector;
pub mod query;
pub mod resolver;
pub mod tokenizer;

pub use feed_error::FeedError;
pub use models::{decode_rows, InspectionRow};
pub use query::{CascadeStage, FeedQuery, LookupSignals, PlannedQuery, QueryBuilder};
pub use resolver::{resolve_cascade, MatchCandidate, StageRows};
