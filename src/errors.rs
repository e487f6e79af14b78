use astra::Response;
use thiserror::Error;

use crate::db::StoreError;

/// Errors originating from either the server logic
/// (routing, missing parameters, etc.) or downstream layers (store).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Store Error: {0}")]
    Store(#[from] StoreError),
    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
