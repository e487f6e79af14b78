use crate::errors::ServerError;
use crate::responses::html::html_with_status;
use crate::templates::pages::error_page;
use astra::{Body, Response};
use tracing::{error, warn};

/// Convert a ServerError into an HTML error page
pub fn error_to_response(err: ServerError) -> Response {
    let (status, message) = match &err {
        ServerError::NotFound => (404, "Not Found".to_string()),
        ServerError::BadRequest(msg) => (400, msg.clone()),
        ServerError::Store(e) => {
            error!(error = %e, "store failure");
            (500, "Saved restaurants are unavailable right now.".to_string())
        }
        ServerError::InternalError => (500, "Internal Server Error".to_string()),
    };
    if status < 500 {
        warn!(status, %err, "request rejected");
    }

    html_with_status(status, error_page(status, &message))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
